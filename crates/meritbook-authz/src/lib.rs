//! # Meritbook Authz
//!
//! Permission normalization and authorization checks.
//!
//! Roles store their permissions in a column that has gone through several
//! historical shapes. This crate turns whatever is stored into one canonical
//! [`PermissionSet`](resolver::PermissionSet) and answers "does this role
//! hold capability X?" with a data-driven synonym fallback, fronted by a
//! short-TTL cache so guards stay cheap per request.
//!
//! - [`resolver`]: raw-shape classification and the canonical set
//! - [`synonyms`]: the singular/plural and action-alias fallback table
//! - [`cache`]: TTL cache with an injected clock
//! - [`store`]: role persistence behind a trait
//! - [`service`]: the request-facing service tying the above together

pub mod cache;
pub mod error;
pub mod resolver;
pub mod service;
pub mod store;
pub mod synonyms;

pub use cache::{Clock, PermissionCache, SystemClock};
pub use error::AuthzError;
pub use resolver::{PermissionSet, RawPermissions};
pub use service::AuthzService;
pub use store::{InMemoryRoleStore, PgRoleStore, RoleStore, StoreError};
pub use synonyms::SynonymTable;
