//! # Meritbook API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for managing student
//! extracurricular activities and conduct scoring: activity registrations,
//! role/permission administration, and semester closure.
//!
//! ## Architecture
//!
//! The decision logic lives in workspace crates; this package wires it to
//! HTTP:
//!
//! ```text
//! src/
//! ├── cli/              # Admin maintenance commands (fix-permissions, seeding)
//! ├── middleware/       # Auth extractor and permission guards
//! ├── modules/          # Feature modules
//! │   ├── roles/        # Role and permission administration
//! │   ├── semesters/    # Closure lifecycle and the write gate
//! │   └── registrations/# Period-gated activity registrations
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Request logging middleware
//! ├── router.rs         # Route wiring, CORS
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Validated JSON extractor
//! ```
//!
//! Each feature module follows the same structure: `controller.rs` (HTTP
//! handlers), `service.rs` (business logic), `router.rs` (route wiring),
//! plus `model.rs`/`store.rs` where the module owns DTOs or persistence.
//!
//! ## Request pipeline
//!
//! Every authenticated write runs the same gauntlet: JWT verification
//! attaches the caller and role, the permission guard resolves the role's
//! canonical permission set (database-backed, cached for seconds), and for
//! period-scoped resources the semester write gate checks the closure state
//! of the targeted class and period before anything touches storage.

pub mod cli;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use meritbook_auth;
pub use meritbook_authz;
pub use meritbook_closure;
pub use meritbook_config;
pub use meritbook_core;
pub use meritbook_models;
