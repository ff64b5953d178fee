//! # Meritbook Auth
//!
//! JWT claims and token create/verify.
//!
//! Token *issuance* flows (login, refresh) live in the authentication
//! gateway, not here; this crate exists so the API middleware can verify
//! bearer tokens and so tests and tooling can mint them.

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
