//! Middleware modules for request processing.
//!
//! # Authentication and authorization flow
//!
//! 1. Client sends a request with `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] validates the JWT and extracts the claims
//! 3. Permission extractors ask the authorization service whether the
//!    caller's role currently holds the required capability (database-backed
//!    behind a short cache, so revocations land without a re-login)
//! 4. The handler runs if all checks pass; period-scoped writes additionally
//!    go through the semester write gate inside their services

pub mod auth;
