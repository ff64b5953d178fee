//! # Meritbook Config
//!
//! Environment-driven configuration. Each concern has its own
//! `*Config::from_env()` with sensible development defaults; [`AppConfig`]
//! aggregates them for server startup. `.env` loading (dotenvy) happens in
//! the binaries before any of these run.

pub mod authz;
pub mod closure;
pub mod cors;
pub mod database;
pub mod jwt;

pub use authz::AuthzConfig;
pub use closure::ClosureConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;

/// Everything the server needs, read once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub authz: AuthzConfig,
    pub closure: ClosureConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cors: CorsConfig::from_env(),
            authz: AuthzConfig::from_env(),
            closure: ClosureConfig::from_env(),
        }
    }
}
