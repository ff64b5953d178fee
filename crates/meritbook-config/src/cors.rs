use std::env;

/// CORS settings for the API.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    /// Origins allowed to call the API, from `CORS_ALLOWED_ORIGINS`
    /// (comma-separated).
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self { allowed_origins }
    }
}
