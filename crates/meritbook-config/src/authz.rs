use std::env;
use std::time::Duration;

/// Authorization-layer tuning.
#[derive(Clone, Debug)]
pub struct AuthzConfig {
    /// How long resolved permission sets stay cached. Short by design:
    /// permission revocations must land within seconds, without a re-login.
    pub cache_ttl: Duration,
}

impl AuthzConfig {
    pub fn from_env() -> Self {
        let cache_ttl_secs = env::var("AUTHZ_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Self {
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        }
    }
}
