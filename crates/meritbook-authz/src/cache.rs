//! Short-TTL cache for resolved permission sets.
//!
//! Guards run on every authenticated request; hitting the role store each
//! time would add a lookup per request, while trusting token-embedded
//! permissions would let revocations linger until re-login. The compromise
//! is a per-role cache with a TTL of a few seconds, plus explicit
//! invalidation so administrative grant/revoke takes effect immediately on
//! this process instead of waiting out the TTL.
//!
//! Time is injected through the [`Clock`] trait so expiry is testable.

use crate::resolver::PermissionSet;
use meritbook_models::RoleId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of monotonic time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    set: PermissionSet,
    stored_at: Instant,
}

/// Per-role permission cache with bounded staleness.
pub struct PermissionCache {
    entries: Mutex<HashMap<RoleId, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl PermissionCache {
    /// Default TTL balancing authorization freshness against per-request
    /// lookup cost.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Fresh entry for the role, if one exists. Expired entries are evicted
    /// on the way out.
    pub fn get(&self, role_id: RoleId) -> Option<PermissionSet> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().expect("permission cache poisoned");
        match entries.get(&role_id) {
            Some(entry) if now.duration_since(entry.stored_at) < self.ttl => {
                Some(entry.set.clone())
            }
            Some(_) => {
                entries.remove(&role_id);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, role_id: RoleId, set: PermissionSet) {
        let entry = CacheEntry {
            set,
            stored_at: self.clock.now(),
        };
        self.entries
            .lock()
            .expect("permission cache poisoned")
            .insert(role_id, entry);
    }

    /// Drop the entry for one role, forcing the next check to re-read the
    /// store. Called after grant/revoke.
    pub fn invalidate(&self, role_id: RoleId) {
        self.entries
            .lock()
            .expect("permission cache poisoned")
            .remove(&role_id);
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries
            .lock()
            .expect("permission cache poisoned")
            .clear();
    }
}

impl Default for PermissionCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test clock that only moves when told to.
    struct ManualClock {
        start: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }
    }

    fn sample_set() -> PermissionSet {
        PermissionSet::from_names(["profile.read", "scores.read"])
    }

    #[test]
    fn test_hit_within_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = PermissionCache::with_clock(Duration::from_secs(5), clock.clone());
        let role_id = RoleId::new();

        cache.insert(role_id, sample_set());
        clock.advance(Duration::from_secs(4));
        assert_eq!(cache.get(role_id), Some(sample_set()));
    }

    #[test]
    fn test_expiry_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = PermissionCache::with_clock(Duration::from_secs(5), clock.clone());
        let role_id = RoleId::new();

        cache.insert(role_id, sample_set());
        clock.advance(Duration::from_secs(5));
        assert_eq!(cache.get(role_id), None);
    }

    #[test]
    fn test_invalidate_forces_miss() {
        let cache = PermissionCache::new(Duration::from_secs(60));
        let role_id = RoleId::new();

        cache.insert(role_id, sample_set());
        cache.invalidate(role_id);
        assert_eq!(cache.get(role_id), None);
    }

    #[test]
    fn test_invalidate_is_per_role() {
        let cache = PermissionCache::new(Duration::from_secs(60));
        let a = RoleId::new();
        let b = RoleId::new();

        cache.insert(a, sample_set());
        cache.insert(b, sample_set());
        cache.invalidate(a);
        assert_eq!(cache.get(a), None);
        assert_eq!(cache.get(b), Some(sample_set()));
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = PermissionCache::new(Duration::from_secs(60));
        let a = RoleId::new();
        let b = RoleId::new();

        cache.insert(a, sample_set());
        cache.insert(b, sample_set());
        cache.clear();
        assert_eq!(cache.get(a), None);
        assert_eq!(cache.get(b), None);
    }
}
