// web-server/src/cache/mod.rs
pub mod janitor;
pub mod trip_index;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

pub use janitor::{CacheJanitor, Purge};
pub use trip_index::{InMemoryTripIndex, TripIndex};

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Expiring key/value store shared by all in-flight requests.
///
/// Every entry carries its own absolute expiry. Expired entries are never
/// returned; they are dropped on read and by [`TokenCache::purge_expired`].
pub struct TokenCache<V> {
    name: &'static str,
    entries: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<V: Clone> TokenCache<V> {
    pub fn new(name: &'static str, default_ttl: Duration) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            default_ttl,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.put_at(key, value, ttl, Utc::now());
    }

    /// Store `value` with the cache's default lifetime
    pub fn put_default(&self, key: impl Into<String>, value: V) {
        self.put(key, value, self.default_ttl);
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Utc::now())
    }

    pub(crate) fn put_at(&self, key: impl Into<String>, value: V, ttl: Duration, now: DateTime<Utc>) {
        let key = key.into();
        tracing::trace!(cache = self.name, "Storing entry, expires in {}s", ttl.num_seconds());
        self.entries.insert(key, CacheEntry {
            value,
            expires_at: now + ttl,
        });
    }

    pub(crate) fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<V> {
        // The read guard must be released before removing from the same shard
        let expired = match self.entries.get(key) {
            Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
            tracing::debug!(cache = self.name, "Dropped expired entry on read");
        }

        None
    }

    pub(crate) fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let live = entry.expires_at > now;
            if !live {
                removed += 1;
            }
            live
        });
        removed
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_put_then_get() {
        let cache = TokenCache::new("test", Duration::minutes(10));
        cache.put_default("session", "token".to_string());

        assert_eq!(cache.get("session").as_deref(), Some("token"));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = TokenCache::new("test", Duration::minutes(10));
        cache.put_default("k", 1u32);
        cache.put_default("k", 2u32);

        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entry_expires_exactly_at_ttl() {
        let cache = TokenCache::new("test", Duration::minutes(10));
        let t0 = Utc::now();
        let ttl = Duration::hours(2);
        let epsilon = Duration::milliseconds(1);

        cache.put_at("session", "id-token".to_string(), ttl, t0);

        assert_eq!(cache.get_at("session", t0 + ttl - epsilon).as_deref(), Some("id-token"));
        assert_eq!(cache.get_at("session", t0 + ttl + epsilon), None);
        // the expired read also evicted the entry
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entries_have_independent_ttls() {
        let cache = TokenCache::new("test", Duration::minutes(10));
        let t0 = Utc::now();
        cache.put_at("short", 1u8, Duration::seconds(5), t0);
        cache.put_at("long", 2u8, Duration::hours(1), t0);

        let later = t0 + Duration::seconds(10);
        assert_eq!(cache.get_at("short", later), None);
        assert_eq!(cache.get_at("long", later), Some(2));
    }

    #[test]
    fn test_purge_expired() {
        let cache = TokenCache::new("test", Duration::minutes(10));
        let t0 = Utc::now();
        cache.put_at("a", 1u8, Duration::seconds(1), t0);
        cache.put_at("b", 2u8, Duration::seconds(1), t0);
        cache.put_at("c", 3u8, Duration::hours(1), t0);

        assert_eq!(cache.purge_expired_at(t0 + Duration::seconds(2)), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let cache = Arc::new(TokenCache::new("test", Duration::minutes(10)));

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for i in 0..200 {
                        let key = format!("{}-{}", worker, i);
                        cache.put_default(key.clone(), key.clone());
                        assert_eq!(cache.get(&key), Some(key));
                    }
                });
            }
        });

        assert_eq!(cache.len(), 8 * 200);
    }
}
