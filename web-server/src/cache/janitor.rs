// web-server/src/cache/janitor.rs
use actix::{Actor, Context, Handler, Message, MessageResult, AsyncContext};
use std::sync::Arc;
use std::time::Duration;

use super::TokenCache;

/// A store whose expired entries can be swept
pub trait Purge: Send + Sync {
    fn name(&self) -> &'static str;
    fn purge_expired(&self) -> usize;
}

impl<V: Clone + Send + Sync> Purge for TokenCache<V> {
    fn name(&self) -> &'static str {
        TokenCache::name(self)
    }

    fn purge_expired(&self) -> usize {
        TokenCache::purge_expired(self)
    }
}

/// Actor message: sweep all caches now
#[derive(Message)]
#[rtype(result = "usize")]
pub struct PurgeNow;

/// Periodically drops expired entries from the token caches
pub struct CacheJanitor {
    caches: Vec<Arc<dyn Purge>>,
    interval: Duration,
    purged_total: usize,
}

impl CacheJanitor {
    pub fn new(caches: Vec<Arc<dyn Purge>>, interval: Duration) -> Self {
        Self {
            caches,
            interval,
            purged_total: 0,
        }
    }

    fn sweep(&mut self) -> usize {
        let mut purged = 0;
        for cache in &self.caches {
            let count = cache.purge_expired();
            if count > 0 {
                tracing::debug!(cache = cache.name(), "Purged {} expired entries", count);
            }
            purged += count;
        }
        self.purged_total += purged;
        purged
    }
}

impl Actor for CacheJanitor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(
            "CacheJanitor started for {} caches, interval {}s",
            self.caches.len(),
            self.interval.as_secs()
        );

        ctx.run_interval(self.interval, |act, _ctx| {
            let purged = act.sweep();
            if purged > 0 {
                tracing::info!("Cleaned up {} expired cache entries", purged);
            }
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("CacheJanitor stopped, {} entries expired during lifetime", self.purged_total);
    }
}

impl Handler<PurgeNow> for CacheJanitor {
    type Result = MessageResult<PurgeNow>;

    fn handle(&mut self, _msg: PurgeNow, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.sweep())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[actix::test]
    async fn test_purge_now_sweeps_every_cache() {
        let sessions = Arc::new(TokenCache::new("sessions", ChronoDuration::hours(2)));
        let privileges = Arc::new(TokenCache::new("privileges", ChronoDuration::minutes(10)));

        sessions.put("expired", "a".to_string(), ChronoDuration::seconds(-1));
        sessions.put("live", "b".to_string(), ChronoDuration::hours(1));
        privileges.put("expired", "c".to_string(), ChronoDuration::seconds(-1));

        let janitor = CacheJanitor::new(
            vec![sessions.clone() as Arc<dyn Purge>, privileges.clone() as Arc<dyn Purge>],
            Duration::from_secs(3600),
        )
        .start();

        let purged = janitor.send(PurgeNow).await.unwrap();
        assert_eq!(purged, 2);
        assert_eq!(sessions.len(), 1);
        assert!(privileges.is_empty());
    }
}
