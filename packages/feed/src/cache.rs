//! Time-bounded cache for a feed's record set.
//!
//! Holds at most one entry. Freshness is checked when the cache is read;
//! there is no background expiry.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::RecordSet;

#[derive(Debug, Clone)]
struct CacheEntry {
    records: RecordSet,
    populated_at: Instant,
    fetched_at: DateTime<Utc>,
}

/// A single cached [`RecordSet`] with a time-to-live.
#[derive(Debug, Clone)]
pub struct RecordCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl RecordCache {
    /// Creates an empty cache whose entries expire after `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Time-to-live applied to entries.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached records if the entry is still fresh.
    #[must_use]
    pub fn get(&self) -> Option<RecordSet> {
        self.entry
            .as_ref()
            .filter(|e| e.populated_at.elapsed() < self.ttl)
            .map(|e| RecordSet::clone(&e.records))
    }

    /// Replaces the entry. The TTL starts now.
    pub fn store(&mut self, records: RecordSet) {
        self.entry = Some(CacheEntry {
            records,
            populated_at: Instant::now(),
            fetched_at: Utc::now(),
        });
    }

    /// Drops the entry so the next read misses.
    pub fn clear(&mut self) {
        self.entry = None;
    }

    /// Wall-clock time the current entry was stored, fresh or not.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::empty_record_set;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn empty_cache_misses() {
        let cache = RecordCache::new(TTL);
        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn entry_is_fresh_within_ttl() {
        let mut cache = RecordCache::new(TTL);
        let records = empty_record_set();
        cache.store(Arc::clone(&records));

        tokio::time::advance(Duration::from_secs(59)).await;
        let hit = cache.get().unwrap();
        assert!(Arc::ptr_eq(&hit, &records));
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_at_ttl() {
        let mut cache = RecordCache::new(TTL);
        cache.store(empty_record_set());

        tokio::time::advance(TTL).await;
        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn clear_drops_entry() {
        let mut cache = RecordCache::new(TTL);
        cache.store(empty_record_set());
        cache.clear();
        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn store_restarts_ttl() {
        let mut cache = RecordCache::new(TTL);
        cache.store(empty_record_set());
        tokio::time::advance(Duration::from_secs(50)).await;
        cache.store(empty_record_set());
        tokio::time::advance(Duration::from_secs(50)).await;
        assert!(cache.get().is_some());
    }
}
