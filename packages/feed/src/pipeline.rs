//! The ingestion pipeline: fetch, normalize, cache.
//!
//! A [`FeedPipeline`] owns its cache. Callers only see
//! [`FeedPipeline::load_records`] and [`FeedPipeline::clear_cache`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use quake_map_feed_models::FeedDefinition;
use tokio::sync::Mutex;

use crate::cache::RecordCache;
use crate::fetch::{FeedFetcher, HttpFetcher};
use crate::normalize::normalize_features;
use crate::{FeedError, RecordSet, empty_record_set};

#[derive(Debug)]
struct PipelineState {
    cache: RecordCache,
    diagnostic: Option<String>,
}

/// Loads and caches the normalized records of one feed.
///
/// The whole check-fetch-store sequence runs under one lock, so callers
/// arriving while the cache is cold wait for the in-flight fetch instead
/// of starting their own.
pub struct FeedPipeline {
    feed: FeedDefinition,
    fetcher: Arc<dyn FeedFetcher>,
    state: Mutex<PipelineState>,
    /// Transport failures so far. Read before locking to tell whether a
    /// fetch failed while the caller was waiting.
    failures: AtomicU64,
}

impl FeedPipeline {
    /// Creates a pipeline for `feed` using the given fetcher.
    #[must_use]
    pub fn new(feed: FeedDefinition, fetcher: Arc<dyn FeedFetcher>) -> Self {
        let cache = RecordCache::new(feed.ttl());
        Self {
            feed,
            fetcher,
            state: Mutex::new(PipelineState {
                cache,
                diagnostic: None,
            }),
            failures: AtomicU64::new(0),
        }
    }

    /// Creates a pipeline that fetches over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the HTTP client cannot be built.
    pub fn http(feed: FeedDefinition) -> Result<Self, FeedError> {
        Ok(Self::new(feed, Arc::new(HttpFetcher::new()?)))
    }

    /// The feed this pipeline serves.
    #[must_use]
    pub const fn feed(&self) -> &FeedDefinition {
        &self.feed
    }

    /// Returns the feed's records, fetching only when the cache is stale.
    ///
    /// Never fails. A transport failure yields an empty set, is not
    /// cached, and leaves a message for [`Self::last_diagnostic`]. A
    /// malformed body is cached as an empty set like a feed with no
    /// events.
    ///
    /// Callers that were already waiting on the lock when a fetch failed
    /// get the empty set without fetching again, so an unreachable feed
    /// costs one timeout per wave of callers rather than one per caller.
    pub async fn load_records(&self) -> RecordSet {
        let failures_seen = self.failures.load(Ordering::Acquire);
        let mut state = self.state.lock().await;

        if let Some(records) = state.cache.get() {
            log::debug!("{}: serving {} cached records", self.feed.id, records.len());
            return records;
        }

        if self.failures.load(Ordering::Acquire) != failures_seen {
            log::debug!("{}: fetch failed while waiting, not retrying", self.feed.id);
            return empty_record_set();
        }

        match self.fetch_and_normalize().await {
            Ok(records) => {
                state.diagnostic = None;
                state.cache.store(RecordSet::clone(&records));
                records
            }
            Err(e) if e.is_transport() => {
                self.failures.fetch_add(1, Ordering::Release);
                log::error!("{}: data retrieval failed: {e}", self.feed.id);
                state.diagnostic = Some(format!(
                    "Data retrieval error from {}: {e}. Check your connection or the feed status.",
                    self.feed.name
                ));
                empty_record_set()
            }
            Err(e) => {
                log::warn!("{}: treating feed as empty: {e}", self.feed.id);
                state.diagnostic = Some(format!("{} returned unreadable data: {e}", self.feed.name));
                let records = empty_record_set();
                state.cache.store(RecordSet::clone(&records));
                records
            }
        }
    }

    /// Drops the cached records so the next [`Self::load_records`] call
    /// fetches regardless of the TTL.
    pub async fn clear_cache(&self) {
        log::debug!("{}: cache cleared", self.feed.id);
        self.state.lock().await.cache.clear();
    }

    /// Message describing why the most recent fetch failed, if it did.
    pub async fn last_diagnostic(&self) -> Option<String> {
        self.state.lock().await.diagnostic.clone()
    }

    /// When the cached records were fetched.
    pub async fn cached_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.cache.fetched_at()
    }

    /// Fetches and normalizes the feed, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the fetch fails or the body is not JSON.
    pub async fn fetch_and_normalize(&self) -> Result<RecordSet, FeedError> {
        let start = Instant::now();
        let features = self.fetcher.fetch(&self.feed).await?;
        let records = normalize_features(&features, &self.feed);

        log::info!(
            "{}: loaded {} records from {} features in {:.2?}",
            self.feed.id,
            records.len(),
            features.len(),
            start.elapsed()
        );

        Ok(records.into())
    }
}
