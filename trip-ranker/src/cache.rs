//! Caching layer for trip-planner responses.
//!
//! The backend answers the same origin/destination pair identically for
//! queries a few minutes apart, so responses are cached per time bucket.
//!
//! Time bucketing (5-minute buckets) bounds cache cardinality while ensuring
//! reasonable freshness.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::planner::PlanSource;
use crate::transit::{TransitClient, TransitError, TripQuery};

/// Cache key for trip plans: (origin, destination, date, time bucket).
/// Time bucket is minutes from midnight divided by the bucket size.
type PlanKey = (String, String, NaiveDate, u16);

/// Cached plan records.
type PlanEntry = Arc<Vec<serde_json::Value>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Time bucket size in minutes.
    pub bucket_mins: u16,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
            bucket_mins: 5,
        }
    }
}

/// Cache for trip-planner responses.
pub struct TripCache {
    plans: MokaCache<PlanKey, PlanEntry>,

    /// Time bucket size in minutes (never zero).
    bucket_mins: u16,
}

impl TripCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            plans,
            bucket_mins: config.bucket_mins.max(1),
        }
    }

    /// Compute the time bucket for a departure time.
    fn time_bucket(&self, at: NaiveDateTime) -> u16 {
        let mins = (at.hour() * 60 + at.minute()) as u16;
        mins / self.bucket_mins
    }

    /// Cache key for a query departing at `at`.
    fn key(&self, query: &TripQuery, at: NaiveDateTime) -> PlanKey {
        (
            query.origin.clone(),
            query.destination.clone(),
            at.date(),
            self.time_bucket(at),
        )
    }

    pub async fn get(&self, key: &PlanKey) -> Option<PlanEntry> {
        self.plans.get(key).await
    }

    pub async fn insert(&self, key: PlanKey, entry: PlanEntry) {
        self.plans.insert(key, entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.plans.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.plans.invalidate_all();
    }
}

/// Plan source with caching.
///
/// Wraps a source (the live `TransitClient` by default) and caches its
/// responses. Errors are never cached.
pub struct CachedTransitClient<S = TransitClient> {
    source: S,
    cache: TripCache,
}

impl<S: PlanSource> CachedTransitClient<S> {
    pub fn new(source: S, cache_config: &CacheConfig) -> Self {
        Self {
            source,
            cache: TripCache::new(cache_config),
        }
    }

    /// Get raw plans for a trip, using the cache if available.
    ///
    /// Queries without a departure time are bucketed by the current local
    /// time.
    pub async fn get_trip_plans(&self, query: &TripQuery) -> Result<PlanEntry, TransitError> {
        let at = query.at.unwrap_or_else(|| Local::now().naive_local());
        let key = self.cache.key(query, at);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(origin = %query.origin, destination = %query.destination, "trip plan cache hit");
            return Ok(cached);
        }

        let plans = self.source.fetch_plans(query).await?;
        let entry = Arc::new(plans);
        self.cache.insert(key, entry.clone()).await;

        Ok(entry)
    }

    /// Access the underlying source for operations that bypass cache.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: PlanSource + Sync> PlanSource for CachedTransitClient<S> {
    async fn fetch_plans(&self, query: &TripQuery) -> Result<Vec<serde_json::Value>, TransitError> {
        let entry = self.get_trip_plans(query).await?;
        Ok(entry.as_ref().clone())
    }
}
