//! In-memory TTL caches for fetched market data, using moka.
//!
//! Each data kind gets its own cache with its own time-to-live, so a
//! stale entry is never served: moka drops it and the caller refetches.
//! Lookups that miss go through `try_get_with`/`get_with`, which coalesce
//! concurrent loads of the same key into a single provider fetch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::models::{CompanyProfile, IndexSnapshot, NewsItem, PriceSeries};

/// Cache key for the single market-indices entry.
pub(crate) const INDICES_KEY: &str = "market_indices";

/// Per-kind time-to-live settings.
#[derive(Clone, Copy, Debug)]
pub struct CacheTtl {
    /// OHLCV series (5 minutes).
    pub series: Duration,
    /// Market index snapshots (10 minutes).
    pub indices: Duration,
    /// Company profiles (1 hour).
    pub profiles: Duration,
    /// News batches (30 minutes).
    pub news: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            series: Duration::from_secs(300),
            indices: Duration::from_secs(600),
            profiles: Duration::from_secs(3600),
            news: Duration::from_secs(1800),
        }
    }
}

/// In-memory market data cache with kind-specific TTLs.
pub struct DataCache {
    series: Cache<String, Arc<PriceSeries>>,
    indices: Cache<&'static str, Arc<HashMap<String, IndexSnapshot>>>,
    profiles: Cache<String, Arc<CompanyProfile>>,
    news: Cache<String, Arc<Vec<NewsItem>>>,
}

impl DataCache {
    /// Create a cache with the given TTLs.
    pub fn new(ttl: CacheTtl) -> Self {
        Self {
            series: Cache::builder()
                .time_to_live(ttl.series)
                .max_capacity(1000)
                .build(),
            indices: Cache::builder()
                .time_to_live(ttl.indices)
                .max_capacity(4)
                .build(),
            profiles: Cache::builder()
                .time_to_live(ttl.profiles)
                .max_capacity(500)
                .build(),
            news: Cache::builder()
                .time_to_live(ttl.news)
                .max_capacity(500)
                .build(),
        }
    }

    pub(crate) fn series(&self) -> &Cache<String, Arc<PriceSeries>> {
        &self.series
    }

    pub(crate) fn indices(&self) -> &Cache<&'static str, Arc<HashMap<String, IndexSnapshot>>> {
        &self.indices
    }

    pub(crate) fn profiles(&self) -> &Cache<String, Arc<CompanyProfile>> {
        &self.profiles
    }

    pub(crate) fn news(&self) -> &Cache<String, Arc<Vec<NewsItem>>> {
        &self.news
    }

    /// Drop every entry in every cache, regardless of freshness.
    pub fn clear_all(&self) {
        self.series.invalidate_all();
        self.indices.invalidate_all();
        self.profiles.invalidate_all();
        self.news.invalidate_all();
    }

    /// Entry counts per kind, for diagnostics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            series_count: self.series.entry_count() as usize,
            indices_count: self.indices.entry_count() as usize,
            profiles_count: self.profiles.entry_count() as usize,
            news_count: self.news.entry_count() as usize,
        }
    }
}

impl Default for DataCache {
    fn default() -> Self {
        Self::new(CacheTtl::default())
    }
}

/// Cache entry counts per data kind.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub series_count: usize,
    pub indices_count: usize,
    pub profiles_count: usize,
    pub news_count: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.series_count + self.indices_count + self.profiles_count + self.news_count
    }
}
