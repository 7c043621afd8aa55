//! The market data service: validation, caching, retries and
//! post-processing around a [`MarketDataProvider`].
//!
//! The presentation layer holds one service instance and calls it on
//! demand; everything returned is either a structured result or a
//! [`MarketDataError`]. Nothing is persisted outside process memory.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use tokio::sync::watch;
use tokio::time::sleep;

use crate::cache::{CacheStats, CacheTtl, DataCache, INDICES_KEY};
use crate::errors::{MarketDataError, RetryClass, RetryPolicy};
use crate::models::{
    sample_news, CompanyProfile, IndexSnapshot, Interval, NewsItem, Period, PriceSeries,
    MARKET_INDICES,
};
use crate::provider::MarketDataProvider;

/// Tunables for the service. All fields have sensible defaults.
#[derive(Clone, Copy, Debug)]
pub struct ServiceConfig {
    /// Total fetch attempts per request, including the first.
    pub max_retries: u32,
    /// Base backoff delay; the wait after attempt `n` is `retry_delay * n`.
    pub retry_delay: Duration,
    /// Per-kind cache time-to-live settings.
    pub cache_ttl: CacheTtl,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            cache_ttl: CacheTtl::default(),
        }
    }
}

/// Progress of a multi-symbol fetch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

/// Outcome of a multi-symbol fetch: per-symbol successes plus the
/// symbols that failed, with their errors. A failed symbol never aborts
/// the rest of the batch.
#[derive(Clone, Debug, Default)]
pub struct BatchResult {
    pub series: HashMap<String, Arc<PriceSeries>>,
    pub failed: Vec<(String, MarketDataError)>,
}

impl BatchResult {
    /// Symbols that could not be fetched.
    pub fn failed_symbols(&self) -> Vec<&str> {
        self.failed.iter().map(|(s, _)| s.as_str()).collect()
    }
}

/// Cached, retrying market data access over an injected provider.
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    cache: DataCache,
    retry: RetryPolicy,
    progress: watch::Sender<BatchProgress>,
}

impl MarketDataService {
    /// Create a service with default configuration.
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self::with_config(provider, ServiceConfig::default())
    }

    /// Create a service with explicit retry and cache settings.
    pub fn with_config(provider: Arc<dyn MarketDataProvider>, config: ServiceConfig) -> Self {
        let (progress, _) = watch::channel(BatchProgress::default());
        Self {
            provider,
            cache: DataCache::new(config.cache_ttl),
            retry: RetryPolicy::new(config.max_retries, config.retry_delay),
            progress,
        }
    }

    // ========================================================================
    // Series
    // ========================================================================

    /// Fetch the enriched OHLCV series for one symbol.
    ///
    /// Serves a fresh cache entry when one exists; otherwise fetches with
    /// retries, cleans and enriches the bars, caches the result and
    /// returns it. An empty result after cleaning is `SymbolNotFound`,
    /// never a silently empty series.
    pub async fn get_stock_series(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Arc<PriceSeries>, MarketDataError> {
        let symbol = validate_symbol(symbol)?;
        let key = format!("{symbol}|{period}|{interval}");

        self.cache
            .series()
            .try_get_with(key, self.load_series(&symbol, period, interval))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn load_series(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Arc<PriceSeries>, MarketDataError> {
        let provider = &*self.provider;
        let raw = self
            .retry_with_backoff(symbol, || provider.fetch_history(symbol, period, interval))
            .await?;

        let series = PriceSeries::from_raw(symbol, raw);
        if series.is_empty() {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        debug!(
            "Loaded {} bars for {} ({} @ {})",
            series.len(),
            symbol,
            period,
            interval
        );
        Ok(Arc::new(series))
    }

    /// Fetch several symbols, one at a time, at daily granularity.
    ///
    /// Progress is published on the watch channel returned by
    /// [`subscribe_progress`](Self::subscribe_progress); publishing never
    /// blocks on an observer being attached.
    pub async fn get_multiple_series(&self, symbols: &[&str], period: Period) -> BatchResult {
        let total = symbols.len();
        self.progress
            .send_replace(BatchProgress { completed: 0, total });

        let mut result = BatchResult::default();
        for (i, &symbol) in symbols.iter().enumerate() {
            match self.get_stock_series(symbol, period, Interval::OneDay).await {
                Ok(series) => {
                    result.series.insert(symbol.to_string(), series);
                }
                Err(err) => {
                    warn!("Failed to load {}: {}", symbol, err);
                    result.failed.push((symbol.to_string(), err));
                }
            }
            self.progress.send_replace(BatchProgress {
                completed: i + 1,
                total,
            });
        }

        result
    }

    /// Observe batch fetch progress without affecting completion.
    pub fn subscribe_progress(&self) -> watch::Receiver<BatchProgress> {
        self.progress.subscribe()
    }

    // ========================================================================
    // Indices
    // ========================================================================

    /// Snapshot the fixed set of market indices over a 5-day daily window.
    ///
    /// An index with fewer than 2 bars, or whose fetch failed, is logged
    /// at warning level and omitted; the call itself always succeeds.
    pub async fn get_market_indices(&self) -> Arc<HashMap<String, IndexSnapshot>> {
        self.cache
            .indices()
            .get_with(INDICES_KEY, self.load_indices())
            .await
    }

    async fn load_indices(&self) -> Arc<HashMap<String, IndexSnapshot>> {
        let mut map = HashMap::new();

        for (name, symbol) in MARKET_INDICES {
            match self
                .get_stock_series(symbol, Period::FiveDays, Interval::OneDay)
                .await
            {
                Ok(series) => match IndexSnapshot::from_series(name, symbol, series) {
                    Some(snapshot) => {
                        map.insert(name.to_string(), snapshot);
                    }
                    None => warn!("Insufficient data for index {} ({})", name, symbol),
                },
                Err(err) => warn!("Failed to fetch index {} ({}): {}", name, symbol, err),
            }
        }

        Arc::new(map)
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Fetch company fundamentals for one symbol.
    ///
    /// A total fetch failure is an `Err`; fields the provider omitted are
    /// `None` inside an `Ok` profile. The two are never conflated.
    pub async fn get_company_profile(
        &self,
        symbol: &str,
    ) -> Result<Arc<CompanyProfile>, MarketDataError> {
        let symbol = validate_symbol(symbol)?;

        self.cache
            .profiles()
            .try_get_with(symbol.clone(), self.load_profile(&symbol))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn load_profile(&self, symbol: &str) -> Result<Arc<CompanyProfile>, MarketDataError> {
        let provider = &*self.provider;
        let profile = self
            .retry_with_backoff(symbol, || provider.fetch_profile(symbol))
            .await?;
        Ok(Arc::new(profile))
    }

    // ========================================================================
    // News
    // ========================================================================

    /// Up to `count` news items for a symbol, newest first.
    ///
    /// Currently a synthetic placeholder generator behind the same
    /// validation and cache discipline as the real fetches; timestamps
    /// are relative to the time the batch was generated.
    pub async fn get_stock_news(
        &self,
        symbol: &str,
        count: usize,
    ) -> Result<Arc<Vec<NewsItem>>, MarketDataError> {
        let symbol = validate_symbol(symbol)?;
        let key = format!("{symbol}|{count}");
        let items = self
            .cache
            .news()
            .get_with(key, async { Arc::new(sample_news(&symbol, count, Utc::now())) })
            .await;
        Ok(items)
    }

    // ========================================================================
    // Cache control
    // ========================================================================

    /// Drop every cached entry regardless of freshness.
    pub fn clear_cache(&self) {
        debug!("Clearing all market data caches");
        self.cache.clear_all();
    }

    /// Cache entry counts, for diagnostics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // ========================================================================
    // Retry loop
    // ========================================================================

    /// Run `op` until it succeeds, a terminal error occurs, or the
    /// attempt budget is spent, sleeping the configured backoff between
    /// attempts. Exhaustion surfaces the last error as the cause.
    async fn retry_with_backoff<T, F, Fut>(
        &self,
        what: &str,
        mut op: F,
    ) -> Result<T, MarketDataError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MarketDataError>>,
    {
        let max = self.retry.max_attempts;
        let mut last_err = None;

        for attempt in 1..=max {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => match err.retry_class() {
                    RetryClass::Never => return Err(err),
                    RetryClass::WithBackoff => {
                        warn!("Attempt {}/{} failed for {}: {}", attempt, max, what, err);
                        last_err = Some(err);
                        if attempt < max {
                            sleep(self.retry.delay_for(attempt)).await;
                        }
                    }
                },
            }
        }

        let cause = last_err.unwrap_or_else(|| MarketDataError::Provider {
            provider: self.provider.id().to_string(),
            message: "no attempts were made".to_string(),
        });
        Err(MarketDataError::RetriesExhausted {
            attempts: max,
            cause: Box::new(cause),
        })
    }
}

/// Check the symbol is a plausible ticker and normalize it to uppercase.
fn validate_symbol(symbol: &str) -> Result<String, MarketDataError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(MarketDataError::Configuration(
            "symbol must not be empty".to_string(),
        ));
    }
    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(MarketDataError::Configuration(format!(
            "invalid symbol: {trimmed}"
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}
