//! End-to-end service behavior against a scripted in-memory provider:
//! caching, retries, batch fetches, index snapshots and profiles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use stockdash_market_data::{
    CompanyProfile, Interval, MarketDataError, MarketDataProvider, MarketDataService, Period,
    RawBar, ServiceConfig, MARKET_INDICES,
};

/// Provider whose responses are scripted per symbol. The first
/// `fail_first` history calls fail with a retryable error regardless of
/// symbol, to exercise the retry loop.
struct MockProvider {
    bars: HashMap<String, Vec<RawBar>>,
    profiles: HashMap<String, CompanyProfile>,
    fail_first: usize,
    history_calls: AtomicUsize,
    profile_calls: AtomicUsize,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            bars: HashMap::new(),
            profiles: HashMap::new(),
            fail_first: 0,
            history_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
        }
    }

    fn with_bars(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    fn with_profile(mut self, symbol: &str, profile: CompanyProfile) -> Self {
        self.profiles.insert(symbol.to_string(), profile);
        self
    }

    fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        _period: Period,
        _interval: Interval,
    ) -> Result<Vec<RawBar>, MarketDataError> {
        let call = self.history_calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(MarketDataError::Provider {
                provider: "MOCK".to_string(),
                message: "scripted transient failure".to_string(),
            });
        }
        match self.bars.get(symbol) {
            Some(bars) => Ok(bars.clone()),
            None => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        match self.profiles.get(symbol) {
            Some(profile) => Ok(profile.clone()),
            None => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
        }
    }
}

fn daily_bars(start_close: f64, n: usize) -> Vec<RawBar> {
    (0..n)
        .map(|i| {
            let ts = Utc
                .timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0)
                .single()
                .unwrap();
            let close = start_close + i as f64;
            RawBar::complete(ts, close, close + 1.0, close - 1.0, close, 1_000 + i as u64)
        })
        .collect()
}

fn fast_config() -> ServiceConfig {
    ServiceConfig {
        retry_delay: Duration::ZERO,
        ..ServiceConfig::default()
    }
}

fn service_with(provider: MockProvider) -> (MarketDataService, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let service = MarketDataService::with_config(provider.clone(), fast_config());
    (service, provider)
}

#[tokio::test]
async fn test_series_is_fetched_once_then_served_from_cache() {
    let (service, provider) =
        service_with(MockProvider::new().with_bars("AAPL", daily_bars(100.0, 30)));

    let first = service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap();
    let second = service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap();

    assert_eq!(provider.history_calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 30);
}

#[tokio::test]
async fn test_distinct_parameters_are_distinct_cache_entries() {
    let (service, provider) =
        service_with(MockProvider::new().with_bars("AAPL", daily_bars(100.0, 30)));

    service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap();
    service
        .get_stock_series("AAPL", Period::OneMonth, Interval::OneDay)
        .await
        .unwrap();

    assert_eq!(provider.history_calls(), 2);
}

#[tokio::test]
async fn test_transient_failures_are_retried_to_success() {
    let (service, provider) = service_with(
        MockProvider::new()
            .with_bars("AAPL", daily_bars(100.0, 5))
            .failing_first(2),
    );

    let series = service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap();

    assert_eq!(provider.history_calls(), 3);
    assert_eq!(series.len(), 5);
}

#[tokio::test]
async fn test_persistent_failure_exhausts_attempts() {
    let (service, provider) = service_with(
        MockProvider::new()
            .with_bars("AAPL", daily_bars(100.0, 5))
            .failing_first(10),
    );

    let err = service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap_err();

    assert_eq!(provider.history_calls(), 3);
    match err {
        MarketDataError::RetriesExhausted { attempts, cause } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*cause, MarketDataError::Provider { .. }));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_symbol_is_not_retried() {
    let (service, provider) = service_with(MockProvider::new());

    let err = service
        .get_stock_series("NOPE", Period::OneYear, Interval::OneDay)
        .await
        .unwrap_err();

    assert_eq!(provider.history_calls(), 1);
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
}

#[tokio::test]
async fn test_invalid_symbol_fails_before_any_fetch() {
    let (service, provider) = service_with(MockProvider::new());

    let err = service
        .get_stock_series("  ", Period::OneYear, Interval::OneDay)
        .await
        .unwrap_err();

    assert_eq!(provider.history_calls(), 0);
    assert!(matches!(err, MarketDataError::Configuration(_)));
}

#[tokio::test]
async fn test_empty_history_is_reported_as_not_found() {
    let (service, _provider) = service_with(MockProvider::new().with_bars("GHOST", vec![]));

    let err = service
        .get_stock_series("GHOST", Period::OneYear, Interval::OneDay)
        .await
        .unwrap_err();

    assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
}

#[tokio::test]
async fn test_batch_keeps_going_past_failures() {
    let (service, _provider) = service_with(
        MockProvider::new()
            .with_bars("AAPL", daily_bars(100.0, 10))
            .with_bars("MSFT", daily_bars(300.0, 10)),
    );

    let result = service
        .get_multiple_series(&["AAPL", "BADSYM", "MSFT"], Period::OneMonth)
        .await;

    assert_eq!(result.series.len(), 2);
    assert!(result.series.contains_key("AAPL"));
    assert!(result.series.contains_key("MSFT"));
    assert_eq!(result.failed_symbols(), vec!["BADSYM"]);
    assert!(matches!(
        result.failed[0].1,
        MarketDataError::SymbolNotFound(_)
    ));
}

#[tokio::test]
async fn test_batch_progress_reaches_total() {
    let (service, _provider) =
        service_with(MockProvider::new().with_bars("AAPL", daily_bars(100.0, 10)));

    let progress = service.subscribe_progress();
    service
        .get_multiple_series(&["AAPL", "BADSYM"], Period::OneMonth)
        .await;

    let last = *progress.borrow();
    assert_eq!(last.completed, 2);
    assert_eq!(last.total, 2);
}

#[tokio::test]
async fn test_market_indices_skip_thin_series() {
    let mut provider = MockProvider::new();
    for (_, symbol) in MARKET_INDICES {
        provider = provider.with_bars(symbol, daily_bars(1_000.0, 5));
    }
    // VIX gets a single bar, too thin for a day-over-day snapshot
    provider = provider.with_bars("^VIX", daily_bars(15.0, 1));
    let (service, _provider) = service_with(provider);

    let indices = service.get_market_indices().await;

    assert_eq!(indices.len(), MARKET_INDICES.len() - 1);
    assert!(!indices.contains_key("VIX"));

    let sp500 = &indices["S&P 500"];
    assert_eq!(sp500.symbol, "^GSPC");
    assert!((sp500.current - 1_004.0).abs() < 1e-9);
    assert!((sp500.change - 1.0).abs() < 1e-9);
    assert!(sp500.change_pct > 0.0);
}

#[tokio::test]
async fn test_market_indices_are_cached_as_one_unit() {
    let mut provider = MockProvider::new();
    for (_, symbol) in MARKET_INDICES {
        provider = provider.with_bars(symbol, daily_bars(1_000.0, 5));
    }
    let (service, provider) = service_with(provider);

    service.get_market_indices().await;
    let calls_after_first = provider.history_calls();
    service.get_market_indices().await;

    assert_eq!(provider.history_calls(), calls_after_first);
}

#[tokio::test]
async fn test_clear_cache_forces_refetch() {
    let (service, provider) =
        service_with(MockProvider::new().with_bars("AAPL", daily_bars(100.0, 10)));

    service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap();
    service.clear_cache();
    service
        .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
        .await
        .unwrap();

    assert_eq!(provider.history_calls(), 2);
}

#[tokio::test]
async fn test_profile_fetch_and_cache() {
    let mut profile = CompanyProfile::new("AAPL");
    profile.name = Some("Apple Inc.".to_string());
    profile.market_cap = Some(3.0e12);

    let (service, provider) = service_with(MockProvider::new().with_profile("AAPL", profile));

    let first = service.get_company_profile("AAPL").await.unwrap();
    let second = service.get_company_profile("aapl").await.unwrap();

    assert_eq!(provider.profile_calls.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name.as_deref(), Some("Apple Inc."));
    assert_eq!(first.pe_ratio, None);
}

#[tokio::test]
async fn test_profile_failure_is_an_error_not_an_empty_profile() {
    let (service, _provider) = service_with(MockProvider::new());

    let err = service.get_company_profile("NOPE").await.unwrap_err();
    assert!(matches!(err, MarketDataError::SymbolNotFound(_)));
}

#[tokio::test]
async fn test_news_is_deterministic_while_cached() {
    let (service, _provider) = service_with(MockProvider::new());

    let first = service.get_stock_news("AAPL", 3).await.unwrap();
    let second = service.get_stock_news("AAPL", 3).await.unwrap();

    assert_eq!(first.len(), 3);
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first[0].published_at >= first[1].published_at);
}

#[tokio::test]
async fn test_news_symbol_is_validated_and_normalized() {
    let (service, _provider) = service_with(MockProvider::new());

    // Case variants share one cache entry
    let lower = service.get_stock_news("aapl", 3).await.unwrap();
    let upper = service.get_stock_news("AAPL", 3).await.unwrap();
    assert!(Arc::ptr_eq(&lower, &upper));
    assert!(lower[0].title.contains("AAPL"));

    let err = service.get_stock_news("  ", 3).await.unwrap_err();
    assert!(matches!(err, MarketDataError::Configuration(_)));
}
