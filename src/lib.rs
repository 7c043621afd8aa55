//! Market data access core for a stock dashboard.
//!
//! This crate fetches, caches and enriches market data behind a single
//! service facade. It is the data layer only: no rendering, no
//! persistence, no scheduling.
//!
//! # Core types
//!
//! - [`MarketDataService`]: validation, per-kind TTL caching, retrying
//!   fetches and batch orchestration over an injected provider.
//! - [`MarketDataProvider`]: the seam a data source implements; the
//!   built-in [`YahooProvider`](provider::YahooProvider) talks to Yahoo
//!   Finance.
//! - [`PriceSeries`]: cleaned OHLCV bars enriched with returns, rolling
//!   volatility, volume statistics and support/resistance levels.
//! - [`IndexSnapshot`]: a compact day-over-day view of one market index.
//! - [`CompanyProfile`]: fundamentals where absent values stay absent.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use stockdash_market_data::{
//!     Interval, MarketDataService, Period, provider::YahooProvider,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MarketDataService::new(Arc::new(YahooProvider::new()?));
//! let series = service
//!     .get_stock_series("AAPL", Period::OneYear, Interval::OneDay)
//!     .await?;
//! println!("{} bars for {}", series.len(), series.symbol);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod errors;
pub mod format;
pub mod models;
pub mod provider;
pub mod quality;
pub mod service;

pub use cache::{CacheStats, CacheTtl};
pub use errors::{MarketDataError, RetryClass, RetryPolicy};
pub use models::{
    CompanyProfile, IndexSnapshot, Interval, NewsItem, Period, PriceBar, PriceSeries, RawBar,
    MARKET_INDICES, ROLLING_WINDOW,
};
pub use provider::MarketDataProvider;
pub use quality::{data_quality_report, DataQualityReport, QualitySummary};
pub use service::{BatchProgress, BatchResult, MarketDataService, ServiceConfig};
