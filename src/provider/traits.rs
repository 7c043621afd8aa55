//! Market data provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{CompanyProfile, Interval, Period, RawBar};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source.
/// The service owns validation, caching, retries and post-processing;
/// a provider only translates a request into wire calls and maps the
/// response into [`RawBar`]s or a [`CompanyProfile`].
///
/// Error mapping contract: an identifier the provider does not know must
/// be `SymbolNotFound` (terminal), while transport and provider-side
/// failures must be `Provider` (retryable). A known symbol with no bars
/// may be returned as an empty list; the service reports it as not found
/// after cleaning.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    /// Used for logging and error attribution.
    fn id(&self) -> &'static str;

    /// Fetch historical OHLCV bars for `symbol` over `period` at
    /// `interval` granularity, ordered by timestamp ascending.
    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<RawBar>, MarketDataError>;

    /// Fetch company fundamentals for `symbol`.
    ///
    /// Fields the provider does not report must be left `None`, never
    /// filled with zeros.
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError>;
}
