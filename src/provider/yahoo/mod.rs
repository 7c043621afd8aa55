//! Yahoo Finance market data provider.
//!
//! History comes from the chart API via the `yahoo_finance_api` crate;
//! fundamentals come from the quoteSummary API, which needs the
//! crumb/cookie authentication dance.

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{CompanyProfile, Interval, Period, RawBar};
use crate::provider::MarketDataProvider;

use models::{QuoteSummaryResponse, QuoteSummaryResult, RawNum};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const QUOTE_SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Process-wide cache for the Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| MarketDataError::Provider {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to initialize Yahoo connector: {}", e),
        })?;
        Ok(Self {
            connector,
            client: reqwest::Client::new(),
        })
    }

    fn provider_error(message: String) -> MarketDataError {
        MarketDataError::Provider {
            provider: PROVIDER_ID.to_string(),
            message,
        }
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap_or_else(|p| p.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| Self::provider_error("Failed to parse Yahoo cookie".to_string()))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    // ========================================================================
    // Bar Conversion
    // ========================================================================

    /// Convert a Yahoo chart quote into a raw bar.
    ///
    /// Non-finite or non-positive prices become `None` so the cleaning
    /// pass can forward-fill them; a bar with an invalid timestamp is
    /// skipped entirely.
    fn yahoo_quote_to_bar(quote: &yahoo::Quote) -> Option<RawBar> {
        let timestamp = Utc.timestamp_opt(quote.timestamp as i64, 0).single()?;

        Some(RawBar {
            timestamp,
            open: positive_price(quote.open),
            high: positive_price(quote.high),
            low: positive_price(quote.low),
            close: positive_price(quote.close),
            volume: Some(quote.volume),
        })
    }

    // ========================================================================
    // Profile Fetching
    // ========================================================================

    async fn fetch_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<QuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            encode(symbol),
            QUOTE_SUMMARY_MODULES,
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Profile request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(Self::provider_error(
                "Yahoo authentication expired".to_string(),
            ));
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
        }

        let data: QuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to parse profile response: {}", e)))?;

        data.quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    fn map_quote_summary_to_profile(symbol: &str, result: &QuoteSummaryResult) -> CompanyProfile {
        let price = result.price.as_ref();
        let summary = result.summary_profile.as_ref();
        let detail = result.summary_detail.as_ref();
        let stats = result.default_key_statistics.as_ref();
        let financial = result.financial_data.as_ref();

        let name = price.and_then(|p| {
            p.long_name
                .clone()
                .or_else(|| p.short_name.clone())
                .map(|n| n.replace("&amp;", "&"))
        });

        CompanyProfile {
            symbol: symbol.to_string(),
            source: Some(PROVIDER_ID.to_string()),
            name,
            sector: summary.and_then(|s| s.sector.clone()),
            industry: summary.and_then(|s| s.industry.clone()),
            country: summary.and_then(|s| s.country.clone()),
            website: summary.and_then(|s| s.website.clone()),
            business_summary: summary.and_then(|s| s.long_business_summary.clone()),
            market_cap: detail.and_then(|d| RawNum::value(&d.market_cap)),
            enterprise_value: stats.and_then(|s| RawNum::value(&s.enterprise_value)),
            pe_ratio: detail.and_then(|d| RawNum::value(&d.trailing_pe)),
            forward_pe: detail.and_then(|d| RawNum::value(&d.forward_pe)),
            peg_ratio: stats.and_then(|s| RawNum::value(&s.peg_ratio)),
            price_to_book: stats.and_then(|s| RawNum::value(&s.price_to_book)),
            price_to_sales: detail.and_then(|d| RawNum::value(&d.price_to_sales_trailing12_months)),
            dividend_yield: detail.and_then(|d| RawNum::value(&d.dividend_yield)),
            dividend_rate: detail.and_then(|d| RawNum::value(&d.dividend_rate)),
            payout_ratio: detail.and_then(|d| RawNum::value(&d.payout_ratio)),
            beta: detail.and_then(|d| RawNum::value(&d.beta)),
            eps: stats.and_then(|s| RawNum::value(&s.trailing_eps)),
            revenue: financial.and_then(|f| RawNum::value(&f.total_revenue)),
            profit_margin: financial.and_then(|f| RawNum::value(&f.profit_margins)),
            operating_margin: financial.and_then(|f| RawNum::value(&f.operating_margins)),
            return_on_equity: financial.and_then(|f| RawNum::value(&f.return_on_equity)),
            return_on_assets: financial.and_then(|f| RawNum::value(&f.return_on_assets)),
            volume: detail.and_then(|d| RawNum::value(&d.volume)),
            avg_volume: detail.and_then(|d| RawNum::value(&d.average_volume)),
            week_52_high: detail.and_then(|d| RawNum::value(&d.fifty_two_week_high)),
            week_52_low: detail.and_then(|d| RawNum::value(&d.fifty_two_week_low)),
            target_price: financial.and_then(|f| RawNum::value(&f.target_mean_price)),
            recommendation: financial.and_then(|f| f.recommendation_key.clone()),
            analyst_count: financial
                .and_then(|f| RawNum::value(&f.number_of_analyst_opinions))
                .map(|n| n as u32),
        }
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<RawBar>, MarketDataError> {
        debug!(
            "Fetching {} bars over {} for {} from Yahoo",
            interval, period, symbol
        );

        let response = self
            .connector
            .get_quote_range(symbol, interval.as_str(), period.as_str())
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    Self::provider_error(e.to_string())
                }
            })?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let bars: Vec<RawBar> = yahoo_quotes
                    .iter()
                    .filter_map(|q| {
                        let bar = Self::yahoo_quote_to_bar(q);
                        if bar.is_none() {
                            warn!("Skipping bar with invalid timestamp {} for {}", q.timestamp, symbol);
                        }
                        bar
                    })
                    .collect();
                Ok(bars)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!("No bars returned for '{}' over {}", symbol, period);
                Ok(vec![])
            }
            Err(e) => Err(Self::provider_error(e.to_string())),
        }
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, MarketDataError> {
        debug!("Fetching profile for {} from Yahoo", symbol);

        let result = self.fetch_quote_summary(symbol).await?;
        Ok(Self::map_quote_summary_to_profile(symbol, &result))
    }
}

/// Keep only prices that are finite and positive.
fn positive_price(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}
