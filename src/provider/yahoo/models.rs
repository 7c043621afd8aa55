//! Yahoo Finance quoteSummary response models.
//!
//! Yahoo wraps most numbers as `{"raw": 123.45, "fmt": "123.45"}` and
//! sends an empty object `{}` when a value is unavailable, so every leaf
//! is optional.

use serde::Deserialize;

/// Main response wrapper for the quoteSummary API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSummaryEnvelope {
    /// Yahoo sends `"result": null` together with an error body for
    /// unknown symbols.
    pub result: Option<Vec<QuoteSummaryResult>>,
}

/// One result entry; each requested module arrives as its own key.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    pub price: Option<PriceModule>,
    pub summary_profile: Option<SummaryProfileModule>,
    pub summary_detail: Option<SummaryDetailModule>,
    pub default_key_statistics: Option<KeyStatisticsModule>,
    pub financial_data: Option<FinancialDataModule>,
}

/// Numeric value with raw and formatted renditions.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawNum {
    pub raw: Option<f64>,
}

impl RawNum {
    pub fn value(detail: &Option<RawNum>) -> Option<f64> {
        detail.as_ref().and_then(|d| d.raw)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceModule {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryProfileModule {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub long_business_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetailModule {
    pub market_cap: Option<RawNum>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawNum>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<RawNum>,
    pub price_to_sales_trailing12_months: Option<RawNum>,
    pub dividend_yield: Option<RawNum>,
    pub dividend_rate: Option<RawNum>,
    pub payout_ratio: Option<RawNum>,
    pub beta: Option<RawNum>,
    pub volume: Option<RawNum>,
    pub average_volume: Option<RawNum>,
    pub fifty_two_week_high: Option<RawNum>,
    pub fifty_two_week_low: Option<RawNum>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatisticsModule {
    pub enterprise_value: Option<RawNum>,
    pub peg_ratio: Option<RawNum>,
    pub price_to_book: Option<RawNum>,
    pub trailing_eps: Option<RawNum>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDataModule {
    pub total_revenue: Option<RawNum>,
    pub profit_margins: Option<RawNum>,
    pub operating_margins: Option<RawNum>,
    pub return_on_equity: Option<RawNum>,
    pub return_on_assets: Option<RawNum>,
    pub target_mean_price: Option<RawNum>,
    pub number_of_analyst_opinions: Option<RawNum>,
    pub recommendation_key: Option<String>,
}
