//! Company fundamentals.

use serde::{Deserialize, Serialize};

/// Fundamentals for a ticker as reported by a provider.
///
/// Every numeric field is optional: a provider that omits a value yields
/// `None`, which formatters render as "N/A". A `None` is never collapsed
/// into a zero, so a real zero reading stays distinguishable from an
/// absent one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// The symbol the profile was requested for.
    pub symbol: String,

    /// Provider that supplied this profile (e.g., "YAHOO").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    // Identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_summary: Option<String>,

    // Valuation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peg_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_book: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to_sales: Option<f64>,

    // Dividends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_ratio: Option<f64>,

    // Profitability
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eps: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_on_equity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_on_assets: Option<f64>,

    // Trading statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_52_low: Option<f64>,

    // Analyst consensus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyst_count: Option<u32>,
}

impl CompanyProfile {
    /// An empty profile for the given symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let profile = CompanyProfile {
            name: Some("Apple Inc.".to_string()),
            pe_ratio: Some(28.5),
            ..CompanyProfile::new("AAPL")
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("Apple Inc."));
        assert!(json.contains("pe_ratio"));
        // None must be omitted, not rendered as 0
        assert!(!json.contains("dividend_yield"));
        assert!(!json.contains("market_cap"));
    }

    #[test]
    fn test_zero_survives_serialization() {
        let profile = CompanyProfile {
            dividend_yield: Some(0.0),
            ..CompanyProfile::new("BRK-B")
        };

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"dividend_yield\":0.0"));
    }
}
