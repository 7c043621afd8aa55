//! Pure display formatting for metric values.
//!
//! Every formatter takes an `Option<f64>`: `None` means the provider did
//! not report the value and renders as "N/A". A reported zero also
//! renders "N/A" to match the dashboard's display convention for metrics
//! that are effectively unavailable (a zero market cap or P/E is noise,
//! not information).

/// Marker rendered for unavailable values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a currency amount with magnitude suffixes.
///
/// ```
/// use stockdash_market_data::format::format_currency;
///
/// assert_eq!(format_currency(Some(1_500_000.0)), "$1.50M");
/// assert_eq!(format_currency(Some(2_300_000_000.0)), "$2.30B");
/// assert_eq!(format_currency(None), "N/A");
/// ```
pub fn format_currency(value: Option<f64>) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(v) if v == 0.0 => NOT_AVAILABLE.to_string(),
        Some(v) => format!("${}", compact(v)),
    }
}

/// Format a decimal fraction as a percentage with two decimals.
///
/// ```
/// use stockdash_market_data::format::format_percentage;
///
/// assert_eq!(format_percentage(Some(0.0523)), "5.23%");
/// assert_eq!(format_percentage(None), "N/A");
/// ```
pub fn format_percentage(value: Option<f64>) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(v) if v == 0.0 => NOT_AVAILABLE.to_string(),
        Some(v) => format!("{:.2}%", v * 100.0),
    }
}

/// Format a large number with magnitude suffixes, no currency symbol.
pub fn format_compact_number(value: Option<f64>) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(v) if v == 0.0 => NOT_AVAILABLE.to_string(),
        Some(v) => compact(v),
    }
}

fn compact(v: f64) -> String {
    if v >= 1e12 {
        format!("{:.2}T", v / 1e12)
    } else if v >= 1e9 {
        format!("{:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if v >= 1e3 {
        format!("{:.2}K", v / 1e3)
    } else {
        format!("{:.2}", v)
    }
}
