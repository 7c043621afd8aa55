//! Market index snapshots.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::bar::PriceSeries;

/// The fixed set of tracked indices: display name and provider symbol.
pub const MARKET_INDICES: [(&str, &str); 5] = [
    ("S&P 500", "^GSPC"),
    ("NASDAQ", "^IXIC"),
    ("Dow Jones", "^DJI"),
    ("Russell 2000", "^RUT"),
    ("VIX", "^VIX"),
];

/// Latest state of one market index, recomputed whole on every fetch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub name: String,
    pub symbol: String,
    /// Latest close.
    pub current: f64,
    /// Close of the prior bar.
    pub previous: f64,
    /// `current - previous`.
    pub change: f64,
    /// Change as a decimal fraction of the prior close (0.0123 = +1.23%).
    pub change_pct: f64,
    /// Highest high over the trailing window.
    pub window_high: f64,
    /// Lowest low over the trailing window.
    pub window_low: f64,
    /// Mean volume over the trailing window.
    pub avg_volume: f64,
    /// The bars the snapshot was computed from.
    pub series: Arc<PriceSeries>,
}

impl IndexSnapshot {
    /// Build a snapshot from a trailing window of bars.
    ///
    /// Returns `None` when fewer than 2 bars are available, in which case
    /// the index is omitted from the result set rather than reported with
    /// a fabricated change.
    pub fn from_series(name: &str, symbol: &str, series: Arc<PriceSeries>) -> Option<Self> {
        let n = series.bars.len();
        if n < 2 {
            return None;
        }

        let current = series.bars[n - 1].close;
        let previous = series.bars[n - 2].close;
        let change = current - previous;
        let change_pct = if previous != 0.0 { change / previous } else { 0.0 };

        let window_high = series
            .bars
            .iter()
            .map(|b| b.high)
            .fold(f64::MIN, f64::max);
        let window_low = series.bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let avg_volume =
            series.bars.iter().map(|b| b.volume as f64).sum::<f64>() / n as f64;

        Some(Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            current,
            previous,
            change,
            change_pct,
            window_high,
            window_low,
            avg_volume,
            series,
        })
    }
}
