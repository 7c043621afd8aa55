//! OHLCV bars and the enrichment pipeline that runs at load time.
//!
//! Raw provider bars are cleaned (all-empty rows dropped, interior gaps
//! forward-filled) and then enriched once with rolling-window analytics.
//! Bars are never mutated after enrichment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of trailing bars used for every rolling statistic.
pub const ROLLING_WINDOW: usize = 20;

/// One wire-level bar as returned by a provider, before cleaning.
///
/// Fields the provider omitted (or reported as non-finite / non-positive
/// prices) are `None`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawBar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// A bar with every field present.
    pub fn complete(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            timestamp,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// True when the provider sent no usable field at all.
    pub fn is_empty(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// One enriched trading-period observation.
///
/// Rolling statistics need [`ROLLING_WINDOW`] bars of history and are
/// `None` until the window has filled; returns need one prior bar.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,

    /// Close-over-close fractional change; `None` on the first bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_return: Option<f64>,

    /// Natural log of the close-over-close ratio; `None` on the first bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_return: Option<f64>,

    /// Sample standard deviation of simple returns over the trailing window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,

    /// High minus low for this bar.
    pub price_range: f64,

    /// Price range as a percentage of the close.
    pub range_pct: f64,

    /// Mean volume over the trailing window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ma: Option<f64>,

    /// This bar's volume relative to the rolling mean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ratio: Option<f64>,

    /// Minimum low over the trailing window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<f64>,

    /// Maximum high over the trailing window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
}

/// A chronologically ordered, enriched bar series for one symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Clean and enrich raw provider bars.
    ///
    /// Cleaning drops bars with no usable field, forward-fills interior
    /// missing OHLCV fields from the prior bar, and drops leading bars
    /// that are still incomplete after the fill. Enrichment then computes
    /// the derived fields in chronological order.
    pub fn from_raw(symbol: impl Into<String>, raw: Vec<RawBar>) -> Self {
        let filled = forward_fill(raw);
        let bars = enrich(filled);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// The most recent bar, if any.
    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }
}

/// A fully cleaned bar, before derived fields are attached.
#[derive(Clone, Copy)]
struct FilledBar {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

fn forward_fill(raw: Vec<RawBar>) -> Vec<FilledBar> {
    let mut filled: Vec<FilledBar> = Vec::with_capacity(raw.len());
    let mut prev: Option<FilledBar> = None;

    for bar in raw.into_iter().filter(|b| !b.is_empty()) {
        let candidate = FilledBar {
            timestamp: bar.timestamp,
            open: match bar.open.or(prev.map(|p| p.open)) {
                Some(v) => v,
                None => continue,
            },
            high: match bar.high.or(prev.map(|p| p.high)) {
                Some(v) => v,
                None => continue,
            },
            low: match bar.low.or(prev.map(|p| p.low)) {
                Some(v) => v,
                None => continue,
            },
            close: match bar.close.or(prev.map(|p| p.close)) {
                Some(v) => v,
                None => continue,
            },
            volume: match bar.volume.or(prev.map(|p| p.volume)) {
                Some(v) => v,
                None => continue,
            },
        };
        filled.push(candidate);
        prev = Some(candidate);
    }

    filled
}

fn enrich(filled: Vec<FilledBar>) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = Vec::with_capacity(filled.len());

    for (i, bar) in filled.iter().enumerate() {
        let prev_close = if i > 0 { Some(filled[i - 1].close) } else { None };

        let simple_return = prev_close
            .filter(|&p| p > 0.0)
            .map(|p| bar.close / p - 1.0);
        let log_return = prev_close
            .filter(|&p| p > 0.0 && bar.close > 0.0)
            .map(|p| (bar.close / p).ln());

        let price_range = bar.high - bar.low;
        let range_pct = if bar.close > 0.0 {
            price_range / bar.close * 100.0
        } else {
            0.0
        };

        let mut volatility = None;
        let mut volume_ma = None;
        let mut volume_ratio = None;
        let mut support = None;
        let mut resistance = None;

        if i + 1 >= ROLLING_WINDOW {
            let window = &filled[i + 1 - ROLLING_WINDOW..=i];

            let mean_volume =
                window.iter().map(|b| b.volume as f64).sum::<f64>() / window.len() as f64;
            volume_ma = Some(mean_volume);
            if mean_volume > 0.0 {
                volume_ratio = Some(bar.volume as f64 / mean_volume);
            }

            support = window.iter().map(|b| b.low).fold(None, |acc: Option<f64>, low| {
                Some(acc.map_or(low, |m| m.min(low)))
            });
            resistance = window.iter().map(|b| b.high).fold(None, |acc: Option<f64>, high| {
                Some(acc.map_or(high, |m| m.max(high)))
            });

            // Returns in the window; the series' first bar has none.
            let window_start = i + 1 - ROLLING_WINDOW;
            let returns: Vec<f64> = bars[window_start..]
                .iter()
                .map(|b| b.simple_return)
                .chain(std::iter::once(simple_return))
                .flatten()
                .collect();
            volatility = sample_std(&returns);
        }

        bars.push(PriceBar {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            simple_return,
            log_return,
            volatility,
            price_range,
            range_pct,
            volume_ma,
            volume_ratio,
            support,
            resistance,
        });
    }

    bars
}

/// Sample standard deviation (n - 1 denominator); `None` below 2 points.
fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
