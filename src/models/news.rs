//! Placeholder news items.
//!
//! There is no real news integration yet; [`sample_news`] fabricates a
//! small, finite batch of items so the presentation layer has something
//! to render. A real implementation will sit behind the same provider,
//! cache and retry discipline as the other fetch operations.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One news item.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub url: String,
}

/// Generate up to `count` synthetic news items for a symbol.
///
/// Titles and sources are deterministic; timestamps are offsets from
/// `now`, so two calls at different times produce different timestamps.
pub fn sample_news(symbol: &str, count: usize, now: DateTime<Utc>) -> Vec<NewsItem> {
    let templates = [
        (
            format!("{symbol} Reports Strong Quarterly Earnings"),
            format!("Company {symbol} exceeded analyst expectations with revenue growth."),
            Duration::hours(2),
            "Financial Times",
            "https://example.com/news1",
        ),
        (
            format!("{symbol} Announces New Product Launch"),
            format!("{symbol} unveiled its latest innovation at the tech conference."),
            Duration::hours(8),
            "Reuters",
            "https://example.com/news2",
        ),
        (
            format!("Analyst Upgrades {symbol} Rating"),
            format!("Wall Street analyst raises price target for {symbol}."),
            Duration::days(1),
            "Bloomberg",
            "https://example.com/news3",
        ),
    ];

    templates
        .into_iter()
        .take(count)
        .map(|(title, summary, age, source, url)| NewsItem {
            title,
            summary,
            published_at: now - age,
            source: source.to_string(),
            url: url.to_string(),
        })
        .collect()
}
