//! Domain models: bars and series, index snapshots, company profiles,
//! news items, and the request parameter tokens.

mod bar;
mod index;
mod news;
mod params;
mod profile;

pub use bar::{PriceBar, PriceSeries, RawBar, ROLLING_WINDOW};
pub use index::{IndexSnapshot, MARKET_INDICES};
pub use news::{sample_news, NewsItem};
pub use params::{Interval, Period};
pub use profile::CompanyProfile;
