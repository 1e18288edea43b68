//! Series ingestion: provider client, raw cache and the shared series types.

pub mod cache;
pub mod fred;
pub mod series;
pub mod source;

pub use cache::RawCache;
pub use fred::FredClient;
pub use series::{DailySeries, DateRange, IndicatorSeries, Observation};
pub use source::{fetch_all, FetchError, FetchOutcome, SeriesSource, StaticSource};
