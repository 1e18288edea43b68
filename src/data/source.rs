//! Series source abstraction and the fetch error taxonomy.
//!
//! The pipeline only sees [`SeriesSource`], so the FRED client, the on-disk
//! cache and in-memory fixtures are interchangeable.

use std::{collections::HashMap, future::Future};

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{info, warn};

use super::series::IndicatorSeries;
use crate::catalog::IndicatorSpec;

/// Failures retrieving a single series. Fatal to that indicator only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("FRED_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid series identifier '{series_id}': {message}")]
    InvalidIdentifier { series_id: String, message: String },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("provider returned HTTP {status} for '{series_id}': {message}")]
    Status {
        series_id: String,
        status: u16,
        message: String,
    },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("could not decode observations for '{series_id}': {message}")]
    Decode { series_id: String, message: String },

    #[error("no cached observations for '{series_id}' (run `fetch` first)")]
    NotCached { series_id: String },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    // reqwest embeds the request URL, which carries the API key.
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

/// Anything that can produce an [`IndicatorSeries`] for a provider id.
pub trait SeriesSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Retrieve observations on or after `start` for `series_id`.
    fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> impl Future<Output = Result<IndicatorSeries, FetchError>> + Send;
}

/// Per-indicator fetch outcomes, keyed by display name in catalog order.
pub type FetchOutcome = IndexMap<String, Result<IndicatorSeries, FetchError>>;

/// Fetch every indicator with at most `concurrency` requests in flight.
///
/// Results keep the catalog order regardless of completion order. A failure
/// is recorded against its indicator and never stops the others.
pub async fn fetch_all<S: SeriesSource + Sync>(
    source: &S,
    indicators: &IndexMap<String, IndicatorSpec>,
    start: NaiveDate,
    concurrency: usize,
) -> FetchOutcome {
    let outcome: FetchOutcome = stream::iter(indicators.iter())
        .map(|(name, spec)| async move {
            let result = source.fetch(&spec.series_id, start).await;
            match &result {
                Ok(series) => info!(
                    source = source.name(),
                    indicator = %name,
                    series_id = %spec.series_id,
                    observations = series.len(),
                    "fetched series"
                ),
                Err(err) => warn!(
                    source = source.name(),
                    indicator = %name,
                    series_id = %spec.series_id,
                    %err,
                    "fetch failed; indicator will be reported as missing"
                ),
            }
            (name.clone(), result)
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect();
    outcome
}

/// In-memory source keyed by series id.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    series: HashMap<String, IndicatorSeries>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: IndicatorSeries) -> Self {
        self.series.insert(series.id().to_string(), series);
        self
    }
}

impl SeriesSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<IndicatorSeries, FetchError> {
        self.series
            .get(series_id)
            .map(|series| series.since(start))
            .ok_or_else(|| FetchError::InvalidIdentifier {
                series_id: series_id.to_string(),
                message: "series not present in static source".to_string(),
            })
    }
}
