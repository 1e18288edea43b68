//! FRED observations client.

use std::time::Duration;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};
use urlencoding::encode;

use super::{
    series::{IndicatorSeries, Observation},
    source::{FetchError, SeriesSource},
};
use crate::config::Settings;

static SERIES_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]{1,64}$").expect("valid regex"));

/// Thin client over `series/observations`.
#[derive(Clone)]
pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: String,
    max_attempts: u32,
}

impl FredClient {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let api_key = settings
            .fred_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(FetchError::MissingApiKey)?
            .to_string();
        let client = Client::builder()
            .user_agent(concat!("fred-macro/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .timeout(settings.fetch_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.fred_base_url.trim_end_matches('/').to_string(),
            api_key,
            max_attempts: settings.max_attempts.max(1),
        })
    }

    fn observations_url(&self, series_id: &str, start: NaiveDate) -> String {
        format!(
            "{base}/series/observations?series_id={id}&api_key={key}&file_type=json&observation_start={start}",
            base = self.base_url,
            id = encode(series_id),
            key = encode(&self.api_key),
            start = start.format("%Y-%m-%d"),
        )
    }

    async fn fetch_once(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<IndicatorSeries, FetchError> {
        let resp = self
            .client
            .get(self.observations_url(series_id, start))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(classify_failure(series_id, status, &body));
        }
        parse_observations(series_id, &body)
    }
}

impl SeriesSource for FredClient {
    fn name(&self) -> &str {
        "fred"
    }

    async fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<IndicatorSeries, FetchError> {
        validate_series_id(series_id)?;
        let mut attempt = 1u32;
        loop {
            match self.fetch_once(series_id, start).await {
                Ok(series) => {
                    debug!(
                        %series_id,
                        attempt,
                        observations = series.len(),
                        "fred response parsed"
                    );
                    return Ok(series);
                }
                Err(err) if err.is_retriable() && attempt < self.max_attempts => {
                    warn!(%series_id, attempt, %err, "fred request failed, retrying");
                    sleep(Duration::from_millis(500 * u64::from(attempt))).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Reject identifiers FRED could never resolve before spending a request.
pub fn validate_series_id(series_id: &str) -> Result<(), FetchError> {
    if SERIES_ID.is_match(series_id) {
        Ok(())
    } else {
        Err(FetchError::InvalidIdentifier {
            series_id: series_id.to_string(),
            message: "identifiers are 1-64 letters, digits, '_' or '.'".to_string(),
        })
    }
}

/// Decode an observations payload. FRED marks missing values with `"."`;
/// those rows are dropped.
pub fn parse_observations(series_id: &str, body: &str) -> Result<IndicatorSeries, FetchError> {
    let payload: ObservationsResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Decode {
            series_id: series_id.to_string(),
            message: err.to_string(),
        })?;
    let observations = payload
        .observations
        .into_iter()
        .filter_map(|raw| {
            let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").ok()?;
            let value = raw.value.trim().parse::<f64>().ok()?;
            Some(Observation::new(date, value))
        })
        .collect();
    Ok(IndicatorSeries::new(series_id, observations))
}

fn classify_failure(series_id: &str, status: StatusCode, body: &str) -> FetchError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|err| err.error_message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Authentication(message),
        StatusCode::BAD_REQUEST if message.contains("api_key") => {
            FetchError::Authentication(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => FetchError::InvalidIdentifier {
            series_id: series_id.to_string(),
            message,
        },
        other => FetchError::Status {
            series_id: series_id.to_string(),
            status: other.as_u16(),
            message,
        },
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error_message: String,
}
