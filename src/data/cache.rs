//! On-disk cache of raw provider observations, one CSV per series.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use super::{
    series::{IndicatorSeries, Observation},
    source::{FetchError, SeriesSource},
};
use crate::{config::Settings, report::write_atomic};

/// Directory of `<series_id>.csv` files with a `date,value` header.
#[derive(Debug, Clone)]
pub struct RawCache {
    root: PathBuf,
}

impl RawCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.join_data("raw"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, series_id: &str) -> PathBuf {
        self.root.join(format!("{series_id}.csv"))
    }

    /// Replace the cached copy of `series`.
    pub fn store(&self, series: &IndicatorSeries) -> Result<PathBuf> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for obs in series.observations() {
            writer.serialize(obs)?;
        }
        if series.is_empty() {
            writer.write_record(["date", "value"])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("buffering {}: {}", series.id(), err.error()))?;
        let path = self.path_for(series.id());
        write_atomic(&path, &bytes).with_context(|| format!("store {}", series.id()))?;
        info!(path = %path.display(), rows = series.len(), "cached raw observations");
        Ok(path)
    }

    pub fn load(&self, series_id: &str) -> Result<IndicatorSeries, FetchError> {
        let path = self.path_for(series_id);
        if !path.exists() {
            return Err(FetchError::NotCached {
                series_id: series_id.to_string(),
            });
        }
        let decode = |err: csv::Error| FetchError::Decode {
            series_id: series_id.to_string(),
            message: err.to_string(),
        };
        let mut reader = csv::Reader::from_path(&path).map_err(decode)?;
        let observations = reader
            .deserialize::<Observation>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(decode)?;
        Ok(IndicatorSeries::new(series_id, observations))
    }
}

impl SeriesSource for RawCache {
    fn name(&self) -> &str {
        "cache"
    }

    async fn fetch(
        &self,
        series_id: &str,
        start: NaiveDate,
    ) -> Result<IndicatorSeries, FetchError> {
        self.load(series_id).map(|series| series.since(start))
    }
}
