//! Output artefacts: dashboard CSV, daily features, JSON snapshot and
//! markdown summary.

pub mod dashboard;
pub mod features;
pub mod markdown;
pub mod snapshot;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::{catalog::Catalog, signals::MacroFrame};
pub use snapshot::{DashboardSnapshot, MetricRow};

pub const DASHBOARD_FILE: &str = "macro_dashboard_latest.csv";
pub const FEATURES_FILE: &str = "macro_daily_features.csv";
pub const SNAPSHOT_FILE: &str = "macro_snapshot.json";
pub const REPORT_FILE: &str = "macro_report.md";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv encoding: {0}")]
    Csv(#[from] csv::Error),

    #[error("json encoding: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame encoding: {0}")]
    Frame(#[from] polars::prelude::PolarsError),

    #[error("rendering: {0}")]
    Render(String),
}

/// Replace `path` with `bytes` via a sibling temp file and rename, so
/// readers see the old file or the complete new one.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

/// Paths of the artefacts written by [`write_outputs`].
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub dashboard: PathBuf,
    pub features: PathBuf,
    pub snapshot: PathBuf,
    pub report: PathBuf,
}

/// Render every artefact in memory, then persist each atomically.
///
/// Nothing touches disk until all renders succeed.
pub fn write_outputs(
    frame: &MacroFrame,
    catalog: &Catalog,
    out_dir: &Path,
    generated_at: DateTime<Utc>,
) -> Result<OutputPaths, WriteError> {
    let snapshot = DashboardSnapshot::from_frame(frame, catalog);
    let dashboard_bytes = dashboard::render_dashboard(&snapshot)?;
    let features_bytes = features::render_features(frame, catalog.features_days)?;
    let snapshot_bytes = serde_json::to_vec_pretty(&snapshot)?;
    let report_text = markdown::render_markdown(&snapshot, generated_at)?;

    let paths = OutputPaths {
        dashboard: out_dir.join(DASHBOARD_FILE),
        features: out_dir.join(FEATURES_FILE),
        snapshot: out_dir.join(SNAPSHOT_FILE),
        report: out_dir.join(REPORT_FILE),
    };
    write_atomic(&paths.features, &features_bytes)?;
    write_atomic(&paths.snapshot, &snapshot_bytes)?;
    write_atomic(&paths.report, report_text.as_bytes())?;
    write_atomic(&paths.dashboard, &dashboard_bytes)?;

    info!(
        path = %paths.dashboard.display(),
        rows = snapshot.metrics.len(),
        regime = %snapshot.regime,
        "wrote macro dashboard"
    );
    Ok(paths)
}
