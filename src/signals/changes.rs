//! Multi-horizon change detection and lagged differences.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::data::DailySeries;

/// Change horizons in months.
pub const HORIZONS: [u32; 3] = [1, 3, 12];

/// How horizon changes are expressed for an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeMode {
    /// `(v[t] - v[t-h]) / v[t-h]`, for level series such as price indices.
    #[default]
    Percent,
    /// `v[t] - v[t-h]`, for rates and spreads.
    Absolute,
}

impl ChangeMode {
    /// Missing when the base is zero in percent mode.
    pub fn apply(self, current: f64, prior: f64) -> Option<f64> {
        match self {
            Self::Absolute => Some(current - prior),
            Self::Percent if prior == 0.0 => None,
            Self::Percent => Some((current - prior) / prior),
        }
    }
}

/// Level and derived changes of one indicator on one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeRecord {
    pub date: NaiveDate,
    pub value: Option<f64>,
    pub change_1: Option<f64>,
    pub change_3: Option<f64>,
    pub change_12: Option<f64>,
    pub delta: Option<f64>,
    pub delta2: Option<f64>,
}

/// Change records aligned with the days of a [`DailySeries`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSeries {
    id: String,
    records: Vec<ChangeRecord>,
}

impl ChangeSeries {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&ChangeRecord> {
        self.records.last()
    }
}

/// Compute horizon changes plus Δ and ΔΔ for every day of `series`.
///
/// A horizon change at `t` compares against the value one, three or twelve
/// calendar months earlier (clamped to month end); it is missing when that
/// day lies outside the series or carries no value. Δ and ΔΔ use a lag of
/// `diff_lag` days: `Δ[t] = v[t] - v[t-lag]`, `ΔΔ[t] = Δ[t] - Δ[t-lag]`.
pub fn compute_changes(series: &DailySeries, mode: ChangeMode, diff_lag: usize) -> ChangeSeries {
    let values = series.values();
    let deltas: Vec<Option<f64>> = (0..values.len())
        .map(|idx| lagged_difference(values, idx, diff_lag))
        .collect();
    let records = series
        .dates()
        .enumerate()
        .map(|(idx, date)| ChangeRecord {
            date,
            value: values[idx],
            change_1: horizon_change(series, idx, date, HORIZONS[0], mode),
            change_3: horizon_change(series, idx, date, HORIZONS[1], mode),
            change_12: horizon_change(series, idx, date, HORIZONS[2], mode),
            delta: deltas[idx],
            delta2: lagged_difference(&deltas, idx, diff_lag),
        })
        .collect();
    ChangeSeries {
        id: series.id().to_string(),
        records,
    }
}

/// `values[idx] - values[idx - lag]`; a zero lag is treated as no history.
pub fn lagged_difference(values: &[Option<f64>], idx: usize, lag: usize) -> Option<f64> {
    if lag == 0 {
        return None;
    }
    let prior = idx.checked_sub(lag)?;
    Some(values.get(idx).copied()?? - values[prior]?)
}

fn horizon_change(
    series: &DailySeries,
    idx: usize,
    date: NaiveDate,
    months: u32,
    mode: ChangeMode,
) -> Option<f64> {
    let current = series.values()[idx]?;
    let anchor = date.checked_sub_months(Months::new(months))?;
    let prior = series.value_on(anchor)?;
    mode.apply(current, prior)
}
