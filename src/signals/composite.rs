//! Weighted composite indices over normalised indicator measures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::changes::{ChangeRecord, ChangeSeries};

/// Which field of a [`ChangeRecord`] feeds a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    #[default]
    Level,
    Change1,
    Change3,
    Change12,
    Delta,
    Delta2,
}

impl Measure {
    pub fn pick(self, record: &ChangeRecord) -> Option<f64> {
        match self {
            Self::Level => record.value,
            Self::Change1 => record.change_1,
            Self::Change3 => record.change_3,
            Self::Change12 => record.change_12,
            Self::Delta => record.delta,
            Self::Delta2 => record.delta2,
        }
    }
}

/// One signed entry of a weight table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub indicator: String,
    #[serde(default)]
    pub measure: Measure,
    pub weight: f64,
}

impl Component {
    pub fn new(indicator: impl Into<String>, measure: Measure, weight: f64) -> Self {
        Self {
            indicator: indicator.into(),
            measure,
            weight,
        }
    }
}

/// Transform applied to each component's measure before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Normalization {
    /// Use the measure as-is.
    Raw,
    /// Rolling z-score over the trailing `window` days (population deviation).
    #[serde(rename = "zscore")]
    ZScore { window: usize },
}

impl Default for Normalization {
    fn default() -> Self {
        Self::ZScore { window: 90 }
    }
}

impl Normalization {
    pub fn apply(self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        match self {
            Self::Raw => values.to_vec(),
            Self::ZScore { window } => rolling_zscore(values, window),
        }
    }
}

/// Rolling z-score requiring `max(12, window / 4)` defined samples
/// (capped at `window`). A window with no dispersion scores 0.
pub fn rolling_zscore(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let min_periods = (window / 4).max(12).min(window);
    (0..values.len())
        .map(|idx| {
            let current = values[idx]?;
            let lo = (idx + 1).saturating_sub(window);
            let samples: Vec<f64> = values[lo..=idx].iter().flatten().copied().collect();
            if samples.len() < min_periods {
                return None;
            }
            let n = samples.len() as f64;
            let mean = samples.iter().sum::<f64>() / n;
            let var = samples
                .iter()
                .map(|v| {
                    let centered = v - mean;
                    centered * centered
                })
                .sum::<f64>()
                / n;
            let sd = var.sqrt();
            if sd <= 1e-12 {
                return Some(0.0);
            }
            Some((current - mean) / sd)
        })
        .collect()
}

/// `Σ weight × input`; missing as soon as any input is missing.
pub fn weighted_sum<I>(inputs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, Option<f64>)>,
{
    inputs
        .into_iter()
        .try_fold(0.0, |acc, (weight, value)| Some(acc + weight * value?))
}

/// Named index value per day of the shared axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeIndex {
    name: String,
    values: Vec<Option<f64>>,
}

impl CompositeIndex {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Build an index over `len` days from a weight table.
///
/// An empty table, a component naming an unknown indicator or any missing
/// normalised input on a day makes that day missing.
pub fn build_index(
    name: &str,
    components: &[Component],
    changes: &IndexMap<String, ChangeSeries>,
    normalization: Normalization,
    len: usize,
) -> CompositeIndex {
    let columns: Option<Vec<(f64, Vec<Option<f64>>)>> = components
        .iter()
        .map(|component| {
            let series = changes.get(&component.indicator)?;
            let raw: Vec<Option<f64>> = series
                .records()
                .iter()
                .map(|record| component.measure.pick(record))
                .collect();
            Some((component.weight, normalization.apply(&raw)))
        })
        .collect();

    let values = match columns {
        Some(columns) if !columns.is_empty() => (0..len)
            .map(|idx| {
                weighted_sum(
                    columns
                        .iter()
                        .map(|(weight, column)| (*weight, column.get(idx).copied().flatten())),
                )
            })
            .collect(),
        _ => vec![None; len],
    };

    CompositeIndex {
        name: name.to_string(),
        values,
    }
}
