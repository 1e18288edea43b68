//! Growth/inflation quadrant classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::DailySeries;

/// Quadrant of the growth/inflation plane, or too little history to say.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Q1: growth up, inflation down (risk-on).
    GrowthUpInflationDown,
    /// Q2: growth up, inflation up (reflation).
    GrowthUpInflationUp,
    /// Q3: growth down, inflation up (stagflation).
    GrowthDownInflationUp,
    /// Q4: growth down, inflation down (recession).
    GrowthDownInflationDown,
    InsufficientSample,
}

impl Regime {
    pub fn quadrant(self) -> Option<u8> {
        match self {
            Self::GrowthUpInflationDown => Some(1),
            Self::GrowthUpInflationUp => Some(2),
            Self::GrowthDownInflationUp => Some(3),
            Self::GrowthDownInflationDown => Some(4),
            Self::InsufficientSample => None,
        }
    }

    /// Stable display label used in every artefact.
    pub fn label(self) -> &'static str {
        match self {
            Self::GrowthUpInflationDown => "Q1 growth up / inflation down (risk-on)",
            Self::GrowthUpInflationUp => "Q2 growth up / inflation up (reflation)",
            Self::GrowthDownInflationUp => "Q3 growth down / inflation up (stagflation)",
            Self::GrowthDownInflationDown => "Q4 growth down / inflation down (recession)",
            Self::InsufficientSample => "insufficient sample",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Axis centres and the minimum history required to classify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeThresholds {
    pub growth: f64,
    pub inflation: f64,
    pub min_window: usize,
}

/// Classify one day. The history guard wins over any proxy reading, and a
/// missing proxy is treated like short history.
pub fn classify(
    growth: Option<f64>,
    inflation: Option<f64>,
    history: usize,
    thresholds: &RegimeThresholds,
) -> Regime {
    if history < thresholds.min_window {
        return Regime::InsufficientSample;
    }
    let (Some(growth), Some(inflation)) = (growth, inflation) else {
        return Regime::InsufficientSample;
    };
    match (growth > thresholds.growth, inflation > thresholds.inflation) {
        (true, false) => Regime::GrowthUpInflationDown,
        (true, true) => Regime::GrowthUpInflationUp,
        (false, true) => Regime::GrowthDownInflationUp,
        (false, false) => Regime::GrowthDownInflationDown,
    }
}

/// Days of joint history per day: counted from the first day on which every
/// input carries a value. Zero everywhere if any input never has a value.
pub fn history_lengths(inputs: &[&DailySeries], len: usize) -> Vec<usize> {
    if inputs.is_empty() {
        return vec![0; len];
    }
    let start = inputs
        .iter()
        .map(|series| series.first_defined())
        .try_fold(0usize, |acc, first| first.map(|idx| acc.max(idx)));
    match start {
        Some(start) => (0..len)
            .map(|idx| if idx >= start { idx - start + 1 } else { 0 })
            .collect(),
        None => vec![0; len],
    }
}

/// Classify every day of the axis.
pub fn classify_series(
    growth: &[Option<f64>],
    inflation: &[Option<f64>],
    history: &[usize],
    thresholds: &RegimeThresholds,
) -> Vec<Regime> {
    history
        .iter()
        .enumerate()
        .map(|(idx, days)| {
            classify(
                growth.get(idx).copied().flatten(),
                inflation.get(idx).copied().flatten(),
                *days,
                thresholds,
            )
        })
        .collect()
}
