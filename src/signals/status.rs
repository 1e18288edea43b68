//! Traffic-light status per dashboard metric.

use serde::{Deserialize, Serialize};

use super::changes::ChangeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLight {
    Green,
    Yellow,
    Red,
}

impl StatusLight {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// Metric names subject to each escalation rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRules {
    /// Yellow when the 3M change is positive.
    pub watch_rising: Vec<String>,
    /// Red when both the 1M and 3M changes are positive.
    pub alarm_rising: Vec<String>,
    /// Red when the latest value is below zero.
    pub alarm_negative: Vec<String>,
}

impl StatusRules {
    /// `None` when the metric has no latest value.
    pub fn evaluate(&self, metric: &str, record: &ChangeRecord) -> Option<StatusLight> {
        let latest = record.value?;
        let listed = |names: &[String]| names.iter().any(|name| name == metric);
        let positive = |value: Option<f64>| value.is_some_and(|v| v > 0.0);

        let mut light = StatusLight::Green;
        if listed(&self.watch_rising) && positive(record.change_3) {
            light = StatusLight::Yellow;
        }
        if listed(&self.alarm_rising) && positive(record.change_1) && positive(record.change_3) {
            light = StatusLight::Red;
        }
        if listed(&self.alarm_negative) && latest < 0.0 {
            light = StatusLight::Red;
        }
        Some(light)
    }
}
