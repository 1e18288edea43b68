//! The latest-date view of a [`MacroFrame`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    catalog::Catalog,
    signals::{regime::Regime, status::StatusLight, MacroFrame},
};

/// One dashboard row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub latest_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub change_1m: Option<f64>,
    pub change_3m: Option<f64>,
    pub change_12m: Option<f64>,
    pub delta: Option<f64>,
    pub delta2: Option<f64>,
    pub status: Option<StatusLight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub as_of: NaiveDate,
    pub metrics: Vec<MetricRow>,
    pub risk_off_index: Option<f64>,
    pub policy_tightness_index: Option<f64>,
    pub growth_proxy: Option<f64>,
    pub inflation_proxy: Option<f64>,
    pub regime: Regime,
    pub regime_quadrant: Option<u8>,
    pub regime_label: &'static str,
    pub failed: Vec<String>,
}

impl DashboardSnapshot {
    pub fn from_frame(frame: &MacroFrame, catalog: &Catalog) -> Self {
        let metrics = frame
            .changes
            .iter()
            .map(|(name, changes)| {
                let latest = changes.latest();
                MetricRow {
                    metric: name.clone(),
                    latest_date: frame.last_observed.get(name).copied().flatten(),
                    value: latest.and_then(|r| r.value),
                    change_1m: latest.and_then(|r| r.change_1),
                    change_3m: latest.and_then(|r| r.change_3),
                    change_12m: latest.and_then(|r| r.change_12),
                    delta: latest.and_then(|r| r.delta),
                    delta2: latest.and_then(|r| r.delta2),
                    status: latest.and_then(|record| catalog.status.evaluate(name, record)),
                }
            })
            .collect();
        let regime = frame.latest_regime();
        Self {
            as_of: frame.as_of(),
            metrics,
            risk_off_index: frame.risk_off.latest(),
            policy_tightness_index: frame.policy_tightness.latest(),
            growth_proxy: frame.growth_proxy.latest(),
            inflation_proxy: frame.inflation_proxy.latest(),
            regime,
            regime_quadrant: regime.quadrant(),
            regime_label: regime.label(),
            failed: frame.failed.iter().map(|f| f.name.clone()).collect(),
        }
    }
}
