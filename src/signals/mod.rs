//! Derived statistics over the fetched indicators.
//!
//! Stages run strictly forward: resample, spreads, changes, composite
//! indices, regime proxies and classification. Every stage is a pure
//! function of its inputs; [`compute`] wires them together.

pub mod changes;
pub mod composite;
pub mod regime;
pub mod resample;
pub mod status;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::{info, instrument};

use crate::{
    catalog::Catalog,
    data::{DailySeries, DateRange, FetchOutcome},
};
use changes::{compute_changes, ChangeMode, ChangeSeries};
use composite::{build_index, CompositeIndex};
use regime::{classify_series, history_lengths, Regime};

/// An indicator that contributed no data to this run.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedIndicator {
    pub name: String,
    pub reason: String,
}

/// Everything derived for one run, aligned on a single daily axis.
#[derive(Debug, Clone)]
pub struct MacroFrame {
    pub range: DateRange,
    /// Indicators then spreads, in catalog order.
    pub daily: IndexMap<String, DailySeries>,
    pub changes: IndexMap<String, ChangeSeries>,
    /// Date of the last raw observation behind each metric.
    pub last_observed: IndexMap<String, Option<NaiveDate>>,
    pub risk_off: CompositeIndex,
    pub policy_tightness: CompositeIndex,
    pub growth_proxy: CompositeIndex,
    pub inflation_proxy: CompositeIndex,
    pub regimes: Vec<Regime>,
    pub failed: Vec<FailedIndicator>,
}

impl MacroFrame {
    pub fn as_of(&self) -> NaiveDate {
        self.range.end()
    }

    pub fn latest_regime(&self) -> Regime {
        self.regimes
            .last()
            .copied()
            .unwrap_or(Regime::InsufficientSample)
    }
}

/// Run every derivation stage over the fetched indicators.
///
/// Indicators that failed to fetch, or are absent from `fetched`, become
/// all-missing series so their rows, and every index that reads them,
/// degrade to missing instead of aborting the run.
#[instrument(skip_all, fields(start = %range.start(), end = %range.end()))]
pub fn compute(catalog: &Catalog, fetched: &FetchOutcome, range: DateRange) -> MacroFrame {
    let len = range.days();
    let mut daily: IndexMap<String, DailySeries> = IndexMap::new();
    let mut last_observed: IndexMap<String, Option<NaiveDate>> = IndexMap::new();
    let mut failed = Vec::new();

    for (name, spec) in &catalog.indicators {
        match fetched.get(name) {
            Some(Ok(series)) => {
                daily.insert(name.clone(), resample::forward_fill(series, range));
                last_observed.insert(name.clone(), series.last_date());
            }
            Some(Err(err)) => {
                failed.push(FailedIndicator {
                    name: name.clone(),
                    reason: err.to_string(),
                });
                daily.insert(name.clone(), DailySeries::missing(&spec.series_id, range));
                last_observed.insert(name.clone(), None);
            }
            None => {
                failed.push(FailedIndicator {
                    name: name.clone(),
                    reason: "not fetched".to_string(),
                });
                daily.insert(name.clone(), DailySeries::missing(&spec.series_id, range));
                last_observed.insert(name.clone(), None);
            }
        }
    }

    for spread in &catalog.spreads {
        // legs of an unvalidated catalog may be absent
        let derived = match (daily.get(&spread.minuend), daily.get(&spread.subtrahend)) {
            (Some(minuend), Some(subtrahend)) => {
                resample::spread(&spread.name, minuend, subtrahend)
            }
            _ => DailySeries::missing(&spread.name, range),
        };
        let observed = match (
            last_observed.get(&spread.minuend).copied().flatten(),
            last_observed.get(&spread.subtrahend).copied().flatten(),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            _ => None,
        };
        daily.insert(spread.name.clone(), derived);
        last_observed.insert(spread.name.clone(), observed);
    }

    let changes: IndexMap<String, ChangeSeries> = daily
        .iter()
        .map(|(name, series)| {
            let mode = catalog
                .indicators
                .get(name)
                .map_or(ChangeMode::Absolute, |spec| spec.change);
            (
                name.clone(),
                compute_changes(series, mode, catalog.diff_lag_days),
            )
        })
        .collect();

    let norm = catalog.normalization;
    let risk_off = build_index("risk_off_index", &catalog.risk_off, &changes, norm, len);
    let policy_tightness = build_index(
        "policy_tightness_index",
        &catalog.policy_tightness,
        &changes,
        norm,
        len,
    );
    let growth_proxy = build_index("growth_proxy", &catalog.regime.growth, &changes, norm, len);
    let inflation_proxy = build_index(
        "inflation_proxy",
        &catalog.regime.inflation,
        &changes,
        norm,
        len,
    );

    let proxy_inputs: Vec<&DailySeries> = catalog
        .regime
        .inputs()
        .into_iter()
        .filter_map(|name| daily.get(name))
        .collect();
    let history = history_lengths(&proxy_inputs, len);
    let regimes = classify_series(
        growth_proxy.values(),
        inflation_proxy.values(),
        &history,
        &catalog.regime.thresholds(),
    );

    let frame = MacroFrame {
        range,
        daily,
        changes,
        last_observed,
        risk_off,
        policy_tightness,
        growth_proxy,
        inflation_proxy,
        regimes,
        failed,
    };
    info!(
        metrics = frame.daily.len(),
        failed = frame.failed.len(),
        risk_off = ?frame.risk_off.latest(),
        policy_tightness = ?frame.policy_tightness.latest(),
        regime = %frame.latest_regime(),
        "macro frame computed"
    );
    frame
}
