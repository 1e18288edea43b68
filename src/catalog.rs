//! Static macro configuration: which series to pull, how to combine them and
//! how to classify the result.
//!
//! [`Catalog::default`] carries the production indicator set. A TOML file can
//! override any top-level section; sections it omits keep their defaults.

use std::{collections::HashSet, fs, path::Path};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signals::{
    changes::ChangeMode,
    composite::{Component, Measure, Normalization},
    regime::RegimeThresholds,
    status::StatusRules,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("reading catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Provider series behind a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub series_id: String,
    #[serde(default)]
    pub change: ChangeMode,
}

impl IndicatorSpec {
    pub fn new(series_id: impl Into<String>, change: ChangeMode) -> Self {
        Self {
            series_id: series_id.into(),
            change,
        }
    }
}

/// Derived series `minuend - subtrahend`, reported with absolute changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadSpec {
    pub name: String,
    pub minuend: String,
    pub subtrahend: String,
}

impl SpreadSpec {
    pub fn new(name: &str, minuend: &str, subtrahend: &str) -> Self {
        Self {
            name: name.to_string(),
            minuend: minuend.to_string(),
            subtrahend: subtrahend.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSpec {
    /// Higher means stronger growth.
    pub growth: Vec<Component>,
    /// Higher means hotter inflation.
    pub inflation: Vec<Component>,
    #[serde(default)]
    pub growth_threshold: f64,
    #[serde(default)]
    pub inflation_threshold: f64,
    pub min_window_days: usize,
}

impl RegimeSpec {
    pub fn thresholds(&self) -> RegimeThresholds {
        RegimeThresholds {
            growth: self.growth_threshold,
            inflation: self.inflation_threshold,
            min_window: self.min_window_days,
        }
    }

    /// Distinct indicators the proxies read, in first-use order.
    pub fn inputs(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.growth
            .iter()
            .chain(&self.inflation)
            .map(|component| component.indicator.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// First observation date requested from the provider and start of the daily axis.
    pub start: NaiveDate,
    /// Lag in days for Δ and ΔΔ.
    pub diff_lag_days: usize,
    pub normalization: Normalization,
    /// Trailing days written to the daily features file.
    pub features_days: usize,
    pub indicators: IndexMap<String, IndicatorSpec>,
    pub spreads: Vec<SpreadSpec>,
    pub risk_off: Vec<Component>,
    pub policy_tightness: Vec<Component>,
    pub regime: RegimeSpec,
    pub status: StatusRules,
}

impl Default for Catalog {
    fn default() -> Self {
        use ChangeMode::{Absolute, Percent};

        let indicators = [
            ("CPI", "CPIAUCSL", Percent),
            ("PCE", "PCEPI", Percent),
            ("Unemployment rate", "UNRATE", Absolute),
            ("Nonfarm payrolls", "PAYEMS", Percent),
            ("Retail sales", "RSAFS", Percent),
            ("Industrial production", "INDPRO", Percent),
            ("Chicago Fed NAI", "CFNAI", Absolute),
            ("30Y mortgage rate", "MORTGAGE30US", Absolute),
            ("2Y Treasury", "DGS2", Absolute),
            ("10Y Treasury", "DGS10", Absolute),
            ("3M T-bill", "TB3MS", Absolute),
            ("10Y real yield", "DFII10", Absolute),
            ("BAA", "BAA", Absolute),
            ("AAA", "AAA", Absolute),
            ("Initial claims", "ICSA", Percent),
            ("Fed funds", "FEDFUNDS", Absolute),
        ]
        .into_iter()
        .map(|(name, id, mode)| (name.to_string(), IndicatorSpec::new(id, mode)))
        .collect();

        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            start: NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
            diff_lag_days: 21,
            normalization: Normalization::default(),
            features_days: 900,
            indicators,
            spreads: vec![
                SpreadSpec::new("10Y-2Y", "10Y Treasury", "2Y Treasury"),
                SpreadSpec::new("10Y-3M", "10Y Treasury", "3M T-bill"),
                SpreadSpec::new("BAA-AAA", "BAA", "AAA"),
            ],
            risk_off: vec![
                Component::new("Initial claims", Measure::Level, 1.0),
                Component::new("Chicago Fed NAI", Measure::Level, -1.0),
                Component::new("BAA-AAA", Measure::Level, 1.2),
                Component::new("10Y-3M", Measure::Level, -1.0),
            ],
            policy_tightness: vec![
                Component::new("Fed funds", Measure::Level, 1.0),
                Component::new("10Y-2Y", Measure::Level, -0.8),
                Component::new("BAA-AAA", Measure::Level, 1.0),
                Component::new("10Y real yield", Measure::Level, 0.8),
            ],
            regime: RegimeSpec {
                growth: vec![
                    Component::new("Nonfarm payrolls", Measure::Change3, 1.0),
                    Component::new("Initial claims", Measure::Change3, -1.0),
                ],
                inflation: vec![
                    Component::new("CPI", Measure::Change3, 1.0),
                    Component::new("PCE", Measure::Change3, 1.0),
                ],
                growth_threshold: 0.0,
                inflation_threshold: 0.0,
                min_window_days: 365,
            },
            status: StatusRules {
                watch_rising: names(&[
                    "Unemployment rate",
                    "Initial claims",
                    "BAA-AAA",
                    "Fed funds",
                    "10Y real yield",
                ]),
                alarm_rising: names(&["BAA-AAA", "Initial claims"]),
                alarm_negative: names(&["10Y-2Y", "10Y-3M"]),
            },
        }
    }
}

impl Catalog {
    /// Defaults, or the TOML file at `path` layered over them.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            None => Self::default(),
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml(&text).map_err(|source| CatalogError::Parse {
                    path: path.display().to_string(),
                    source,
                })?
            }
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Indicator names followed by spread names: the dashboard row order.
    pub fn metric_names(&self) -> Vec<&str> {
        self.indicators
            .keys()
            .map(String::as_str)
            .chain(self.spreads.iter().map(|spread| spread.name.as_str()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.diff_lag_days == 0 {
            return Err(CatalogError::Invalid("diff_lag_days must be positive".into()));
        }
        if let Normalization::ZScore { window: 0 } = self.normalization {
            return Err(CatalogError::Invalid("z-score window must be positive".into()));
        }

        let mut known: HashSet<&str> = self.indicators.keys().map(String::as_str).collect();
        for spread in &self.spreads {
            for leg in [&spread.minuend, &spread.subtrahend] {
                if !self.indicators.contains_key(leg) {
                    return Err(CatalogError::Invalid(format!(
                        "spread '{}' references unknown indicator '{leg}'",
                        spread.name
                    )));
                }
            }
            if !known.insert(spread.name.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "metric name '{}' is defined twice",
                    spread.name
                )));
            }
        }

        let tables = [
            ("risk_off", &self.risk_off),
            ("policy_tightness", &self.policy_tightness),
            ("regime.growth", &self.regime.growth),
            ("regime.inflation", &self.regime.inflation),
        ];
        for (table, components) in tables {
            if let Some(component) = components
                .iter()
                .find(|component| !known.contains(component.indicator.as_str()))
            {
                return Err(CatalogError::Invalid(format!(
                    "{table} references unknown metric '{}'",
                    component.indicator
                )));
            }
        }
        Ok(())
    }
}
