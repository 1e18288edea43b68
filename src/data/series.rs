//! Time-series containers flowing between pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single dated provider observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Observations for one provider series, strictly increasing by date.
///
/// Construction sorts the input, drops non-finite values and keeps the last
/// value supplied for a repeated date, so the ordering invariant holds for
/// every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    id: String,
    observations: Vec<Observation>,
}

impl IndicatorSeries {
    pub fn new(id: impl Into<String>, mut observations: Vec<Observation>) -> Self {
        observations.retain(|obs| obs.value.is_finite());
        observations.sort_by_key(|obs| obs.date);
        let mut deduped: Vec<Observation> = Vec::with_capacity(observations.len());
        for obs in observations {
            match deduped.last_mut() {
                Some(last) if last.date == obs.date => *last = obs,
                _ => deduped.push(obs),
            }
        }
        Self {
            id: id.into(),
            observations: deduped,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|obs| obs.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|obs| obs.date)
    }

    /// Copy of the series restricted to observations on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        Self {
            id: self.id.clone(),
            observations: self
                .observations
                .iter()
                .copied()
                .filter(|obs| obs.date >= start)
                .collect(),
        }
    }
}

/// Inclusive calendar range at daily granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days())
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some((date - self.start).num_days() as usize)
    }
}

/// Dense daily series: one slot per calendar day of its range.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    id: String,
    range: DateRange,
    values: Vec<Option<f64>>,
}

impl DailySeries {
    /// Panics if `values` does not hold exactly one slot per day of `range`.
    pub fn new(id: impl Into<String>, range: DateRange, values: Vec<Option<f64>>) -> Self {
        assert_eq!(
            values.len(),
            range.days(),
            "daily series must cover every day of its range"
        );
        Self {
            id: id.into(),
            range,
            values,
        }
    }

    /// Series with every slot missing, used when an indicator could not be fetched.
    pub fn missing(id: impl Into<String>, range: DateRange) -> Self {
        Self::new(id, range, vec![None; range.days()])
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.range.index_of(date).and_then(|idx| self.values[idx])
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Index of the first day carrying a value.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.range.iter()
    }
}
