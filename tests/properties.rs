use chrono::{Days, Months, NaiveDate};
use fred_macro::{
    data::{DailySeries, DateRange, IndicatorSeries, Observation},
    signals::{
        changes::{compute_changes, ChangeMode},
        composite::weighted_sum,
        regime::{classify, Regime, RegimeThresholds},
        resample::forward_fill,
    },
};
use proptest::prelude::*;

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    origin().checked_add_days(Days::new(offset)).unwrap()
}

fn daily_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::weighted(0.85, -500.0f64..500.0), 1..500)
}

proptest! {
    #[test]
    fn forward_fill_is_total_after_first_observation(
        points in prop::collection::vec((0u64..200, -1e6f64..1e6), 1..40),
    ) {
        let series = IndicatorSeries::new(
            "P",
            points.iter().map(|(offset, value)| Observation::new(day(*offset), *value)).collect(),
        );
        let range = DateRange::new(origin(), day(220)).unwrap();
        let daily = forward_fill(&series, range);
        let first = series.first_date().unwrap();

        for (date, value) in daily.dates().zip(daily.values()) {
            if date < first {
                prop_assert!(value.is_none());
            } else {
                let expected = series
                    .observations()
                    .iter()
                    .rev()
                    .find(|obs| obs.date <= date)
                    .map(|obs| obs.value);
                prop_assert_eq!(*value, expected);
            }
        }
    }

    #[test]
    fn horizon_change_matches_definition(values in daily_values(), percent in any::<bool>()) {
        let range = DateRange::new(origin(), day(values.len() as u64 - 1)).unwrap();
        let series = DailySeries::new("C", range, values.clone());
        let mode = if percent { ChangeMode::Percent } else { ChangeMode::Absolute };
        let changes = compute_changes(&series, mode, 7);

        for (idx, record) in changes.records().iter().enumerate() {
            for (months, actual) in [
                (1u32, record.change_1),
                (3, record.change_3),
                (12, record.change_12),
            ] {
                let anchor = record.date.checked_sub_months(Months::new(months)).unwrap();
                let prior = range.index_of(anchor).and_then(|i| values[i]);
                let expected = match (values[idx], prior) {
                    (Some(v), Some(p)) if percent && p != 0.0 => Some((v - p) / p),
                    (Some(_), Some(_)) if percent => None,
                    (Some(v), Some(p)) => Some(v - p),
                    _ => None,
                };
                prop_assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn second_difference_recurrence(values in daily_values(), lag in 1usize..30) {
        let range = DateRange::new(origin(), day(values.len() as u64 - 1)).unwrap();
        let series = DailySeries::new("D", range, values);
        let changes = compute_changes(&series, ChangeMode::Absolute, lag);
        let records = changes.records();

        for idx in 0..records.len() {
            if idx < lag {
                prop_assert!(records[idx].delta.is_none());
                prop_assert!(records[idx].delta2.is_none());
                continue;
            }
            match (records[idx].delta, records[idx - lag].delta) {
                (Some(now), Some(before)) => {
                    prop_assert_eq!(records[idx].delta2, Some(now - before));
                }
                _ => prop_assert!(records[idx].delta2.is_none()),
            }
        }
    }

    #[test]
    fn composite_missing_iff_any_input_missing(
        inputs in prop::collection::vec((-5.0f64..5.0, prop::option::of(-10.0f64..10.0)), 1..8),
    ) {
        let result = weighted_sum(inputs.iter().copied());
        if inputs.iter().any(|(_, value)| value.is_none()) {
            prop_assert!(result.is_none());
        } else {
            let expected: f64 = inputs.iter().map(|(w, v)| w * v.unwrap()).sum();
            prop_assert!((result.unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn short_history_is_never_classified(
        growth in -10.0f64..10.0,
        inflation in -10.0f64..10.0,
        window in 1usize..1000,
    ) {
        let thresholds = RegimeThresholds { growth: 0.0, inflation: 0.0, min_window: window };
        prop_assert_eq!(
            classify(Some(growth), Some(inflation), window - 1, &thresholds),
            Regime::InsufficientSample
        );
        prop_assert_ne!(
            classify(Some(growth), Some(inflation), window, &thresholds),
            Regime::InsufficientSample
        );
    }
}
