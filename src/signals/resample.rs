//! Projection of low-frequency observations onto a daily grid.

use crate::data::{DailySeries, DateRange, IndicatorSeries};

/// Last-observation-carried-forward onto every day of `range`.
///
/// Each day takes the most recent observation dated on or before it,
/// including observations that precede `range`. Days before the first
/// observation stay missing; nothing is back-filled.
pub fn forward_fill(series: &IndicatorSeries, range: DateRange) -> DailySeries {
    let observations = series.observations();
    let mut cursor = 0;
    let mut last = None;
    let values = range
        .iter()
        .map(|day| {
            while cursor < observations.len() && observations[cursor].date <= day {
                last = Some(observations[cursor].value);
                cursor += 1;
            }
            last
        })
        .collect();
    DailySeries::new(series.id(), range, values)
}

/// Day-by-day `minuend - subtrahend`, missing where either leg is missing.
pub fn spread(id: &str, minuend: &DailySeries, subtrahend: &DailySeries) -> DailySeries {
    let values = minuend
        .dates()
        .zip(minuend.values())
        .map(|(day, left)| Some((*left)? - subtrahend.value_on(day)?))
        .collect();
    DailySeries::new(id, minuend.range(), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn monthly() -> IndicatorSeries {
        IndicatorSeries::new(
            "PAYEMS",
            vec![
                Observation::new(date("2024-01-03"), 10.0),
                Observation::new(date("2024-01-06"), 12.0),
            ],
        )
    }

    #[test]
    fn leading_days_stay_missing_and_gaps_carry_forward() {
        let range = DateRange::new(date("2024-01-01"), date("2024-01-08")).unwrap();
        let daily = forward_fill(&monthly(), range);
        assert_eq!(
            daily.values(),
            &[
                None,
                None,
                Some(10.0),
                Some(10.0),
                Some(10.0),
                Some(12.0),
                Some(12.0),
                Some(12.0)
            ]
        );
    }

    #[test]
    fn observation_before_range_seeds_first_day() {
        let range = DateRange::new(date("2024-01-04"), date("2024-01-05")).unwrap();
        let daily = forward_fill(&monthly(), range);
        assert_eq!(daily.values(), &[Some(10.0), Some(10.0)]);
    }

    #[test]
    fn empty_series_is_all_missing() {
        let range = DateRange::new(date("2024-01-01"), date("2024-01-03")).unwrap();
        let daily = forward_fill(&IndicatorSeries::new("X", vec![]), range);
        assert!(daily.values().iter().all(Option::is_none));
    }

    #[test]
    fn spread_requires_both_legs() {
        let range = DateRange::new(date("2024-01-01"), date("2024-01-03")).unwrap();
        let ten = DailySeries::new("DGS10", range, vec![Some(4.0), Some(4.2), Some(4.1)]);
        let two = DailySeries::new("DGS2", range, vec![None, Some(4.5), Some(4.0)]);
        let curve = spread("10Y-2Y", &ten, &two);
        assert_eq!(curve.values()[0], None);
        assert!((curve.values()[1].unwrap() + 0.3).abs() < 1e-12);
        assert!((curve.values()[2].unwrap() - 0.1).abs() < 1e-12);
    }
}
