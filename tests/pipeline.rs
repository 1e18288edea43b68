use chrono::NaiveDate;
use fred_macro::{
    catalog::Catalog,
    data::{fetch_all, DateRange, IndicatorSeries, Observation, StaticSource},
    report::{self, dashboard::render_dashboard, DashboardSnapshot},
    signals::{self, regime::Regime, MacroFrame},
};

const CATALOG: &str = r#"
start = "2023-01-01"
diff_lag_days = 21
normalization = { type = "raw" }
spreads = []
risk_off = [
  { indicator = "Rate", measure = "change3", weight = 2.0 },
  { indicator = "Step", measure = "change3", weight = -1.5 },
]
policy_tightness = [
  { indicator = "Late", measure = "change3", weight = 1.0 },
  { indicator = "Step", weight = 0.01 },
]

[indicators.Rate]
series_id = "RATE"

[indicators.Step]
series_id = "STEP"

[indicators.Late]
series_id = "LATE"

[regime]
growth = [{ indicator = "Step", measure = "change3", weight = 1.0 }]
inflation = [{ indicator = "Rate", measure = "change3", weight = 1.0 }]
min_window_days = 300
"#;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn month_starts(from: (i32, u32), count: usize) -> Vec<NaiveDate> {
    let (mut year, mut month) = from;
    (0..count)
        .map(|_| {
            let day = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
            day
        })
        .collect()
}

/// Constant 2.0, a step from 100 to 110 in December, and a ramp missing January.
fn source() -> StaticSource {
    let months = month_starts((2023, 1), 13);
    let constant = months.iter().map(|d| Observation::new(*d, 2.0)).collect();
    let step = months
        .iter()
        .map(|d| {
            let value = if *d >= date("2023-12-01") { 110.0 } else { 100.0 };
            Observation::new(*d, value)
        })
        .collect();
    let late = months
        .iter()
        .skip(1)
        .enumerate()
        .map(|(k, d)| Observation::new(*d, 50.0 + k as f64))
        .collect();
    StaticSource::new()
        .with_series(IndicatorSeries::new("RATE", constant))
        .with_series(IndicatorSeries::new("STEP", step))
        .with_series(IndicatorSeries::new("LATE", late))
}

async fn frame_from(source: &StaticSource) -> (Catalog, MacroFrame) {
    let catalog = Catalog::from_toml(CATALOG).unwrap();
    catalog.validate().unwrap();
    let fetched = fetch_all(source, &catalog.indicators, catalog.start, 2).await;
    let range = DateRange::new(catalog.start, date("2024-01-31")).unwrap();
    let frame = signals::compute(&catalog, &fetched, range);
    (catalog, frame)
}

fn idx(frame: &MacroFrame, day: &str) -> usize {
    frame.range.index_of(date(day)).unwrap()
}

#[tokio::test]
async fn changes_are_defined_only_with_enough_history() {
    let (_, frame) = frame_from(&source()).await;

    let early = idx(&frame, "2023-03-15");
    for name in ["Rate", "Step", "Late"] {
        assert_eq!(
            frame.changes[name].records()[early].change_3,
            None,
            "{name}"
        );
    }

    let rate = frame.changes["Rate"].latest().unwrap();
    let step = frame.changes["Step"].latest().unwrap();
    let late = frame.changes["Late"].latest().unwrap();
    assert_eq!(rate.change_3, Some(0.0));
    assert_eq!(rate.change_12, Some(0.0));
    assert!((step.change_3.unwrap() - 0.1).abs() < 1e-12);
    assert!((step.change_12.unwrap() - 0.1).abs() < 1e-12);
    assert!((late.change_3.unwrap() - 3.0 / 58.0).abs() < 1e-12);
    // Late's first observation is 2023-02-01, after the 12-month anchor.
    assert_eq!(late.change_12, None);
}

#[tokio::test]
async fn composites_turn_finite_once_every_input_exists() {
    let (_, frame) = frame_from(&source()).await;

    let risk = frame.risk_off.values();
    assert_eq!(risk[idx(&frame, "2023-03-31")], None);
    assert!(risk[idx(&frame, "2023-04-01")].is_some());
    assert!((frame.risk_off.latest().unwrap() - (-0.15)).abs() < 1e-12);

    let policy = frame.policy_tightness.values();
    assert_eq!(policy[idx(&frame, "2023-04-30")], None);
    assert!(policy[idx(&frame, "2023-05-01")].is_some());
    let expected = 3.0 / 58.0 + 0.01 * 110.0;
    assert!((frame.policy_tightness.latest().unwrap() - expected).abs() < 1e-12);
}

#[tokio::test]
async fn regime_waits_for_minimum_window() {
    let (catalog, frame) = frame_from(&source()).await;

    // 299 days of joint history: proxies exist but the guard wins.
    assert!(frame.growth_proxy.values()[298].is_some());
    assert_eq!(frame.regimes[298], Regime::InsufficientSample);
    assert_eq!(frame.regimes[299], Regime::GrowthDownInflationDown);
    assert_eq!(frame.latest_regime(), Regime::GrowthUpInflationDown);
    assert!(frame.failed.is_empty());
    assert_eq!(
        DashboardSnapshot::from_frame(&frame, &catalog).regime_quadrant,
        Some(1)
    );
}

#[tokio::test]
async fn failed_indicator_degrades_its_row_and_dependents() {
    let months = month_starts((2023, 1), 13);
    let partial = StaticSource::new()
        .with_series(IndicatorSeries::new(
            "RATE",
            months.iter().map(|d| Observation::new(*d, 2.0)).collect(),
        ))
        .with_series(IndicatorSeries::new(
            "STEP",
            months.iter().map(|d| Observation::new(*d, 100.0)).collect(),
        ));
    let (catalog, frame) = frame_from(&partial).await;

    assert_eq!(frame.failed.len(), 1);
    assert_eq!(frame.failed[0].name, "Late");
    assert!(frame.daily["Late"].values().iter().all(Option::is_none));
    assert_eq!(frame.policy_tightness.latest(), None);
    assert_eq!(frame.risk_off.latest(), Some(0.0));

    let snapshot = DashboardSnapshot::from_frame(&frame, &catalog);
    let csv = String::from_utf8(render_dashboard(&snapshot).unwrap()).unwrap();
    assert!(csv.contains("\nLate,NaN,NaN,NaN,NaN,NaN,NaN\n"));
    assert!(csv.contains("\nPolicy-Tightness index,NaN,"));
}

#[tokio::test]
async fn outputs_are_byte_identical_across_runs() {
    let out_a = tempfile::tempdir().unwrap();
    let out_b = tempfile::tempdir().unwrap();
    let generated_at = chrono::Utc::now();

    let (catalog, frame) = frame_from(&source()).await;
    let first = report::write_outputs(&frame, &catalog, out_a.path(), generated_at).unwrap();
    let (catalog, frame) = frame_from(&source()).await;
    let second = report::write_outputs(&frame, &catalog, out_b.path(), generated_at).unwrap();

    for (a, b) in [
        (&first.dashboard, &second.dashboard),
        (&first.features, &second.features),
        (&first.snapshot, &second.snapshot),
        (&first.report, &second.report),
    ] {
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    let features = std::fs::read_to_string(&first.features).unwrap();
    let header = features.lines().next().unwrap();
    assert!(header.starts_with("date,Rate,Step,Late,risk_off_index"));
    assert!(header.ends_with(",regime"));
    // the whole 396-day axis fits in the default 900-day window
    assert_eq!(features.lines().count(), 397);
}

const HELD_FLAT_CATALOG: &str = r#"
start = "2023-01-01"
normalization = { type = "zscore", window = 30 }
spreads = []
risk_off = [
  { indicator = "Policy rate", weight = 1.0 },
  { indicator = "Claims", weight = 0.5 },
]
policy_tightness = [{ indicator = "Policy rate", weight = 1.0 }]

[indicators."Policy rate"]
series_id = "RATE"
change = "absolute"

[indicators.Claims]
series_id = "CLAIMS"

[regime]
growth = [{ indicator = "Claims", measure = "change1", weight = -1.0 }]
inflation = [{ indicator = "Policy rate", measure = "change1", weight = 1.0 }]
min_window_days = 30
"#;

#[tokio::test]
async fn held_flat_input_keeps_composites_defined() {
    let months = month_starts((2023, 1), 12);
    let source = StaticSource::new()
        .with_series(IndicatorSeries::new(
            "RATE",
            months.iter().map(|d| Observation::new(*d, 5.33)).collect(),
        ))
        .with_series(IndicatorSeries::new(
            "CLAIMS",
            months
                .iter()
                .enumerate()
                .map(|(k, d)| Observation::new(*d, 200.0 + 5.0 * k as f64))
                .collect(),
        ));
    let catalog = Catalog::from_toml(HELD_FLAT_CATALOG).unwrap();
    catalog.validate().unwrap();
    let fetched = fetch_all(&source, &catalog.indicators, catalog.start, 1).await;
    let range = DateRange::new(catalog.start, date("2023-12-31")).unwrap();
    let frame = signals::compute(&catalog, &fetched, range);

    // 12 samples are needed before a 30-day z-score exists.
    let warmup = 11;
    assert_eq!(frame.policy_tightness.values()[warmup - 1], None);
    assert!(frame.policy_tightness.values()[warmup..]
        .iter()
        .all(|v| *v == Some(0.0)));
    assert!(frame.risk_off.values()[warmup..]
        .iter()
        .all(|v| matches!(v, Some(x) if x.is_finite())));
}
