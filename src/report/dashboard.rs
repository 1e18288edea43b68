//! Dashboard CSV: one row per metric plus index and regime trailers.
//!
//! Output is a pure function of the snapshot: fixed column order, four
//! decimal places and an explicit `NaN` token for missing values.

use super::{snapshot::DashboardSnapshot, WriteError};

pub const HEADER: [&str; 7] = [
    "metric",
    "latest",
    "change_1m",
    "change_3m",
    "change_12m",
    "delta",
    "delta2",
];

/// Token for values that could not be computed.
pub const MISSING: &str = "NaN";

pub const RISK_OFF_ROW: &str = "Risk-off index";
pub const POLICY_ROW: &str = "Policy-Tightness index";
pub const REGIME_ROW: &str = "Regime";

pub fn format_value(value: Option<f64>) -> String {
    match value {
        // -0.0 would otherwise render as "-0.0000"
        Some(v) if v.is_finite() => format!("{:.4}", if v == 0.0 { 0.0 } else { v }),
        _ => MISSING.to_string(),
    }
}

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> Result<Vec<u8>, WriteError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for row in &snapshot.metrics {
        writer.write_record([
            row.metric.clone(),
            format_value(row.value),
            format_value(row.change_1m),
            format_value(row.change_3m),
            format_value(row.change_12m),
            format_value(row.delta),
            format_value(row.delta2),
        ])?;
    }

    let blanks = || std::iter::repeat(MISSING.to_string()).take(HEADER.len() - 2);
    for (name, value) in [
        (RISK_OFF_ROW, format_value(snapshot.risk_off_index)),
        (POLICY_ROW, format_value(snapshot.policy_tightness_index)),
        (REGIME_ROW, snapshot.regime.label().to_string()),
    ] {
        let record: Vec<String> = [name.to_string(), value].into_iter().chain(blanks()).collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|err| WriteError::Render(err.error().to_string()))
}
