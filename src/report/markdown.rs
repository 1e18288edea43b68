//! Human-readable run summary.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use super::{dashboard::format_value, snapshot::DashboardSnapshot, WriteError};

pub fn render_markdown(
    snapshot: &DashboardSnapshot,
    generated_at: DateTime<Utc>,
) -> Result<String, WriteError> {
    let mut out = String::new();
    write_report(&mut out, snapshot, generated_at)
        .map_err(|err| WriteError::Render(err.to_string()))?;
    Ok(out)
}

fn write_report(
    out: &mut String,
    snapshot: &DashboardSnapshot,
    generated_at: DateTime<Utc>,
) -> fmt::Result {
    writeln!(out, "# FRED macro dashboard\n")?;
    writeln!(
        out,
        "Generated (UTC): {}  \nAs of: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.as_of
    )?;

    writeln!(out, "## Snapshot\n")?;
    writeln!(
        out,
        "- Risk-off index: **{}** (higher = more defensive)",
        format_value(snapshot.risk_off_index)
    )?;
    writeln!(
        out,
        "- Policy-Tightness index: **{}** (higher = tighter)",
        format_value(snapshot.policy_tightness_index)
    )?;
    writeln!(out, "- Regime: **{}**\n", snapshot.regime_label)?;

    writeln!(out, "## Indicators\n")?;
    writeln!(out, "| Metric | Status | Latest | 1M | 3M | 12M | Last obs |")?;
    writeln!(out, "|---|---|---:|---:|---:|---:|---|")?;
    for row in &snapshot.metrics {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            row.metric,
            row.status.map_or("-", |light| light.as_str()),
            format_value(row.value),
            format_value(row.change_1m),
            format_value(row.change_3m),
            format_value(row.change_12m),
            row.latest_date
                .map_or_else(|| "-".to_string(), |date| date.to_string()),
        )?;
    }

    if !snapshot.failed.is_empty() {
        writeln!(out, "\n## Unavailable\n")?;
        for name in &snapshot.failed {
            writeln!(out, "- {name}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;
    use crate::{
        report::snapshot::MetricRow,
        signals::{regime::Regime, status::StatusLight},
    };

    #[test]
    fn lists_rows_and_unavailable_metrics() {
        let snapshot = DashboardSnapshot {
            as_of: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            metrics: vec![MetricRow {
                metric: "BAA-AAA".into(),
                latest_date: NaiveDate::from_ymd_opt(2024, 6, 28),
                value: Some(0.9),
                change_1m: Some(0.1),
                change_3m: Some(0.2),
                change_12m: None,
                delta: None,
                delta2: None,
                status: Some(StatusLight::Red),
            }],
            risk_off_index: Some(1.25),
            policy_tightness_index: None,
            growth_proxy: None,
            inflation_proxy: None,
            regime: Regime::GrowthDownInflationUp,
            regime_quadrant: Some(3),
            regime_label: Regime::GrowthDownInflationUp.label(),
            failed: vec!["CPI".into()],
        };
        let generated_at = Utc.with_ymd_and_hms(2024, 7, 1, 6, 0, 0).unwrap();

        let text = render_markdown(&snapshot, generated_at).unwrap();
        assert!(text.contains("Generated (UTC): 2024-07-01 06:00:00"));
        assert!(text.contains("- Risk-off index: **1.2500**"));
        assert!(text.contains("- Policy-Tightness index: **NaN**"));
        assert!(text.contains(
            "| BAA-AAA | red | 0.9000 | 0.1000 | 0.2000 | NaN | 2024-06-28 |"
        ));
        assert!(text.ends_with("## Unavailable\n\n- CPI\n"));
    }
}
