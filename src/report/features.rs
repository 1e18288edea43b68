//! Daily features table for the trailing window of the axis.

use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};

use super::{dashboard::MISSING, WriteError};
use crate::signals::MacroFrame;

/// Per-day levels, composite indices, regime proxies and regime label for
/// the last `days` days of the frame.
pub fn features_frame(frame: &MacroFrame, days: usize) -> Result<DataFrame, WriteError> {
    let len = frame.range.days();
    let from = len.saturating_sub(days);

    let dates: Vec<String> = frame
        .range
        .iter()
        .skip(from)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .collect();
    let mut columns = vec![Series::new("date".into(), dates)];

    for (name, series) in &frame.daily {
        columns.push(Series::new(
            name.as_str().into(),
            series.values()[from..].to_vec(),
        ));
    }
    for index in [
        &frame.risk_off,
        &frame.policy_tightness,
        &frame.growth_proxy,
        &frame.inflation_proxy,
    ] {
        columns.push(Series::new(
            index.name().into(),
            index.values()[from..].to_vec(),
        ));
    }
    columns.push(Series::new(
        "regime".into(),
        frame.regimes[from..]
            .iter()
            .map(|regime| regime.label())
            .collect::<Vec<_>>(),
    ));

    Ok(DataFrame::new(columns)?)
}

pub fn render_features(frame: &MacroFrame, days: usize) -> Result<Vec<u8>, WriteError> {
    let mut df = features_frame(frame, days)?;
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .with_float_precision(Some(4))
        .with_null_value(MISSING.to_string())
        .finish(&mut df)?;
    Ok(buf)
}
