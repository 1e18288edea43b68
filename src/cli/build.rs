//! CLI entry-point for building the dashboard from cached observations.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use super::{date_range, CatalogArgs};
use crate::{
    catalog::Catalog,
    config::Settings,
    data::{fetch_all, FetchOutcome, RawCache},
    report, signals,
};

/// Args for the `build` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Last day of the daily axis (defaults to today, UTC).
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let catalog = args.catalog.load(&settings)?;
    let cache = RawCache::from_settings(&settings);
    info!(root = %cache.root().display(), "building from cached observations");
    let fetched = fetch_all(&cache, &catalog.indicators, catalog.start, 1).await;
    publish(&catalog, &fetched, args.end, &settings)
}

/// Compute the frame and write every artefact to the outputs directory.
pub(crate) fn publish(
    catalog: &Catalog,
    fetched: &FetchOutcome,
    end: Option<NaiveDate>,
    settings: &Settings,
) -> Result<()> {
    let range = date_range(catalog.start, end)?;
    let frame = signals::compute(catalog, fetched, range);
    let paths = report::write_outputs(&frame, catalog, &settings.outputs_dir, Utc::now())
        .context("writing dashboard artefacts")?;
    println!("{}", paths.dashboard.display());
    Ok(())
}
