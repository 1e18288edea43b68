//! CLI entry-point for a full fetch-and-build pass.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use super::{build::publish, fetch::store_fetched, CatalogArgs};
use crate::{
    config::Settings,
    data::{fetch_all, FredClient, RawCache},
};

/// Args for the `run` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// First observation date to request (defaults to the catalog start).
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// Last day of the daily axis (defaults to today, UTC).
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let mut catalog = args.catalog.load(&settings)?;
    if let Some(start) = args.start {
        catalog.start = start;
    }
    let client = FredClient::new(&settings)?;

    info!(start = %catalog.start, indicators = catalog.indicators.len(), "fetching FRED series");
    let fetched = fetch_all(
        &client,
        &catalog.indicators,
        catalog.start,
        settings.fetch_concurrency,
    )
    .await;
    let stored = store_fetched(&RawCache::from_settings(&settings), &fetched)?;
    info!(stored, failed = fetched.len() - stored, "fetch complete");

    publish(&catalog, &fetched, args.end, &settings)
}
