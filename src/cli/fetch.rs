//! CLI entry-point for downloading FRED observations into the raw cache.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use super::CatalogArgs;
use crate::{
    config::Settings,
    data::{fetch_all, FetchOutcome, FredClient, RawCache},
};

/// Args for the `fetch` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// First observation date to request (defaults to the catalog start).
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let catalog = args.catalog.load(&settings)?;
    let start = args.start.unwrap_or(catalog.start);
    let client = FredClient::new(&settings)?;

    info!(%start, indicators = catalog.indicators.len(), "fetching FRED series");
    let fetched = fetch_all(
        &client,
        &catalog.indicators,
        start,
        settings.fetch_concurrency,
    )
    .await;
    let cache = RawCache::from_settings(&settings);
    let stored = store_fetched(&cache, &fetched)?;
    if stored == 0 {
        bail!("no series could be fetched");
    }
    info!(stored, failed = fetched.len() - stored, "fetch complete");
    Ok(())
}

/// Persist successful fetches; failures are already logged by `fetch_all`.
pub(crate) fn store_fetched(cache: &RawCache, fetched: &FetchOutcome) -> Result<usize> {
    let mut stored = 0;
    for (name, result) in fetched {
        match result {
            Ok(series) => {
                cache.store(series)?;
                stored += 1;
            }
            Err(err) => warn!(indicator = %name, %err, "leaving cached copy untouched"),
        }
    }
    Ok(stored)
}
