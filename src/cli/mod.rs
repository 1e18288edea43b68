//! Command-line interface wiring for fred-macro.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::{catalog::Catalog, config::Settings, data::DateRange};

pub mod build;
pub mod fetch;
pub mod run;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "FRED macro indicator dashboard", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Fetch(args) => fetch::run(args, settings).await,
            Commands::Build(args) => build::run(args, settings).await,
            Commands::Run(args) => run::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download FRED observations into the raw cache.
    Fetch(fetch::Args),
    /// Build dashboard artefacts from cached observations.
    Build(build::Args),
    /// Fetch, cache and build in one pass.
    Run(run::Args),
}

/// Catalog selection shared by every command.
#[derive(Debug, Clone, clap::Args)]
pub struct CatalogArgs {
    /// TOML catalog overriding the built-in indicator set (defaults to $MACRO_CONFIG).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CatalogArgs {
    pub fn load(&self, settings: &Settings) -> Result<Catalog> {
        let path: Option<&Path> = self
            .config
            .as_deref()
            .or(settings.catalog_path.as_deref());
        Catalog::load(path).context("loading macro catalog")
    }
}

/// Daily axis from `start` to `end`, defaulting `end` to today (UTC).
pub fn date_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<DateRange> {
    let end = end.unwrap_or_else(|| Utc::now().date_naive());
    DateRange::new(start, end)
        .with_context(|| format!("end date {end} precedes start date {start}"))
}
