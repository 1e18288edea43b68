//! Entry point wiring CLI dispatch to pipeline modules.

use anyhow::Result;
use fred_macro::{cli::Cli, config::Settings, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing()?;
    let cli = Cli::parse();
    let settings = Settings::load()?;

    info!(?cli, ?settings, "starting command");
    cli.dispatch(settings).await
}
