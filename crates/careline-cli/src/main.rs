//! Careline CLI entry point.

use careline_cli::{config_path, load_config, logging, run, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Pick up credentials from ./.env without overriding the environment
    if let Err(e) = careline_core::env::load_dotenv() {
        eprintln!("warning: could not read .env: {}", e);
    }

    let path = config_path(cli.config.as_deref())?;
    let config = load_config(&path)?;

    // Initialize logging
    logging::init(cli.verbose, &config.logging)?;

    // Run the command
    run(cli, path, config).await
}
