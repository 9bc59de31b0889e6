//! Careline command-line interface.

pub mod commands;
pub mod corpus;
pub mod logging;
pub mod render;
pub mod repl;

use anyhow::Context;
use careline_core::{paths, Config};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Careline - health insurance assistant and semantic matcher
#[derive(Parser)]
#[command(name = "careline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "CARELINE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat(commands::chat::ChatArgs),

    /// Match queries against the reference documents
    Match(commands::matcher::MatchArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Resolve the config file path from `--config` or the default location.
pub fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => paths::config_file().context("Failed to resolve config path"),
    }
}

/// Load the effective configuration from `path`.
///
/// Values are not validated here; commands that use them validate, and
/// `config validate` reports the problems.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load_with_overrides(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli, config_path: PathBuf, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Chat(args) => commands::chat::run(args, config).await,
        Commands::Match(args) => commands::matcher::run(args, &config).await,
        Commands::Config(args) => commands::config::run(args, &config_path, &config),
        Commands::Version => {
            println!("careline {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
