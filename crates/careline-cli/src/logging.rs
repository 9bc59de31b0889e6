//! Tracing subscriber setup.

use careline_core::config::{LogFormat, LoggingConfig};
use careline_core::env::get_var;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when the configured level does not parse.
const FALLBACK_DIRECTIVES: &str = "warn,careline=info";

/// Build the log filter.
///
/// `RUST_LOG` wins when set. Otherwise `-v` raises the level, falling back
/// to `logging.level` (which `CARELINE_LOG` overrides).
pub fn filter(verbose: u8, config: &LoggingConfig) -> EnvFilter {
    if let Some(directives) = get_var("RUST_LOG") {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }

    EnvFilter::new(effective_directives(verbose, config))
}

/// Directives that will actually be installed for the configured level.
fn effective_directives(verbose: u8, config: &LoggingConfig) -> String {
    let directives = directives(verbose, config);
    match EnvFilter::try_new(&directives) {
        Ok(_) => directives,
        Err(_) => FALLBACK_DIRECTIVES.to_string(),
    }
}

/// Filter directives for a verbosity count and configured level.
fn directives(verbose: u8, config: &LoggingConfig) -> String {
    let level = match verbose {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,careline={}", level)
    }
}

/// Install the global subscriber. Logs go to stderr.
pub fn init(verbose: u8, config: &LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(filter(verbose, config));

    match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
