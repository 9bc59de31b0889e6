//! Path resolution utilities.

use crate::env::{get_var, vars};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Get the Careline base directory (~/.careline).
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| {
        ConfigError::Validation("Could not determine home directory".to_string())
    })?;
    Ok(home.join(".careline"))
}

/// Get the config file path.
///
/// `CARELINE_CONFIG` takes precedence over ~/.careline/careline.json5.
pub fn config_file() -> Result<PathBuf, ConfigError> {
    if let Some(path) = get_var(vars::CARELINE_CONFIG) {
        return Ok(PathBuf::from(path));
    }
    Ok(base_dir()?.join("careline.json5"))
}

/// Get the REPL line-editing history file (~/.careline/history).
pub fn history_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join("history"))
}
