//! Environment variable handling.

use std::env;
use std::path::Path;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Load environment variables from `.env` in the working directory.
///
/// Variables that are already set are never overridden.
pub fn load_dotenv() -> Result<(), std::io::Error> {
    load_dotenv_from(Path::new(".env"))
}

/// Load environment variables from a dotenv-style file.
pub fn load_dotenv_from(path: &Path) -> Result<(), std::io::Error> {
    if !path.exists() {
        return Ok(());
    }

    let content = std::fs::read_to_string(path)?;
    for (key, value) in parse_dotenv(&content) {
        if env::var(&key).is_err() {
            env::set_var(key, value);
        }
    }
    Ok(())
}

/// Parse `KEY=value` lines, skipping comments and blank lines.
fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            // Remove quotes if present
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);

            if !key.is_empty() {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
    }

    pairs
}

/// Environment variable names read by Careline.
pub mod vars {
    /// API key for the Groq chat completion service.
    pub const GROQ_API_KEY: &str = "GROQ_API_KEY";

    /// Access token for the Hugging Face inference API.
    pub const HF_TOKEN: &str = "HF_TOKEN";

    /// Config file override.
    pub const CARELINE_CONFIG: &str = "CARELINE_CONFIG";

    /// Log filter override.
    pub const CARELINE_LOG: &str = "CARELINE_LOG";

    /// Chat model override.
    pub const CARELINE_CHAT_MODEL: &str = "CARELINE_CHAT_MODEL";

    /// Embedding model override.
    pub const CARELINE_EMBEDDING_MODEL: &str = "CARELINE_EMBEDDING_MODEL";
}
