//! Configuration loading and persistence.

use super::Config;
use crate::env::{get_var, vars};
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load_or_default(&path)
    }

    /// Load configuration from `path`, or defaults if the file is absent.
    ///
    /// Environment overrides are applied and the result is validated.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_with_overrides(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load_or_default`] but without validation.
    ///
    /// Only syntax errors fail here; bad values are left for the caller
    /// to report.
    pub fn load_with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let mut config = match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 has no serializer; plain JSON is valid JSON5
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `CARELINE_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Some(model) = get_var(vars::CARELINE_CHAT_MODEL) {
            self.chat.model = model;
        }
        if let Some(model) = get_var(vars::CARELINE_EMBEDDING_MODEL) {
            self.embeddings.model = model;
        }
        if let Some(level) = get_var(vars::CARELINE_LOG) {
            self.logging.level = level;
        }
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.chat.model.trim().is_empty() {
            errors.push("chat.model cannot be empty".to_string());
        }
        if self.chat.base_url.trim().is_empty() {
            errors.push("chat.base_url cannot be empty".to_string());
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            errors.push(format!(
                "chat.temperature must be between 0.0 and 2.0, got {}",
                self.chat.temperature
            ));
        }
        if self.chat.max_tokens >= self.chat.context_limit {
            errors.push(format!(
                "chat.max_tokens ({}) must be smaller than chat.context_limit ({})",
                self.chat.max_tokens, self.chat.context_limit
            ));
        }
        if self.chat.system_prompt.trim().is_empty() {
            errors.push("chat.system_prompt cannot be empty".to_string());
        }

        if self.embeddings.model.trim().is_empty() {
            errors.push("embeddings.model cannot be empty".to_string());
        }
        if self.embeddings.base_url.trim().is_empty() {
            errors.push("embeddings.base_url cannot be empty".to_string());
        }
        if self.embeddings.dimension == 0 {
            errors.push("embeddings.dimension must be greater than 0".to_string());
        }

        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            errors.push(format!(
                "retry.multiplier must be at least 1.0, got {}",
                self.retry.multiplier
            ));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            errors.push(format!(
                "retry.initial_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.initial_delay_ms, self.retry.max_delay_ms
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }
}
