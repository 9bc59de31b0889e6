//! Service credentials read from the process environment.
//!
//! Both flows need exactly one secret each. Absence is reported as
//! [`ConfigError::MissingCredential`] before any service is contacted.

use crate::env::{get_var, vars};
use crate::error::ConfigError;
use crate::secret::SecretString;

/// API credentials for the external services.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Chat completion (Groq) API key.
    pub generation: Option<SecretString>,

    /// Embedding (Hugging Face) access token.
    pub embedding: Option<SecretString>,
}

impl Credentials {
    /// Read whatever credentials are present in the environment.
    pub fn from_env() -> Self {
        Self {
            generation: get_var(vars::GROQ_API_KEY).map(SecretString::new),
            embedding: get_var(vars::HF_TOKEN).map(SecretString::new),
        }
    }

    /// Get the generation key, failing if it is absent.
    pub fn require_generation(&self) -> Result<SecretString, ConfigError> {
        Self::require(&self.generation, vars::GROQ_API_KEY)
    }

    /// Get the embedding token, failing if it is absent.
    pub fn require_embedding(&self) -> Result<SecretString, ConfigError> {
        Self::require(&self.embedding, vars::HF_TOKEN)
    }

    fn require(
        secret: &Option<SecretString>,
        var: &'static str,
    ) -> Result<SecretString, ConfigError> {
        match secret {
            Some(s) if !s.is_blank() => Ok(s.clone()),
            _ => Err(ConfigError::MissingCredential(var)),
        }
    }
}
