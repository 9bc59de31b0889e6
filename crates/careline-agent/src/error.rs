//! Agent error types.

use careline_providers::ProviderError;
use thiserror::Error;

/// Errors that can occur while producing a reply.
#[derive(Debug, Error)]
pub enum AgentError {
    /// User input rejected before any service call.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The prompt does not fit the model's context window.
    #[error("Context limit exceeded: {used} tokens (max: {max})")]
    ContextExceeded {
        /// Estimated prompt tokens.
        used: usize,
        /// Tokens available for the prompt.
        max: usize,
    },

    /// Generation service error.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AgentError {
    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if the prompt was too long, as estimated locally or as
    /// reported by the service.
    pub fn is_context_exceeded(&self) -> bool {
        matches!(
            self,
            Self::ContextExceeded { .. } | Self::Provider(ProviderError::ContextLengthExceeded(_))
        )
    }
}

impl From<careline_core::context::ContextOverflow> for AgentError {
    fn from(overflow: careline_core::context::ContextOverflow) -> Self {
        Self::ContextExceeded {
            used: overflow.used,
            max: overflow.max,
        }
    }
}
