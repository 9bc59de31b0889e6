//! Embedding and matching error types.

use careline_core::Retryable;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while embedding or matching text.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedding service rejected the credential.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The embedding service is throttling requests.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// The embedding service is down or still loading the model.
    #[error("Embedding service unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    /// Text rejected before or by the service.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Embedding generation failed or returned an unusable payload.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A matcher needs at least one reference text.
    #[error("Reference set is empty")]
    EmptyReferences,

    /// Vectors of different length were compared or returned.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Cosine similarity is undefined for a zero vector.
    #[error("Cosine similarity is undefined for a zero-magnitude vector")]
    ZeroMagnitude,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemoryError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl Retryable for MemoryError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Unavailable { .. } => true,
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => retry_after.map(Duration::from_secs),
            _ => None,
        }
    }
}
