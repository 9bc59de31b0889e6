//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Default instruction for the conversational responder.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant in health insurance domain. \
If any question is asked outside of this domain don't say anything but \
'I can answer only from health or hospital domain. Nothing else.'";

/// Main Careline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat completion settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Embedding service settings.
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,

    /// Retry policy for external calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat completion service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model identifier.
    pub model: String,

    /// OpenAI-compatible API base URL.
    pub base_url: String,

    /// Sampling temperature (0.0 to 2.0).
    pub temperature: f32,

    /// Maximum tokens to generate per reply.
    pub max_tokens: usize,

    /// Model context window in tokens.
    pub context_limit: usize,

    /// What to do when the prompt does not fit the context window.
    pub context_policy: ContextPolicy,

    /// Fixed system instruction prepended to every prompt.
    pub system_prompt: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: "llama3-8b-8192".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            temperature: 0.4,
            max_tokens: 512,
            context_limit: 8192,
            context_policy: ContextPolicy::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Policy applied when the prompt exceeds the context window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextPolicy {
    /// Refuse the turn with a context-exceeded error.
    #[default]
    Reject,
    /// Drop the oldest turns from the prompt until it fits.
    TruncateOldest,
}

/// Embedding service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    /// Sentence-embedding model identifier.
    pub model: String,

    /// Inference API base URL.
    pub base_url: String,

    /// Expected vector length.
    pub dimension: usize,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            base_url: "https://router.huggingface.co/hf-inference".to_string(),
            dimension: 384,
            timeout_secs: 60,
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 disables retrying).
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds.
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,

    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 8000,
            multiplier: 2.0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}
