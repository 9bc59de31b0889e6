//! OpenAI-compatible chat completion provider.
//!
//! Groq exposes the OpenAI wire format under `/openai/v1`, so one client
//! serves both; only the base URL and credential differ.

use crate::{
    ChatOptions, ChatResponse, Message, Provider, ProviderError, Result, StopReason, Usage,
};
use async_trait::async_trait;
use careline_core::SecretString;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Groq OpenAI-compatible API base URL.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat completion provider for OpenAI-compatible services.
pub struct OpenAICompatProvider {
    /// HTTP client.
    client: Client,

    /// API key.
    api_key: SecretString,

    /// API base URL, without trailing slash.
    api_base: String,

    /// Provider name reported to callers.
    name: String,

    /// Request timeout, reported in timeout errors.
    timeout_secs: u64,
}

impl OpenAICompatProvider {
    /// Create a provider for an arbitrary OpenAI-compatible base URL.
    pub fn new(api_key: impl Into<SecretString>, api_base: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_blank() {
            return Err(ProviderError::config("API key is required"));
        }

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT_SECS)?,
            api_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            name: "openai-compatible".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Create a provider for Groq.
    pub fn groq(api_key: impl Into<SecretString>) -> Result<Self> {
        Ok(Self::new(api_key, GROQ_API_BASE)?.with_name("groq"))
    }

    /// Set the provider name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Result<Self> {
        self.client = build_client(secs)?;
        self.timeout_secs = secs;
        Ok(self)
    }

    /// Base URL requests are sent to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn map_send_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_secs)
        } else {
            ProviderError::Network(err)
        }
    }
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ProviderError::config(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-success response into a typed error.
async fn error_from_response(response: Response) -> ProviderError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body = response.text().await.unwrap_or_default();
    let (message, code) = match serde_json::from_str::<ApiError>(&body) {
        Ok(parsed) => (parsed.error.message, parsed.error.code),
        Err(_) if body.trim().is_empty() => (
            status.canonical_reason().unwrap_or("Unknown error").to_string(),
            None,
        ),
        Err(_) => (body, None),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::auth(message),
        StatusCode::NOT_FOUND => ProviderError::model_not_found(message),
        StatusCode::PAYLOAD_TOO_LARGE => ProviderError::context_exceeded(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limit(message, retry_after),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            if is_context_error(code.as_deref(), &message) {
                ProviderError::context_exceeded(message)
            } else {
                ProviderError::invalid_request(message)
            }
        }
        _ => ProviderError::server_error(status.as_u16(), message),
    }
}

fn is_context_error(code: Option<&str>, message: &str) -> bool {
    if code == Some("context_length_exceeded") {
        return true;
    }
    let lower = message.to_lowercase();
    lower.contains("context length") || lower.contains("context window")
}

#[async_trait]
impl Provider for OpenAICompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse> {
        let options = options.unwrap_or_default();
        let request = ChatRequest {
            model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stream: false,
        };

        debug!(
            provider = %self.name,
            model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header(reqwest::header::AUTHORIZATION, self.api_key.bearer())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        let parsed: ChatCompletion = serde_json::from_str(&body)?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::internal("No choices in response"))?;

        let usage = parsed.usage.unwrap_or_default();
        Ok(ChatResponse {
            id: parsed.id,
            model: parsed.model,
            content: choice.message.content.unwrap_or_default(),
            stop_reason: StopReason::from_finish_reason(choice.finish_reason.as_deref()),
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

// Wire types

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}
