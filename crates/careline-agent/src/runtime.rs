//! Responder runtime for executing conversation turns.

use crate::error::AgentError;
use crate::Result;
use careline_core::config::{ChatConfig, ContextPolicy};
use careline_core::context::ContextMonitor;
use careline_core::{Conversation, RetryPolicy};
use careline_providers::{ChatOptions, Message, Provider, Usage};
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration for the responder.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// Model identifier sent to the provider.
    pub model: String,

    /// Temperature for generation.
    pub temperature: f32,

    /// Maximum output tokens.
    pub max_tokens: usize,

    /// Model context window in tokens.
    pub context_limit: usize,

    /// What to do when the prompt does not fit.
    pub context_policy: ContextPolicy,

    /// Instruction placed before every prompt.
    pub system_prompt: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for RuntimeConfig {
    fn from(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            context_limit: config.context_limit,
            context_policy: config.context_policy,
            system_prompt: config.system_prompt.clone(),
        }
    }
}

/// Messages ready to send, with the context decision behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// System instruction, kept prior turns, then the new user turn.
    pub messages: Vec<Message>,

    /// Estimated prompt tokens.
    pub estimated_tokens: usize,

    /// Oldest prior turns left out to fit the context window.
    pub dropped_turns: usize,
}

/// Result of one successful turn.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The input conversation followed by the new user and assistant turns.
    pub conversation: Conversation,

    /// Generated reply, verbatim.
    pub reply: String,

    /// Token usage reported by the provider.
    pub usage: Usage,

    /// Prior turns that were not sent with this prompt.
    pub dropped_turns: usize,
}

/// Produces replies from a generation provider for a caller-owned
/// conversation.
pub struct Responder {
    config: RuntimeConfig,
    provider: Arc<dyn Provider>,
    monitor: ContextMonitor,
    retry: RetryPolicy,
}

impl Responder {
    /// Create a responder with the default retry policy.
    pub fn new(config: RuntimeConfig, provider: Arc<dyn Provider>) -> Self {
        let monitor = ContextMonitor::new(config.context_limit).with_reserved_output(config.max_tokens);
        Self {
            config,
            provider,
            monitor,
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry policy for provider calls.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get the runtime configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Assemble the prompt for `input` following `conversation`.
    pub fn build_prompt(&self, conversation: &Conversation, input: &str) -> Result<Prompt> {
        if input.trim().is_empty() {
            return Err(AgentError::invalid_input(
                "message must not be empty or whitespace",
            ));
        }

        let history = conversation.turns();
        let plan = self.monitor.plan(
            &self.config.system_prompt,
            history,
            input,
            self.config.context_policy,
        )?;

        let mut messages = Vec::with_capacity(history.len() - plan.keep_from + 2);
        messages.push(Message::system(self.config.system_prompt.as_str()));
        messages.extend(history[plan.keep_from..].iter().map(Message::from));
        messages.push(Message::user(input));

        Ok(Prompt {
            messages,
            estimated_tokens: plan.estimated_tokens,
            dropped_turns: plan.dropped(),
        })
    }

    /// Generate a reply to `input`.
    ///
    /// The caller's conversation is left untouched; the extended log is
    /// returned in the [`Exchange`].
    pub async fn respond(&self, conversation: &Conversation, input: &str) -> Result<Exchange> {
        let prompt = self.build_prompt(conversation, input)?;

        if prompt.dropped_turns > 0 {
            debug!(
                dropped = prompt.dropped_turns,
                "Oldest turns left out to fit context window"
            );
        }
        debug!(
            model = %self.config.model,
            messages = prompt.messages.len(),
            estimated_tokens = prompt.estimated_tokens,
            "Sending prompt"
        );

        let options = ChatOptions::with_max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature);
        let provider = self.provider.as_ref();
        let model = self.config.model.as_str();
        let messages = prompt.messages.as_slice();

        let response = self
            .retry
            .run("chat", move || provider.chat(model, messages, Some(options.clone())))
            .await?;

        info!(
            provider = provider.name(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Exchange completed"
        );

        let mut extended = conversation.clone();
        extended.record_exchange(input, response.content.as_str());

        Ok(Exchange {
            conversation: extended,
            reply: response.content,
            usage: response.usage,
            dropped_turns: prompt.dropped_turns,
        })
    }
}
