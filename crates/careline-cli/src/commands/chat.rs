//! Interactive chat command.

use crate::repl::{Repl, ReplConfig};
use anyhow::Context;
use careline_agent::{Responder, RuntimeConfig};
use careline_core::{Config, Credentials, RetryPolicy};
use careline_providers::openai::OpenAICompatProvider;
use clap::Args;
use std::sync::Arc;

/// Chat command arguments.
#[derive(Args)]
pub struct ChatArgs {
    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt override
    #[arg(short, long)]
    pub system: Option<String>,

    /// Sampling temperature override (0.0 to 2.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Print token usage after each reply
    #[arg(long)]
    pub show_usage: bool,
}

impl ChatArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.chat.model = model.clone();
        }
        if let Some(system) = &self.system {
            config.chat.system_prompt = system.clone();
        }
        if let Some(temperature) = self.temperature {
            config.chat.temperature = temperature;
        }
    }
}

/// Run the chat command.
pub async fn run(args: ChatArgs, mut config: Config) -> anyhow::Result<()> {
    let api_key = Credentials::from_env().require_generation()?;

    args.apply(&mut config);
    config.validate().context("Invalid chat options")?;

    let provider = OpenAICompatProvider::new(api_key, config.chat.base_url.as_str())?
        .with_timeout(config.chat.timeout_secs)?;

    let responder = Responder::new(RuntimeConfig::from(&config.chat), Arc::new(provider))
        .with_retry(RetryPolicy::from(&config.retry));

    let repl_config = ReplConfig {
        show_token_usage: args.show_usage,
        ..ReplConfig::default()
    };

    Repl::new(responder, repl_config).run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let args = ChatArgs {
            model: Some("llama3-70b-8192".to_string()),
            system: None,
            temperature: Some(0.9),
            show_usage: false,
        };

        args.apply(&mut config);

        assert_eq!(config.chat.model, "llama3-70b-8192");
        assert_eq!(config.chat.temperature, 0.9);
        assert_eq!(config.chat.system_prompt, Config::default().chat.system_prompt);
    }

    #[test]
    fn test_out_of_range_temperature_fails_validation() {
        let mut config = Config::default();
        ChatArgs {
            model: None,
            system: None,
            temperature: Some(3.5),
            show_usage: false,
        }
        .apply(&mut config);

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_system_prompt_fails_validation() {
        let mut config = Config::default();
        ChatArgs {
            model: None,
            system: Some("   ".to_string()),
            temperature: None,
            show_usage: false,
        }
        .apply(&mut config);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("system_prompt"));
    }
}
