//! Chat completion providers for Careline.
//!
//! The only concrete provider speaks the OpenAI-compatible
//! `/chat/completions` protocol, which covers Groq (the default) as well
//! as OpenAI itself and most self-hosted gateways.
//!
//! # Example
//!
//! ```rust,ignore
//! use careline_providers::{Message, Provider, openai::OpenAICompatProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = OpenAICompatProvider::groq("gsk_...")?;
//!
//!     let messages = vec![
//!         Message::system("You are a helpful assistant."),
//!         Message::user("What is a deductible?"),
//!     ];
//!
//!     let response = provider.chat("llama3-8b-8192", &messages, None).await?;
//!     println!("Response: {}", response.content);
//!
//!     Ok(())
//! }
//! ```

mod error;
mod types;

pub mod openai;

pub use error::{ProviderError, Result};
pub use types::*;

use async_trait::async_trait;

/// A model provider that can generate completions.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get provider name.
    fn name(&self) -> &str;

    /// Generate a chat completion.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: Option<ChatOptions>,
    ) -> Result<ChatResponse>;
}
