//! # careline-core
//!
//! Core types, configuration, and utilities for Careline.
//!
//! This crate provides shared functionality used across all Careline crates:
//!
//! - **Configuration**: Loading, validation, and environment overrides
//! - **Credentials**: Fail-fast loading of service API keys
//! - **Types**: Conversation turns and the append-only conversation log
//! - **Context**: Token estimation against a model's context window
//! - **Retry**: Exponential backoff for transient service failures

pub mod config;
pub mod context;
pub mod credentials;
pub mod env;
pub mod error;
pub mod paths;
pub mod retry;
pub mod secret;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use credentials::Credentials;
pub use error::{ConfigError, Result};
pub use retry::{RetryPolicy, Retryable};
pub use secret::SecretString;
pub use types::*;
