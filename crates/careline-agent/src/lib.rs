//! Conversational responder for Careline.
//!
//! This crate turns a caller-owned [`careline_core::Conversation`] and a new
//! user message into a reply from a generation provider:
//! - Prompt assembly (system instruction, prior turns, new turn)
//! - Context window checks with reject or truncate policies
//! - Retry of transient provider failures

pub mod error;
pub mod runtime;

pub use error::AgentError;
pub use runtime::{Exchange, Prompt, Responder, RuntimeConfig};

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;
