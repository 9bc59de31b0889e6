//! Sentence embeddings and semantic matching for Careline.
//!
//! This crate provides:
//! - Embedding generation via the Hugging Face inference API
//! - Cosine similarity between embedding vectors
//! - Best-match lookup of queries against a fixed reference set

pub mod embeddings;
pub mod error;
pub mod matcher;

pub use embeddings::{cosine_similarity, EmbeddingProvider, HuggingFaceEmbeddings};
pub use error::MemoryError;
pub use matcher::{MatchResult, SemanticMatcher};

/// Result type for memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
