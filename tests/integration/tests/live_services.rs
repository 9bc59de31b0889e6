//! Tests against the hosted generation and embedding services.
//!
//! Ignored by default. Run with `GROQ_API_KEY` / `HF_TOKEN` set:
//! `cargo test -p careline-integration-tests -- --ignored`

use careline_agent::{Responder, RuntimeConfig};
use careline_core::{Conversation, RetryPolicy};
use careline_integration_tests::live_credential;
use careline_memory::{cosine_similarity, EmbeddingProvider, HuggingFaceEmbeddings, SemanticMatcher};
use careline_providers::openai::OpenAICompatProvider;
use std::sync::Arc;

#[tokio::test]
#[ignore = "requires HF_TOKEN and network access"]
async fn test_live_embeddings_are_deterministic() {
    let Some(token) = live_credential("HF_TOKEN") else {
        return;
    };
    let embeddings = HuggingFaceEmbeddings::new(token).unwrap();

    let first = embeddings.embed_one("What is a deductible?").await.unwrap();
    let second = embeddings.embed_one("What is a deductible?").await.unwrap();

    assert_eq!(first.len(), 384);
    assert!(cosine_similarity(&first, &second).unwrap() > 0.9999);
}

#[tokio::test]
#[ignore = "requires HF_TOKEN and network access"]
async fn test_live_matcher_prefers_related_reference() {
    let Some(token) = live_credential("HF_TOKEN") else {
        return;
    };
    let embeddings = Arc::new(HuggingFaceEmbeddings::new(token).unwrap());
    let matcher = SemanticMatcher::new(
        embeddings,
        vec!["apples are fruit".to_string(), "cars need fuel".to_string()],
    )
    .await
    .unwrap();

    let result = matcher.best_match("what do I eat").await.unwrap();
    assert_eq!(result.index, 0);
}

#[tokio::test]
#[ignore = "requires GROQ_API_KEY and network access"]
async fn test_live_chat_exchange() {
    let Some(key) = live_credential("GROQ_API_KEY") else {
        return;
    };
    let provider = OpenAICompatProvider::groq(key).unwrap();
    let responder =
        Responder::new(RuntimeConfig::default(), Arc::new(provider)).with_retry(RetryPolicy::default());

    let exchange = responder
        .respond(&Conversation::new(), "What is a copayment?")
        .await
        .unwrap();

    assert!(!exchange.reply.trim().is_empty());
    assert_eq!(exchange.conversation.len(), 2);
}
