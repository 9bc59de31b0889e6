//! Semantic matching of queries against a fixed reference set.

use crate::embeddings::{cosine_similarity, validate_text, validate_vector, EmbeddingProvider};
use crate::error::MemoryError;
use crate::Result;
use careline_core::RetryPolicy;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// The reference closest to a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Query text.
    pub query: String,

    /// Position of the matched reference in the reference set.
    pub index: usize,

    /// Matched reference text.
    pub reference: String,

    /// Cosine similarity between query and reference.
    pub score: f32,
}

struct Reference {
    text: String,
    embedding: Vec<f32>,
}

/// Matches queries to the most similar text in a reference set.
///
/// Reference embeddings are computed once at construction and reused for
/// every query.
pub struct SemanticMatcher {
    provider: Arc<dyn EmbeddingProvider>,
    references: Vec<Reference>,
    retry: RetryPolicy,
}

impl SemanticMatcher {
    /// Embed `references` with the default retry policy.
    pub async fn new(provider: Arc<dyn EmbeddingProvider>, references: Vec<String>) -> Result<Self> {
        Self::with_retry(provider, references, RetryPolicy::default()).await
    }

    /// Embed `references`, retrying transient embedding failures per `retry`.
    pub async fn with_retry(
        provider: Arc<dyn EmbeddingProvider>,
        references: Vec<String>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        if references.is_empty() {
            return Err(MemoryError::EmptyReferences);
        }
        for text in &references {
            validate_text(text)?;
        }

        let embeddings = embed_batch(provider.as_ref(), &retry, &references).await?;
        let references = references
            .into_iter()
            .zip(embeddings)
            .map(|(text, embedding)| Reference { text, embedding })
            .collect::<Vec<_>>();

        info!(
            references = references.len(),
            dimension = provider.dimension(),
            "Reference set embedded"
        );

        Ok(Self {
            provider,
            references,
            retry,
        })
    }

    /// Number of reference texts.
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether the reference set is empty. Always false for a built matcher.
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Reference texts in their original order.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.references.iter().map(|r| r.text.as_str())
    }

    /// Find the reference most similar to `query`.
    ///
    /// Ties resolve to the lowest reference index.
    pub async fn best_match(&self, query: &str) -> Result<MatchResult> {
        let embedding = self.embed_query(query).await?;
        self.best_for(query, &embedding)
    }

    /// Score every reference against `query`, highest first.
    ///
    /// Equal scores keep reference order. At most `limit` results are
    /// returned.
    pub async fn rank(&self, query: &str, limit: usize) -> Result<Vec<MatchResult>> {
        let embedding = self.embed_query(query).await?;
        let mut scored = self
            .scores(&embedding)?
            .into_iter()
            .enumerate()
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(index, score)| self.result(query, index, score))
            .collect())
    }

    /// Best match for each query, in query order.
    ///
    /// All queries are embedded in a single batch.
    pub async fn match_all(&self, queries: &[String]) -> Result<Vec<MatchResult>> {
        if queries.is_empty() {
            return Ok(Vec::new());
        }
        for query in queries {
            validate_text(query)?;
        }

        let embeddings = embed_batch(self.provider.as_ref(), &self.retry, queries).await?;
        queries
            .iter()
            .zip(&embeddings)
            .map(|(query, embedding)| self.best_for(query, embedding))
            .collect()
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        validate_text(query)?;
        let batch = [query.to_string()];
        let mut embeddings = embed_batch(self.provider.as_ref(), &self.retry, &batch).await?;
        embeddings
            .pop()
            .ok_or_else(|| MemoryError::Embedding("No embedding returned".to_string()))
    }

    fn scores(&self, query: &[f32]) -> Result<Vec<f32>> {
        self.references
            .iter()
            .map(|r| cosine_similarity(query, &r.embedding))
            .collect()
    }

    fn best_for(&self, query: &str, embedding: &[f32]) -> Result<MatchResult> {
        let scores = self.scores(embedding)?;
        let (index, score) = best_index(&scores).ok_or(MemoryError::EmptyReferences)?;
        debug!(index, score, "Best reference selected");
        Ok(self.result(query, index, score))
    }

    fn result(&self, query: &str, index: usize, score: f32) -> MatchResult {
        MatchResult {
            query: query.to_string(),
            index,
            reference: self.references[index].text.clone(),
            score,
        }
    }
}

/// Index and value of the highest score. The first maximum wins.
pub fn best_index(scores: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((index, score)),
        }
    }
    best
}

async fn embed_batch(
    provider: &dyn EmbeddingProvider,
    retry: &RetryPolicy,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let embeddings = retry.run("embed", move || provider.embed(texts)).await?;

    if embeddings.len() != texts.len() {
        return Err(MemoryError::Embedding(format!(
            "expected {} embeddings, got {}",
            texts.len(),
            embeddings.len()
        )));
    }
    let dimension = provider.dimension();
    for embedding in &embeddings {
        validate_vector(embedding, dimension)?;
    }

    Ok(embeddings)
}
