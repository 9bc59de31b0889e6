//! Embedding generation providers.

use crate::error::MemoryError;
use crate::Result;
use async_trait::async_trait;
use careline_core::SecretString;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Hugging Face inference router base URL.
pub const HF_INFERENCE_BASE: &str = "https://router.huggingface.co/hf-inference";

/// Default sentence-embedding model.
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Embedding dimension for the default model.
pub const DEFAULT_DIMENSION: usize = 384;

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Generate embeddings for texts, one vector per text in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate embedding for a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::Embedding("No embedding returned".to_string()))
    }
}

/// Reject text that cannot be meaningfully embedded.
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(MemoryError::invalid_input(
            "text to embed must not be empty or whitespace",
        ));
    }
    Ok(())
}

/// Check one vector returned by a provider.
pub fn validate_vector(vector: &[f32], dimension: usize) -> Result<()> {
    if vector.len() != dimension {
        return Err(MemoryError::DimensionMismatch {
            expected: dimension,
            actual: vector.len(),
        });
    }
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(MemoryError::Embedding(
            "embedding contains non-finite values".to_string(),
        ));
    }
    Ok(())
}

/// Hugging Face inference API feature-extraction provider.
pub struct HuggingFaceEmbeddings {
    client: Client,
    token: SecretString,
    model: String,
    base_url: String,
    dimension: usize,
}

impl HuggingFaceEmbeddings {
    /// Create a provider for the default MiniLM model.
    pub fn new(token: impl Into<SecretString>) -> Result<Self> {
        let token = token.into();
        if token.is_blank() {
            return Err(MemoryError::Config("Hugging Face token is required".to_string()));
        }

        Ok(Self {
            client: build_client(60)?,
            token,
            model: DEFAULT_MODEL.to_string(),
            base_url: HF_INFERENCE_BASE.to_string(),
            dimension: DEFAULT_DIMENSION,
        })
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the expected embedding dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Result<Self> {
        self.client = build_client(secs)?;
        Ok(self)
    }

    /// Model identifier in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}/pipeline/feature-extraction",
            self.base_url, self.model
        )
    }
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| MemoryError::Config(format!("Failed to create HTTP client: {}", e)))
}

#[async_trait]
impl EmbeddingProvider for HuggingFaceEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        for text in texts {
            validate_text(text)?;
        }

        #[derive(Serialize)]
        struct Request<'a> {
            inputs: &'a [String],
        }

        debug!(model = %self.model, batch = texts.len(), "Requesting embeddings");

        let response = self
            .client
            .post(self.endpoint())
            .header(reqwest::header::AUTHORIZATION, self.token.bearer())
            .json(&Request { inputs: texts })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.text().await?;
        let vectors = serde_json::from_str::<FeatureExtraction>(&body)?.into_sentence_vectors();

        if vectors.len() != texts.len() {
            return Err(MemoryError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        for vector in &vectors {
            validate_vector(vector, self.dimension)?;
        }

        Ok(vectors)
    }
}

/// Feature-extraction output: pooled sentence vectors, or per-token
/// vectors for models without a pooling head.
#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureExtraction {
    Pooled(Vec<Vec<f32>>),
    Tokens(Vec<Vec<Vec<f32>>>),
}

impl FeatureExtraction {
    fn into_sentence_vectors(self) -> Vec<Vec<f32>> {
        match self {
            Self::Pooled(vectors) => vectors,
            Self::Tokens(batches) => batches.into_iter().map(mean_pool).collect(),
        }
    }
}

/// Average token vectors into one sentence vector.
fn mean_pool(tokens: Vec<Vec<f32>>) -> Vec<f32> {
    let Some(width) = tokens.first().map(Vec::len) else {
        return Vec::new();
    };
    let mut pooled = vec![0.0f32; width];
    for token in &tokens {
        for (acc, x) in pooled.iter_mut().zip(token) {
            *acc += x;
        }
    }
    let n = tokens.len() as f32;
    pooled.iter_mut().for_each(|x| *x /= n);
    pooled
}

async fn error_from_response(response: Response) -> MemoryError {
    #[derive(Deserialize)]
    struct HfError {
        error: serde_json::Value,
    }

    let status = response.status();
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<HfError>(&body) {
        Ok(HfError {
            error: serde_json::Value::String(s),
        }) => s,
        Ok(HfError { error }) => error.to_string(),
        Err(_) => body,
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MemoryError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => MemoryError::RateLimit {
            message,
            retry_after,
        },
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNPROCESSABLE_ENTITY => {
            MemoryError::InvalidInput(message)
        }
        StatusCode::NOT_FOUND => MemoryError::Config(format!("model not found: {}", message)),
        s if s.is_server_error() => MemoryError::Unavailable {
            status: s.as_u16(),
            message,
        },
        s => MemoryError::Embedding(format!("unexpected status {}: {}", s.as_u16(), message)),
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]. Fails for vectors of different length or
/// with zero magnitude, where the similarity is undefined.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MemoryError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(MemoryError::ZeroMagnitude);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str =
        "/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction";

    fn provider(server: &MockServer, dimension: usize) -> HuggingFaceEmbeddings {
        HuggingFaceEmbeddings::new("hf_test")
            .unwrap()
            .with_base_url(server.uri())
            .with_dimension(dimension)
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).unwrap().abs() < 1e-6);

        let d = vec![-2.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_self_similarity_and_symmetry() {
        let a = vec![0.3, -1.2, 4.5, 0.01];
        let b = vec![-0.7, 2.2, 0.5, 3.0];

        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_cosine_magnitude_independent() {
        let a = vec![1.0, 2.0, 3.0];
        let scaled = vec![10.0, 20.0, 30.0];
        assert!((cosine_similarity(&a, &scaled).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert!(matches!(
            cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]),
            Err(MemoryError::ZeroMagnitude)
        ));
        assert!(matches!(
            cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]),
            Err(MemoryError::ZeroMagnitude)
        ));
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert!(matches!(
            cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]),
            Err(MemoryError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("deductible").is_ok());
        assert!(matches!(validate_text(""), Err(MemoryError::InvalidInput(_))));
        assert!(matches!(validate_text(" \n\t"), Err(MemoryError::InvalidInput(_))));
    }

    #[test]
    fn test_mean_pool() {
        let pooled = mean_pool(vec![vec![1.0, 2.0], vec![3.0, 6.0]]);
        assert_eq!(pooled, vec![2.0, 4.0]);
        assert!(mean_pool(Vec::new()).is_empty());
    }

    #[test]
    fn test_new_requires_token() {
        assert!(matches!(
            HuggingFaceEmbeddings::new(" "),
            Err(MemoryError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_embed_returns_service_vectors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("authorization", "Bearer hf_test"))
            .and(body_json(json!({ "inputs": ["copay", "deductible"] })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([[0.5, 0.25, 1.0], [1.0, 0.0, 0.0]])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let vectors = provider(&server, 3)
            .embed(&["copay".to_string(), "deductible".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![0.5, 0.25, 1.0], vec![1.0, 0.0, 0.0]]);
    }

    #[tokio::test]
    async fn test_embed_one_is_deterministic_for_stable_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2, 0.3]])))
            .expect(2)
            .mount(&server)
            .await;

        let provider = provider(&server, 3);
        let first = provider.embed_one("open enrollment").await.unwrap();
        let second = provider.embed_one("open enrollment").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_embed_mean_pools_token_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([[[1.0, 0.0], [0.0, 1.0]]])),
            )
            .mount(&server)
            .await;

        let vector = provider(&server, 2).embed_one("hmo").await.unwrap();
        assert_eq!(vector, vec![0.5, 0.5]);
    }

    #[tokio::test]
    async fn test_embed_rejects_blank_text_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[1.0]])))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider(&server, 1)
            .embed(&["ok".to_string(), "   ".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_embed_dimension_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[1.0, 0.0]])))
            .mount(&server)
            .await;

        let err = provider(&server, 384).embed_one("ppo").await.unwrap_err();
        assert!(matches!(
            err,
            MemoryError::DimensionMismatch {
                expected: 384,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_embed_count_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[1.0]])))
            .mount(&server)
            .await;

        let err = provider(&server, 1)
            .embed(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, MemoryError::Embedding(_)));
    }

    #[tokio::test]
    async fn test_embed_error_statuses() {
        let cases = [
            (401, "Invalid credentials in Authorization header"),
            (429, "Rate limit reached"),
            (503, "Model is currently loading"),
            (400, "Input is malformed"),
        ];

        for (status, message) in cases {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(
                    ResponseTemplate::new(status).set_body_json(json!({ "error": message })),
                )
                .mount(&server)
                .await;

            let err = provider(&server, 1).embed_one("text").await.unwrap_err();
            let matched = match (status, &err) {
                (401, MemoryError::Authentication(m)) => m == message,
                (429, MemoryError::RateLimit { message: m, .. }) => m == message,
                (503, MemoryError::Unavailable { status: 503, message: m }) => m == message,
                (400, MemoryError::InvalidInput(m)) => m == message,
                _ => false,
            };
            assert!(matched, "status {} mapped to {:?}", status, err);
        }
    }
}
