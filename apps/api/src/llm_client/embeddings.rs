//! Embedding boundary: turns text into fixed-dimension vectors.
//!
//! `EmbeddingClient` talks to any OpenAI-compatible `/embeddings` endpoint.
//! `HashingEmbedder` is the local fallback used when no endpoint is
//! configured: feature-hashed lowercase tokens, L2-normalised.
//!
//! Vectors are persisted in the index, so every embedder reports an
//! `identity`; an index is only usable with the embedder that built it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::llm_client::LlmError;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;

    fn dimension(&self) -> usize;

    /// Provider, model and dimension, e.g. `openai/text-embedding-3-small/384`.
    fn identity(&self) -> String;
}

// ────────────────────────────────────────────────────────────────────────────
// Remote embeddings
// ────────────────────────────────────────────────────────────────────────────

/// Inputs per request; larger corpora are sent in several batches.
const MAX_BATCH_SIZE: usize = 256;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

pub struct EmbeddingClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    dimension: usize,
}

impl EmbeddingClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        model: String,
        dimension: usize,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            dimension,
        })
    }

    async fn post(&self, input: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.model,
                input,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await?;
        order_by_index(body.data, input.len())
    }
}

/// Reorders returned vectors by their `index` field and checks that every
/// input received exactly one vector.
fn order_by_index(mut data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>, LlmError> {
    if data.len() != expected {
        return Err(LlmError::MalformedEmbedding(format!(
            "expected {expected} vectors, got {}",
            data.len()
        )));
    }
    data.sort_by_key(|d| d.index);
    if data.iter().enumerate().any(|(i, d)| d.index != i) {
        return Err(LlmError::MalformedEmbedding(
            "vector indices are not contiguous".to_string(),
        ));
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let mut vectors = self.post(&[text.to_string()]).await?;
        vectors.pop().ok_or(LlmError::EmptyContent)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let mut out = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            out.extend(self.post(batch).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn identity(&self) -> String {
        format!("openai/{}/{}", self.model, self.dimension)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Local hashing embedder
// ────────────────────────────────────────────────────────────────────────────

pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = stable_hash(&token.to_lowercase());
            let slot = (hash % self.dimension as u64) as usize;
            // High bit picks the sign so collisions partially cancel.
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[slot] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn identity(&self) -> String {
        format!("{HASHING_EMBEDDER_NAME}/{}", self.dimension)
    }
}

const HASHING_EMBEDDER_NAME: &str = "hashing/sha256";

/// First 8 bytes of the SHA-256 digest, little-endian. Fixed across builds,
/// unlike `DefaultHasher`.
fn stable_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hashing_embedder_is_deterministic_and_normalized() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.embed("Analis Kepegawaian level madya").await.unwrap();
        let b = embedder.embed("analis kepegawaian LEVEL madya").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_hashing_embedder_slots_are_pinned() {
        let embedder = HashingEmbedder::new(64);
        let v = embedder.embed("Analis").await.unwrap();
        assert_eq!(v[29], 1.0);
        assert_eq!(v.iter().filter(|x| **x != 0.0).count(), 1);

        let v = embedder.embed("analis kepegawaian").await.unwrap();
        let half = 1.0 / 2f32.sqrt();
        assert!((v[29] - half).abs() < 1e-6);
        assert!((v[61] - half).abs() < 1e-6);
    }

    #[test]
    fn test_identity_names_provider_and_dimension() {
        assert_eq!(HashingEmbedder::new(64).identity(), "hashing/sha256/64");
        let client = EmbeddingClient::new(
            "http://localhost:0/v1/",
            "k".to_string(),
            "text-embedding-3-small".to_string(),
            384,
            5,
        )
        .unwrap();
        assert_eq!(client.identity(), "openai/text-embedding-3-small/384");
    }

    #[tokio::test]
    async fn test_hashing_embedder_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(16);
        let v = embedder.embed("   ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_order_by_index_reorders() {
        let data = vec![
            EmbeddingData {
                embedding: vec![2.0],
                index: 1,
            },
            EmbeddingData {
                embedding: vec![1.0],
                index: 0,
            },
        ];
        let ordered = order_by_index(data, 2).unwrap();
        assert_eq!(ordered, vec![vec![1.0], vec![2.0]]);
    }

    #[test]
    fn test_order_by_index_rejects_count_mismatch() {
        let data = vec![EmbeddingData {
            embedding: vec![1.0],
            index: 0,
        }];
        assert!(matches!(
            order_by_index(data, 2),
            Err(LlmError::MalformedEmbedding(_))
        ));
    }
}
