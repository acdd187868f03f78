//! In-memory nearest-neighbour index over chunk embeddings, persisted as one
//! JSON file.

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::llm_client::embeddings::Embedder;
use crate::retrieval::chunker::Chunk;
use crate::retrieval::IndexError;
use crate::storage::{read_json, write_json, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorIndex {
    /// `Embedder::identity` of the embedder that produced the vectors.
    /// Empty for indexes written before the field existed.
    #[serde(default)]
    embedder: String,
    /// Fixed by the first batch added; 0 while empty.
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_embedder(identity: impl Into<String>) -> Self {
        Self {
            embedder: identity.into(),
            ..Self::default()
        }
    }

    pub fn embedder(&self) -> &str {
        &self.embedder
    }

    /// True when queries embedded by `embedder` land in this index's vector
    /// space. An unlabelled index is never compatible.
    pub fn compatible_with(&self, embedder: &dyn Embedder) -> bool {
        self.embedder == embedder.identity()
            && (self.is_empty() || self.dimension == embedder.dimension())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Adds `chunks` with their embeddings, pairwise. All vectors must share
    /// the index dimension.
    pub fn add_documents(
        &mut self,
        chunks: Vec<Chunk>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<(), IndexError> {
        if chunks.len() != embeddings.len() {
            return Err(IndexError::CountMismatch {
                chunks: chunks.len(),
                embeddings: embeddings.len(),
            });
        }

        let expected = match (self.dimension, embeddings.first()) {
            (0, Some(first)) => first.len(),
            (dim, _) => dim,
        };
        if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: bad.len(),
            });
        }

        self.dimension = expected;
        self.entries.extend(
            chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| IndexEntry { chunk, embedding }),
        );
        Ok(())
    }

    /// Top-`k` chunks by cosine similarity, nearest first. Ties keep
    /// insertion order.
    pub fn search_by_vector(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, IndexError> {
        if !self.is_empty() && query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    pub async fn similarity_search(
        &self,
        embedder: &dyn Embedder,
        query: &str,
        k: usize,
    ) -> Result<Vec<Chunk>, IndexError> {
        let vector = embedder.embed(query).await?;
        Ok(self
            .search_by_vector(&vector, k)?
            .into_iter()
            .map(|scored| scored.chunk)
            .collect())
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        write_json(path, self)?;
        info!("Vector index saved: {} chunks", self.len());
        Ok(())
    }

    /// `None` when no index has been persisted yet.
    pub fn load(path: &Path) -> Result<Option<Self>, IndexError> {
        Ok(read_json(path)?)
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut mag_a = 0.0f32;
    let mut mag_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
