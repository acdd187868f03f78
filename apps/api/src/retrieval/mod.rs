pub mod builder;
pub mod chunker;
pub mod handlers;
pub mod index;

use thiserror::Error;

use crate::llm_client::LlmError;
use crate::storage::StorageError;

pub use builder::IndexBuilder;
pub use chunker::{Chunk, TextSplitter};
pub use index::VectorIndex;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] LlmError),

    #[error("{chunks} chunks but {embeddings} embeddings")]
    CountMismatch { chunks: usize, embeddings: usize },

    #[error("embedding dimension {actual} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
