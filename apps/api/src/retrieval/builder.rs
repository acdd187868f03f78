//! Vector Index Builder: documents → normalised text → overlapping chunks →
//! embeddings → index. Backend failures abort the build.

use std::sync::Arc;

use tracing::info;

use crate::documents::preprocess::normalize_for_embedding;
use crate::documents::Document;
use crate::llm_client::embeddings::Embedder;
use crate::retrieval::chunker::{Chunk, TextSplitter};
use crate::retrieval::index::VectorIndex;
use crate::retrieval::IndexError;

pub struct IndexBuilder {
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
}

impl IndexBuilder {
    pub fn new(embedder: Arc<dyn Embedder>, splitter: TextSplitter) -> Self {
        Self { embedder, splitter }
    }

    pub async fn build(&self, documents: &[Document]) -> Result<VectorIndex, IndexError> {
        info!("Creating vector index from {} documents", documents.len());

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|doc| {
                let normalized = Document {
                    content: normalize_for_embedding(&doc.content),
                    ..doc.clone()
                };
                self.splitter.split_document(&normalized)
            })
            .collect();
        info!("Created {} document chunks", chunks.len());

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut index = VectorIndex::for_embedder(self.embedder.identity());
        index.add_documents(chunks, embeddings)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::embeddings::HashingEmbedder;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            Err(LlmError::EmptyContent)
        }

        fn dimension(&self) -> usize {
            8
        }

        fn identity(&self) -> String {
            "failing/8".to_string()
        }
    }

    #[tokio::test]
    async fn test_build_indexes_normalized_chunks() {
        let builder = IndexBuilder::new(Arc::new(HashingEmbedder::new(32)), TextSplitter::new(40, 10));
        let docs = vec![
            Document::new("analis.txt", "KOMPETENSI   Integritas\n- 1 -\nJujur dalam bekerja dan konsisten"),
            Document::new("pranata.txt", "Keamanan Informasi"),
        ];
        let index = builder.build(&docs).await.unwrap();

        assert!(index.len() >= 3);
        assert_eq!(index.dimension(), 32);

        let hits = index
            .similarity_search(&HashingEmbedder::new(32), "keamanan informasi", 1)
            .await
            .unwrap();
        assert_eq!(hits[0].source, "pranata.txt");
        assert_eq!(hits[0].content, "keamanan informasi");
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_build() {
        let builder = IndexBuilder::new(Arc::new(FailingEmbedder), TextSplitter::new(100, 10));
        let result = builder.build(&[Document::new("a.txt", "teks")]).await;
        assert!(matches!(result, Err(IndexError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_empty_corpus_builds_empty_index() {
        let builder = IndexBuilder::new(Arc::new(HashingEmbedder::new(8)), TextSplitter::new(100, 10));
        let index = builder.build(&[]).await.unwrap();
        assert!(index.is_empty());
        assert_eq!(index.embedder(), "hashing/sha256/8");
    }
}
