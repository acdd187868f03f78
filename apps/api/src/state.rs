use std::sync::Arc;

use tokio::sync::RwLock;

use crate::competency::mapping::CompetencyMapping;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::embeddings::Embedder;
use crate::llm_client::CompletionModel;
use crate::retrieval::VectorIndex;
use crate::storage::ArtifactStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The mapping and index are replaced wholesale on rebuild; readers take a
/// cheap `Arc` snapshot and never hold the lock across an LLM call.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionModel>,
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<ArtifactStore>,
    pub config: Config,
    /// Default dataset the mapper falls back to.
    pub seed: Arc<CompetencyMapping>,
    pub mapping: Arc<RwLock<Arc<CompetencyMapping>>>,
    pub index: Arc<RwLock<Option<Arc<VectorIndex>>>>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn CompletionModel>,
        embedder: Arc<dyn Embedder>,
        config: Config,
        seed: CompetencyMapping,
    ) -> Self {
        Self {
            llm,
            embedder,
            store: Arc::new(ArtifactStore::new(config.data_root.clone())),
            config,
            seed: Arc::new(seed),
            mapping: Arc::new(RwLock::new(Arc::new(CompetencyMapping::new()))),
            index: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn current_mapping(&self) -> Arc<CompetencyMapping> {
        self.mapping.read().await.clone()
    }

    pub async fn replace_mapping(&self, mapping: CompetencyMapping) {
        *self.mapping.write().await = Arc::new(mapping);
    }

    pub async fn current_index(&self) -> Option<Arc<VectorIndex>> {
        self.index.read().await.clone()
    }

    /// The built index, or 422 when none has been built or restored yet.
    pub async fn require_index(&self) -> Result<Arc<VectorIndex>, AppError> {
        self.current_index().await.ok_or_else(|| {
            AppError::UnprocessableEntity(
                "Vector index has not been built; POST /api/v1/index/build first".to_string(),
            )
        })
    }

    pub async fn replace_index(&self, index: Arc<VectorIndex>) {
        *self.index.write().await = Some(index);
    }
}
