use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::documents::load_folder;
use crate::errors::AppError;
use crate::retrieval::{IndexBuilder, TextSplitter};
use crate::state::AppState;
use crate::storage::run_blocking;

#[derive(Serialize)]
pub struct BuildIndexResponse {
    pub documents: usize,
    pub chunks: usize,
    pub dimension: usize,
}

/// POST /api/v1/index/build
/// Indexes every source document, persists the index and swaps it in.
pub async fn handle_build_index(
    State(state): State<AppState>,
) -> Result<Json<BuildIndexResponse>, AppError> {
    let dir = state.store.skj_source_dir();
    let documents = tokio::task::spawn_blocking(move || load_folder(&dir)).await??;

    let splitter = TextSplitter::new(state.config.chunk_size, state.config.chunk_overlap);
    let index = Arc::new(
        IndexBuilder::new(state.embedder.clone(), splitter)
            .build(&documents)
            .await?,
    );
    let (path, to_save) = (state.store.index_path(), index.clone());
    run_blocking(move || to_save.save(&path)).await?;

    let response = BuildIndexResponse {
        documents: documents.len(),
        chunks: index.len(),
        dimension: index.dimension(),
    };
    state.replace_index(index).await;
    info!("Vector index rebuilt: {} chunks", response.chunks);
    Ok(Json(response))
}
