use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::competency::mapper::{save_mapping, CompetencyMapper};
use crate::competency::mapping::{CompetencyKind, CompetencyMapping, JobProfile};
use crate::documents::load_folder;
use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::run_blocking;

#[derive(Serialize)]
pub struct BuildMappingResponse {
    pub documents: usize,
    pub total_jobs: usize,
    pub jobs: Vec<String>,
}

/// POST /api/v1/mapping/build
/// Rebuilds the mapping from the source folder, persists it and swaps it in.
pub async fn handle_build_mapping(
    State(state): State<AppState>,
) -> Result<Json<BuildMappingResponse>, AppError> {
    let dir = state.store.skj_source_dir();
    let documents = tokio::task::spawn_blocking(move || load_folder(&dir)).await??;

    let mapper = CompetencyMapper::new(state.llm.clone(), state.seed.as_ref().clone());
    let mapping = mapper.build_mapping(&documents).await;
    let (path, to_save) = (state.store.mapping_path(), mapping.clone());
    run_blocking(move || save_mapping(&to_save, &path)).await?;

    let response = BuildMappingResponse {
        documents: documents.len(),
        total_jobs: mapping.len(),
        jobs: mapping.job_list(),
    };
    state.replace_mapping(mapping).await;
    info!("Mapping rebuilt: {} jobs", response.total_jobs);
    Ok(Json(response))
}

/// GET /api/v1/mapping
pub async fn handle_get_mapping(State(state): State<AppState>) -> Json<CompetencyMapping> {
    Json(state.current_mapping().await.as_ref().clone())
}

/// GET /api/v1/mapping/jobs/:job
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job): Path<String>,
) -> Result<Json<JobProfile>, AppError> {
    let mapping = state.current_mapping().await;
    if mapping.get(&job).is_none() {
        return Err(AppError::NotFound(format!("Job '{job}' is not in the mapping")));
    }
    Ok(Json(mapping.job_info(&job)))
}

#[derive(Deserialize)]
pub struct KindQuery {
    pub kind: CompetencyKind,
}

/// GET /api/v1/mapping/jobs/:job/competencies?kind=technical|managerial|socio_cultural
pub async fn handle_get_competencies(
    State(state): State<AppState>,
    Path(job): Path<String>,
    Query(params): Query<KindQuery>,
) -> Json<Vec<String>> {
    let mapping = state.current_mapping().await;
    Json(mapping.competencies_by_type(&job, params.kind))
}
