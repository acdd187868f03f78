use axum::{extract::State, Json};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME")
    }))
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub vector_db_ready: bool,
    pub indexed_chunks: usize,
    pub llm_model: String,
    pub job_mapping_loaded: bool,
    pub total_jobs: usize,
    pub available_jobs: Vec<String>,
    pub timestamp: DateTime<Local>,
}

/// GET /api/v1/status
pub async fn status_handler(State(state): State<AppState>) -> Json<SystemStatus> {
    let index = state.current_index().await;
    let mapping = state.current_mapping().await;
    Json(SystemStatus {
        vector_db_ready: index.is_some(),
        indexed_chunks: index.map_or(0, |i| i.len()),
        llm_model: state.llm.model_name().to_string(),
        job_mapping_loaded: !mapping.is_empty(),
        total_jobs: mapping.len(),
        available_jobs: mapping.job_list(),
        timestamp: Local::now(),
    })
}
