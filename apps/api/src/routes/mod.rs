pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::competency::handlers as competency;
use crate::extraction::handlers as skj;
use crate::retrieval::handlers as retrieval;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/status", get(health::status_handler))
        // SKJ documents
        .route("/api/v1/skj", get(skj::handle_list_skj))
        .route("/api/v1/skj/upload", post(skj::handle_upload_skj))
        .route("/api/v1/skj/select", post(skj::handle_select_skj))
        .route(
            "/api/v1/skj/:filename/context",
            get(skj::handle_skj_context),
        )
        .route(
            "/api/v1/skj/:filename/questions",
            get(skj::handle_get_question_set).post(skj::handle_generate_question_set),
        )
        // Competency mapping
        .route("/api/v1/mapping", get(competency::handle_get_mapping))
        .route(
            "/api/v1/mapping/build",
            post(competency::handle_build_mapping),
        )
        .route("/api/v1/mapping/jobs/:job", get(competency::handle_get_job))
        .route(
            "/api/v1/mapping/jobs/:job/competencies",
            get(competency::handle_get_competencies),
        )
        // Vector index
        .route("/api/v1/index/build", post(retrieval::handle_build_index))
        // Assessment
        .route(
            "/api/v1/questions/generate",
            post(assessment::handle_generate_question),
        )
        .route(
            "/api/v1/assessments",
            post(assessment::handle_run_assessment),
        )
        .route(
            "/api/v1/assessments/score",
            post(assessment::handle_score_answer),
        )
        .route(
            "/api/v1/assessments/report",
            post(assessment::handle_build_report),
        )
        .with_state(state)
}
