use axum::{extract::State, Json};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::assessment::question::QuestionGenerator;
use crate::assessment::report::{build_report, save_report, Report, SessionMeta};
use crate::assessment::scorer::{AssessmentResult, AssessmentScorer, ScoreRequest};
use crate::assessment::session::{run_session, SessionRequest};
use crate::errors::AppError;
use crate::state::AppState;

fn require_field(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::Validation(format!("'{name}' must not be empty")))
    } else {
        Ok(())
    }
}

fn scorer(state: &AppState) -> AssessmentScorer {
    AssessmentScorer::new(state.llm.clone(), state.embedder.clone())
}

#[derive(Deserialize)]
pub struct GenerateQuestionRequest {
    #[serde(alias = "jabatan")]
    pub job: String,
    #[serde(alias = "level_target")]
    pub level: String,
    #[serde(alias = "kompetensi")]
    pub competency: String,
}

#[derive(Serialize)]
pub struct GenerateQuestionResponse {
    pub question: String,
}

/// POST /api/v1/questions/generate
/// Always answers with a question; falls back to the fixed template on LLM failure.
pub async fn handle_generate_question(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuestionRequest>,
) -> Result<Json<GenerateQuestionResponse>, AppError> {
    require_field("competency", &req.competency)?;
    require_field("level", &req.level)?;

    let mapping = state.current_mapping().await;
    let question = QuestionGenerator::new(state.llm.clone())
        .generate(&mapping, &req.job, &req.level, &req.competency)
        .await;
    Ok(Json(GenerateQuestionResponse { question }))
}

/// POST /api/v1/assessments/score
pub async fn handle_score_answer(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<AssessmentResult>, AppError> {
    require_field("competency", &req.competency)?;
    require_field("answer", &req.answer)?;

    let index = state.require_index().await?;
    let mapping = state.current_mapping().await;
    let result = scorer(&state).score(&index, &mapping, &req).await;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct ReportRequest {
    #[serde(flatten)]
    pub session: SessionMeta,
    pub results: Vec<AssessmentResult>,
}

/// POST /api/v1/assessments/report
/// Aggregates results scored earlier into a persisted report.
pub async fn handle_build_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<Report>, AppError> {
    require_field("nama_pegawai", &req.session.participant)?;

    let report = build_report(req.session, req.results, Local::now());
    save_report(&state.store, &report).await?;
    Ok(Json(report))
}

/// POST /api/v1/assessments
/// Runs a whole session: one scoring call per answer, then the report.
pub async fn handle_run_assessment(
    State(state): State<AppState>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<Report>, AppError> {
    require_field("nama_pegawai", &req.meta.participant)?;
    if req.answers.is_empty() {
        return Err(AppError::Validation("'jawaban' must not be empty".to_string()));
    }
    for answer in &req.answers {
        require_field("kompetensi", &answer.competency)?;
    }

    let index = state.require_index().await?;
    let mapping = state.current_mapping().await;
    let report = run_session(&scorer(&state), &index, &mapping, &state.store, req).await?;
    Ok(Json(report))
}
