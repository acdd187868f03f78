use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assessment::question_set::{
    load_question_set, save_question_set, QuestionItem, QuestionSetGenerator,
};
use crate::documents::loader::{is_supported, SUPPORTED_EXTENSIONS};
use crate::documents::DocumentError;
use crate::errors::AppError;
use crate::extraction::extractor::SkjExtractor;
use crate::extraction::library::{context_text, SkjLibrary};
use crate::extraction::skj::SkjRecord;
use crate::state::AppState;
use crate::storage::{run_blocking, StorageError};

/// Rejects anything that is not a bare filename.
fn validate_filename(filename: &str) -> Result<(), AppError> {
    let bare = !filename.is_empty()
        && !filename.starts_with('.')
        && !filename.contains(['/', '\\'])
        && filename != "..";
    if bare {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid filename '{filename}'")))
    }
}

fn library(state: &AppState) -> SkjLibrary<'_> {
    SkjLibrary::new(SkjExtractor::new(state.llm.clone()), &state.store)
}

/// Selects `filename`, mapping "nothing came back" onto 404 or 422.
async fn select_record(state: &AppState, filename: &str) -> Result<SkjRecord, AppError> {
    validate_filename(filename)?;
    if let Some(record) = library(state).select(filename).await? {
        return Ok(record);
    }
    if state.store.skj_source_dir().join(filename).is_file() {
        Err(AppError::UnprocessableEntity(format!(
            "SKJ extraction failed for '{filename}'"
        )))
    } else {
        Err(AppError::NotFound(format!("SKJ document '{filename}' not found")))
    }
}

#[derive(Serialize)]
pub struct SkjListResponse {
    pub files: Vec<String>,
}

/// GET /api/v1/skj
pub async fn handle_list_skj(
    State(state): State<AppState>,
) -> Result<Json<SkjListResponse>, AppError> {
    let files = match library(&state).available() {
        Ok(files) => files,
        Err(DocumentError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    Ok(Json(SkjListResponse { files }))
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub bytes: usize,
}

/// POST /api/v1/skj/upload
/// Multipart form with a single `file` field.
pub async fn handle_upload_skj(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Upload has no filename".to_string()))?;
        validate_filename(&filename)?;
        if !is_supported(&filename) {
            warn!("Rejected upload {filename}");
            return Err(AppError::UnsupportedFormat(format!(
                "{filename} (expected one of: {})",
                SUPPORTED_EXTENSIONS.join(", ")
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;

        let dir = state.store.skj_source_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::Io {
                path: dir.clone(),
                source,
            })?;
        let target = dir.join(&filename);
        tokio::fs::write(&target, &data)
            .await
            .map_err(|source| StorageError::Io {
                path: target.clone(),
                source,
            })?;

        info!("Uploaded SKJ document {filename} ({} bytes)", data.len());
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                filename,
                bytes: data.len(),
            }),
        ));
    }

    Err(AppError::Validation("No file provided".to_string()))
}

#[derive(Deserialize)]
pub struct SelectRequest {
    pub filename: String,
}

/// POST /api/v1/skj/select
pub async fn handle_select_skj(
    State(state): State<AppState>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SkjRecord>, AppError> {
    Ok(Json(select_record(&state, &req.filename).await?))
}

#[derive(Serialize)]
pub struct ContextResponse {
    pub filename: String,
    pub context: String,
}

/// GET /api/v1/skj/:filename/context
pub async fn handle_skj_context(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<ContextResponse>, AppError> {
    let record = select_record(&state, &filename).await?;
    Ok(Json(ContextResponse {
        context: context_text(&record),
        filename,
    }))
}

/// POST /api/v1/skj/:filename/questions
/// Generates and persists the question bank for a selected SKJ.
pub async fn handle_generate_question_set(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Vec<QuestionItem>>, AppError> {
    let record = select_record(&state, &filename).await?;
    let items = QuestionSetGenerator::new(state.llm.clone())
        .generate(&record)
        .await;
    let (path, to_save) = (state.store.question_set_path(&filename), items.clone());
    run_blocking(move || save_question_set(&to_save, &path)).await?;
    Ok(Json(items))
}

/// GET /api/v1/skj/:filename/questions
pub async fn handle_get_question_set(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<Vec<QuestionItem>>, AppError> {
    validate_filename(&filename)?;
    load_question_set(&state.store.question_set_path(&filename))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No question set for '{filename}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("skj_analis.pdf").is_ok());
        assert!(validate_filename("SKJ Analis Kepegawaian.docx").is_ok());
        assert!(validate_filename("").is_err());
        assert!(validate_filename("..").is_err());
        assert!(validate_filename(".env").is_err());
        assert!(validate_filename("../models/x.json").is_err());
        assert!(validate_filename("a\\b.txt").is_err());
    }
}
