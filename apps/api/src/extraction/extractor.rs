//! Structured Extractor: document text in, `SkjRecord` out.
//!
//! Parsing is total. A reply without a decodable JSON object yields the
//! canonical empty record; only load and upstream failures surface as errors,
//! and `extract_file` turns those into `None` at the call boundary.

use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::documents::preprocess::{clean_text, truncate_chars};
use crate::documents::{load_document, DocumentError};
use crate::extraction::prompts::EXTRACT_SKJ_PROMPT;
use crate::extraction::skj::{SkjRecord, EXTRACTOR_VERSION};
use crate::llm_client::json_scan::parse_object;
use crate::llm_client::prompts::{PromptError, JSON_ONLY_SYSTEM};
use crate::llm_client::{CompletionModel, LlmError};

/// Prefix of the preprocessed text sent to the model.
pub const MAX_INPUT_CHARS: usize = 8000;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("document loader task failed: {0}")]
    Task(#[from] JoinError),
}

pub struct SkjExtractor {
    llm: Arc<dyn CompletionModel>,
    max_input_chars: usize,
}

impl SkjExtractor {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self {
            llm,
            max_input_chars: MAX_INPUT_CHARS,
        }
    }

    /// Extracts a record from already-preprocessed text. Provenance metadata
    /// is always overwritten, whatever the model returned.
    pub async fn extract_text(
        &self,
        text: &str,
        source_file: &str,
    ) -> Result<SkjRecord, ExtractionError> {
        let prompt = EXTRACT_SKJ_PROMPT
            .render(&[("skj_text", truncate_chars(text, self.max_input_chars))])?;
        let reply = self.llm.complete(JSON_ONLY_SYSTEM, &prompt).await?;

        let mut record = parse_object::<SkjRecord>(&reply).unwrap_or_else(|| {
            warn!("No usable SKJ JSON for {source_file}, returning empty record");
            SkjRecord::empty()
        });

        record.metadata.source_file = source_file.to_string();
        record.metadata.extracted_at = Local::now().to_rfc3339();
        record.metadata.extractor_version = EXTRACTOR_VERSION.to_string();
        Ok(record)
    }

    /// Loads, cleans and extracts one file. Any failure is logged and
    /// reported as `None`, which is distinct from an empty record.
    pub async fn extract_file(&self, path: &Path) -> Option<SkjRecord> {
        info!("Processing file: {}", path.display());
        match self.try_extract_file(path).await {
            Ok(record) => Some(record),
            Err(e) => {
                error!("Error extracting SKJ from {}: {e}", path.display());
                None
            }
        }
    }

    async fn try_extract_file(&self, path: &Path) -> Result<SkjRecord, ExtractionError> {
        // PDF parsing is CPU-bound; keep it off the async workers.
        let owned = path.to_path_buf();
        let document = tokio::task::spawn_blocking(move || load_document(&owned)).await??;
        let text = clean_text(&document.content);
        self.extract_text(&text, &document.source).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::skj::ExtractionMetadata;
    use crate::llm_client::mock::ScriptedModel;
    use std::fs;

    fn extractor(model: ScriptedModel) -> (Arc<ScriptedModel>, SkjExtractor) {
        let model = Arc::new(model);
        (model.clone(), SkjExtractor::new(model))
    }

    fn without_metadata(record: &SkjRecord) -> SkjRecord {
        SkjRecord {
            metadata: ExtractionMetadata::default(),
            ..record.clone()
        }
    }

    #[tokio::test]
    async fn test_extracts_record_and_overwrites_provenance() {
        let reply = r#"```json
        {"jabatan": "Analis Kepegawaian", "kode_jabatan": "AK-01",
         "kompetensi_teknis": [{"nama_kompetensi": "Analisis Jabatan",
            "level_3": {"deskripsi": "Mandiri", "indikator_perilaku": ["Menyusun peta jabatan"]}}],
         "metadata": {"sumber_file": "karangan.pdf", "extracted_at": "1999", "extractor_version": "v9"}}
        ```"#;
        let (_, extractor) = extractor(ScriptedModel::replying(reply));
        let record = extractor
            .extract_text("teks skj", "analis.txt")
            .await
            .unwrap();

        assert_eq!(record.job_title, "Analis Kepegawaian");
        assert_eq!(record.job_code, "AK-01");
        assert_eq!(record.technical[0].level_3.indicators, ["Menyusun peta jabatan"]);
        assert_eq!(record.metadata.source_file, "analis.txt");
        assert_eq!(record.metadata.extractor_version, "v1");
        assert_ne!(record.metadata.extracted_at, "1999");
    }

    #[tokio::test]
    async fn test_malformed_replies_yield_empty_record() {
        for reply in [
            "Maaf, saya tidak dapat memproses dokumen ini.",
            "{ jabatan: Analis }",
            r#"{"jabatan": ["bukan", "string"]}"#,
            "}{",
        ] {
            let (_, extractor) = extractor(ScriptedModel::replying(reply));
            let record = extractor.extract_text("teks", "a.txt").await.unwrap();
            assert_eq!(without_metadata(&record), SkjRecord::empty(), "{reply}");
            assert_eq!(record.metadata.source_file, "a.txt");
        }
    }

    #[tokio::test]
    async fn test_input_is_truncated_before_prompting() {
        let (model, extractor) = extractor(ScriptedModel::replying("{}"));
        let text = "x".repeat(MAX_INPUT_CHARS) + "SENTINEL";
        extractor.extract_text(&text, "a.txt").await.unwrap();
        assert!(!model.prompts()[0].contains("SENTINEL"));
    }

    #[tokio::test]
    async fn test_llm_failure_is_an_error_for_text_and_none_for_file() {
        let (_, extractor) = extractor(ScriptedModel::failing());
        assert!(matches!(
            extractor.extract_text("teks", "a.txt").await,
            Err(ExtractionError::Llm(LlmError::Timeout(_)))
        ));

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "teks").unwrap();
        assert!(extractor.extract_file(&path).await.is_none());
    }

    #[tokio::test]
    async fn test_unsupported_or_missing_file_is_none() {
        let (model, extractor) = extractor(ScriptedModel::replying("{}"));
        let dir = tempfile::TempDir::new().unwrap();
        let xlsx = dir.path().join("skj.xlsx");
        fs::write(&xlsx, "data").unwrap();
        assert!(extractor.extract_file(&xlsx).await.is_none());
        assert!(extractor
            .extract_file(&dir.path().join("absent.txt"))
            .await
            .is_none());
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_three_document_corpus_with_non_json_replies() {
        let dir = tempfile::TempDir::new().unwrap();
        let names = ["analis.txt", "pengawas.txt", "pranata.txt"];
        for name in names {
            fs::write(
                dir.path().join(name),
                format!("STANDAR KOMPETENSI JABATAN\n\n- 1 -\n{name}   isi dokumen"),
            )
            .unwrap();
        }

        let (model, extractor) = extractor(ScriptedModel::replying("Dokumen tidak dapat dibaca."));
        for name in names {
            let record = extractor
                .extract_file(&dir.path().join(name))
                .await
                .expect("load and LLM call succeed, so a record is returned");
            assert_eq!(without_metadata(&record), SkjRecord::empty());
            assert_eq!(record.metadata.source_file, name);
            assert!(!record.metadata.extracted_at.is_empty());
        }

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 3);
        // text is cleaned before prompting
        assert!(prompts[0].contains("STANDAR KOMPETENSI JABATAN analis.txt isi dokumen"));
    }
}
