//! SKJ library: the source-document folder plus its extracted-record cache.

use tracing::info;

use crate::competency::mapping::LevelKey;
use crate::documents::{list_documents, DocumentError};
use crate::extraction::extractor::SkjExtractor;
use crate::extraction::skj::{Competency, SkjRecord};
use crate::storage::{read_json, run_blocking, write_json, ArtifactStore, StorageError};

pub struct SkjLibrary<'a> {
    extractor: SkjExtractor,
    store: &'a ArtifactStore,
}

impl<'a> SkjLibrary<'a> {
    pub fn new(extractor: SkjExtractor, store: &'a ArtifactStore) -> Self {
        Self { extractor, store }
    }

    pub fn available(&self) -> Result<Vec<String>, DocumentError> {
        list_documents(&self.store.skj_source_dir())
    }

    pub fn cached(&self, filename: &str) -> Result<Option<SkjRecord>, StorageError> {
        read_json(&self.store.extracted_skj_path(filename))
    }

    /// Returns the cached record for `filename`, extracting and caching it on
    /// first use. `None` when the source file is absent or extraction failed.
    pub async fn select(&self, filename: &str) -> Result<Option<SkjRecord>, StorageError> {
        if let Some(record) = self.cached(filename)? {
            info!("Using cached SKJ record for {filename}");
            return Ok(Some(record));
        }

        let source = self.store.skj_source_dir().join(filename);
        if !source.is_file() {
            return Ok(None);
        }

        let Some(record) = self.extractor.extract_file(&source).await else {
            return Ok(None);
        };
        let path = self.store.extracted_skj_path(filename);
        let cached = record.clone();
        run_blocking(move || write_json(&path, &cached)).await?;
        Ok(Some(record))
    }
}

/// Plain-text RAG context block for a selected record.
pub fn context_text(record: &SkjRecord) -> String {
    let mut lines = vec![
        format!("JABATAN: {}", record.job_title),
        format!("KODE: {}", record.job_code),
        format!("UNIT: {}", record.organization_unit),
        format!("RINGKASAN TUGAS: {}", record.task_summary),
    ];

    if !record.managerial.is_empty() {
        lines.push("\nKOMPETENSI MANAJERIAL:".to_string());
        for comp in &record.managerial {
            lines.push(headline(comp));
            for key in LevelKey::ALL {
                let detail = comp.level(key);
                if detail.is_empty() {
                    continue;
                }
                lines.push(format!(
                    "  {}: {}",
                    key.as_str().to_uppercase(),
                    detail.description
                ));
                for indicator in &detail.indicators {
                    lines.push(format!("    • {indicator}"));
                }
            }
        }
    }

    if !record.technical.is_empty() {
        lines.push("\nKOMPETENSI TEKNIS:".to_string());
        lines.extend(record.technical.iter().map(headline));
    }

    lines.join("\n")
}

fn headline(comp: &Competency) -> String {
    format!("- {}: {}", comp.name, comp.definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::skj::LevelDetail;
    use crate::llm_client::mock::ScriptedModel;
    use std::fs;
    use std::sync::Arc;

    fn record() -> SkjRecord {
        SkjRecord {
            job_title: "Analis Kepegawaian".to_string(),
            job_code: "AK-01".to_string(),
            managerial: vec![Competency {
                name: "Integritas".to_string(),
                definition: "Konsisten".to_string(),
                level_2: LevelDetail {
                    description: "Mampu mengingatkan".to_string(),
                    indicators: vec!["Mengingatkan rekan".to_string()],
                },
                ..Competency::default()
            }],
            technical: vec![Competency {
                name: "Analisis Jabatan".to_string(),
                definition: "Menyusun uraian".to_string(),
                ..Competency::default()
            }],
            ..SkjRecord::empty()
        }
    }

    #[test]
    fn test_context_text_renders_sections() {
        let text = context_text(&record());
        assert!(text.starts_with("JABATAN: Analis Kepegawaian\nKODE: AK-01\nUNIT: \n"));
        assert!(text.contains("\nKOMPETENSI MANAJERIAL:\n- Integritas: Konsisten\n  LEVEL_2: Mampu mengingatkan\n    • Mengingatkan rekan"));
        assert!(!text.contains("LEVEL_1"));
        assert!(text.ends_with("\nKOMPETENSI TEKNIS:\n- Analisis Jabatan: Menyusun uraian"));
    }

    #[test]
    fn test_context_text_omits_empty_sections() {
        let text = context_text(&SkjRecord::empty());
        assert!(!text.contains("KOMPETENSI"));
    }

    #[tokio::test]
    async fn test_select_extracts_once_then_uses_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        fs::create_dir_all(store.skj_source_dir()).unwrap();
        fs::write(store.skj_source_dir().join("analis.txt"), "SKJ Analis").unwrap();

        let model = Arc::new(ScriptedModel::replying(r#"{"jabatan": "Analis Kepegawaian"}"#));
        let library = SkjLibrary::new(SkjExtractor::new(model.clone()), &store);

        assert_eq!(library.available().unwrap(), vec!["analis.txt"]);
        let first = library.select("analis.txt").await.unwrap().unwrap();
        assert_eq!(first.job_title, "Analis Kepegawaian");
        assert!(store.extracted_skj_path("analis.txt").is_file());

        let second = library.select("analis.txt").await.unwrap().unwrap();
        assert_eq!(second, first);
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_select_missing_source_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let library = SkjLibrary::new(
            SkjExtractor::new(Arc::new(ScriptedModel::replying("{}"))),
            &store,
        );
        assert!(library.select("absent.pdf").await.unwrap().is_none());
    }
}
