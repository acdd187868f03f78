//! Competency mapper: derives the job → profile table from source documents
//! with one LLM call, degrading to the seed table on any failure.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::competency::mapping::CompetencyMapping;
use crate::competency::prompts::MAPPING_EXTRACTION_PROMPT;
use crate::competency::seed::SEED_VERSION;
use crate::documents::preprocess::truncate_chars;
use crate::documents::Document;
use crate::llm_client::json_scan::parse_object;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::CompletionModel;
use crate::storage::{read_json, write_json, StorageError};

/// Documents sampled for the extraction prompt.
const SAMPLE_DOCUMENTS: usize = 5;
/// Characters taken from each sampled document.
const SAMPLE_CHARS_PER_DOCUMENT: usize = 1000;

pub struct CompetencyMapper {
    llm: Arc<dyn CompletionModel>,
    fallback: CompetencyMapping,
}

impl CompetencyMapper {
    pub fn new(llm: Arc<dyn CompletionModel>, fallback: CompetencyMapping) -> Self {
        Self { llm, fallback }
    }

    /// Builds a mapping from the first few documents. Never fails: when the
    /// LLM call errors or its reply holds no usable mapping, the seed table
    /// is returned instead.
    pub async fn build_mapping(&self, documents: &[Document]) -> CompetencyMapping {
        info!("Extracting job competencies from {} documents", documents.len());

        match self.extract(documents).await {
            Some(mapping) => {
                info!("LLM extracted {} jobs", mapping.len());
                mapping
            }
            None => {
                warn!(
                    "Using fallback mapping (seed {SEED_VERSION}, {} jobs)",
                    self.fallback.len()
                );
                self.fallback.clone()
            }
        }
    }

    async fn extract(&self, documents: &[Document]) -> Option<CompetencyMapping> {
        let sample = sample_content(documents);
        let prompt = MAPPING_EXTRACTION_PROMPT
            .render(&[("sample_content", sample.as_str())])
            .ok()?;

        let reply = match self.llm.complete(JSON_ONLY_SYSTEM, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Error extracting mapping with LLM: {e}");
                return None;
            }
        };

        let mapping: CompetencyMapping = parse_object(&reply)?;
        if mapping.is_empty() {
            warn!("LLM returned an empty mapping");
            return None;
        }
        Some(mapping)
    }
}

fn sample_content(documents: &[Document]) -> String {
    documents
        .iter()
        .take(SAMPLE_DOCUMENTS)
        .map(|doc| format!("{}\n\n", truncate_chars(&doc.content, SAMPLE_CHARS_PER_DOCUMENT)))
        .collect()
}

pub fn save_mapping(mapping: &CompetencyMapping, path: &Path) -> Result<(), StorageError> {
    write_json(path, mapping)?;
    info!("Mapping saved: {} jobs", mapping.len());
    Ok(())
}

/// Restores a persisted mapping. An absent file yields an empty mapping.
pub fn load_mapping(path: &Path) -> Result<CompetencyMapping, StorageError> {
    match read_json::<CompetencyMapping>(path)? {
        Some(mapping) => {
            info!("Loaded job mapping: {} positions", mapping.len());
            Ok(mapping)
        }
        None => {
            warn!(
                "Mapping file {} not found, using empty mapping",
                path.display()
            );
            Ok(CompetencyMapping::new())
        }
    }
}
