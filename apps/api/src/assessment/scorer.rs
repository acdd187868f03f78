//! Assessment Scorer: retrieval-augmented scoring of one free-text answer.
//!
//! Retrieval or LLM failure never escapes `score`; it becomes an in-band
//! error result with no sources, which the report aggregator skips.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::assessment::prompts::SCORING_PROMPT;
use crate::competency::mapping::CompetencyMapping;
use crate::documents::preprocess::truncate_chars;
use crate::llm_client::embeddings::Embedder;
use crate::llm_client::prompts::{PromptError, ASSESSOR_SYSTEM};
use crate::llm_client::{CompletionModel, LlmError};
use crate::retrieval::{IndexError, VectorIndex};

/// Chunks retrieved per scoring call.
pub const TOP_K: usize = 6;
/// Characters kept from each retrieved chunk.
pub const SNIPPET_CHARS: usize = 500;

pub const ERROR_RESULT_TEXT: &str =
    "### HASIL PENILAIAN\n#### ERROR: Terjadi kesalahan dalam penilaian";

const SCORE_MARKER: &str = "SKOR:";

#[derive(Debug, Error)]
enum ScoringError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] IndexError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnippet {
    pub source: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Raw LLM reply, or `ERROR_RESULT_TEXT`.
    #[serde(rename = "hasil")]
    pub text: String,
    #[serde(rename = "sumber")]
    pub sources: Vec<SourceSnippet>,
    #[serde(rename = "kompetensi")]
    pub competency: String,
    pub level_target: String,
}

impl AssessmentResult {
    fn error(competency: &str, level: &str) -> Self {
        Self {
            text: ERROR_RESULT_TEXT.to_string(),
            sources: Vec::new(),
            competency: competency.to_string(),
            level_target: level.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.text == ERROR_RESULT_TEXT
    }

    pub fn score(&self) -> Option<u8> {
        parse_score(&self.text)
    }
}

/// Reads the 1-5 score from the first `SKOR:` line whose following token
/// starts with digits. Returns `None` when no such line exists.
///
/// Values outside the 1-5 rubric (`SKOR: 0`, `SKOR: 10`) are treated as
/// unreadable on purpose, so they never enter the report mean.
pub fn parse_score(text: &str) -> Option<u8> {
    text.lines()
        .filter_map(|line| line.split_once(SCORE_MARKER).map(|(_, rest)| rest))
        .find_map(|rest| {
            let token = rest.split_whitespace().next()?.trim_matches('*');
            let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u8>().ok().filter(|s| (1..=5).contains(s))
        })
}

/// One answer to be scored.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    #[serde(alias = "nama")]
    pub participant: String,
    #[serde(alias = "jabatan")]
    pub job: String,
    #[serde(alias = "jawaban")]
    pub answer: String,
    #[serde(alias = "kompetensi")]
    pub competency: String,
    #[serde(alias = "level_target")]
    pub level: String,
}

pub struct AssessmentScorer {
    llm: Arc<dyn CompletionModel>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
    snippet_chars: usize,
}

impl AssessmentScorer {
    pub fn new(llm: Arc<dyn CompletionModel>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            llm,
            embedder,
            top_k: TOP_K,
            snippet_chars: SNIPPET_CHARS,
        }
    }

    pub async fn score(
        &self,
        index: &VectorIndex,
        mapping: &CompetencyMapping,
        req: &ScoreRequest,
    ) -> AssessmentResult {
        info!(
            "Scoring {} for {} ({})",
            req.competency, req.participant, req.level
        );
        match self.try_score(index, mapping, req).await {
            Ok(result) => result,
            Err(e) => {
                error!("Error in assessment of {}: {e}", req.competency);
                AssessmentResult::error(&req.competency, &req.level)
            }
        }
    }

    async fn try_score(
        &self,
        index: &VectorIndex,
        mapping: &CompetencyMapping,
        req: &ScoreRequest,
    ) -> Result<AssessmentResult, ScoringError> {
        let query = format!(
            "{} {} level {} indikator perilaku",
            req.competency, req.job, req.level
        );
        let chunks = index
            .similarity_search(self.embedder.as_ref(), &query, self.top_k)
            .await?;

        let sources: Vec<SourceSnippet> = chunks
            .into_iter()
            .map(|chunk| SourceSnippet {
                content: truncate_chars(&chunk.content, self.snippet_chars).to_string(),
                source: chunk.source,
            })
            .collect();
        let context = sources
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let indicators = mapping
            .indicators(&req.job, &req.level)
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = SCORING_PROMPT.render(&[
            ("context", context.as_str()),
            ("indicators", indicators.as_str()),
            ("participant", req.participant.as_str()),
            ("job", req.job.as_str()),
            ("competency", req.competency.as_str()),
            ("level", req.level.as_str()),
            ("answer", req.answer.as_str()),
        ])?;
        let text = self.llm.complete(ASSESSOR_SYSTEM, &prompt).await?;

        Ok(AssessmentResult {
            text,
            sources,
            competency: req.competency.clone(),
            level_target: req.level.clone(),
        })
    }
}
