//! Question-bank generation from an extracted SKJ record.
//!
//! The model is asked for a JSON array of items. Each element is validated on
//! its own; invalid elements are dropped and logged, the rest are kept.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::assessment::prompts::QUESTION_SET_PROMPT;
use crate::extraction::skj::SkjRecord;
use crate::llm_client::json_scan::parse_array;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::CompletionModel;
use crate::storage::{read_json, write_json, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tipe", rename_all = "lowercase")]
pub enum QuestionItem {
    Mcq(McqQuestion),
    Essay(EssayQuestion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceLabel {
    A,
    B,
    C,
    D,
}

/// Exactly the four labelled choices; any other key is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Choices {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl Choices {
    pub fn get(&self, label: ChoiceLabel) -> &str {
        match label {
            ChoiceLabel::A => &self.a,
            ChoiceLabel::B => &self.b,
            ChoiceLabel::C => &self.c,
            ChoiceLabel::D => &self.d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McqQuestion {
    #[serde(rename = "id_soal")]
    pub id: String,
    #[serde(rename = "soal")]
    pub question: String,
    #[serde(rename = "pilihan")]
    pub choices: Choices,
    #[serde(rename = "jawaban_benar")]
    pub correct: ChoiceLabel,
    #[serde(rename = "kunci_penilaian", default)]
    pub scoring_key: String,
    #[serde(rename = "kompetensi_target")]
    pub target_competency: String,
    #[serde(deserialize_with = "string_or_number")]
    pub level_target: String,
    #[serde(rename = "bobot", default = "mcq_weight")]
    pub weight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssayQuestion {
    #[serde(rename = "id_soal")]
    pub id: String,
    #[serde(rename = "soal")]
    pub question: String,
    #[serde(rename = "kunci_penilaian", default)]
    pub scoring_key: String,
    #[serde(rename = "kompetensi_target")]
    pub target_competency: String,
    #[serde(deserialize_with = "string_or_number")]
    pub level_target: String,
    #[serde(rename = "bobot", default = "essay_weight")]
    pub weight: u32,
}

fn mcq_weight() -> u32 {
    1
}

fn essay_weight() -> u32 {
    2
}

/// Models emit `"level_target": 3` as often as `"3"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

impl QuestionItem {
    pub fn id(&self) -> &str {
        match self {
            QuestionItem::Mcq(q) => &q.id,
            QuestionItem::Essay(q) => &q.id,
        }
    }

    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let id = self.id();
        let question = match self {
            QuestionItem::Mcq(q) => &q.question,
            QuestionItem::Essay(q) => &q.question,
        };
        if id.trim().is_empty() {
            return Err("missing id_soal".to_string());
        }
        if question.trim().is_empty() {
            return Err(format!("{id}: empty question text"));
        }
        if let QuestionItem::Mcq(q) = self {
            let labels = [ChoiceLabel::A, ChoiceLabel::B, ChoiceLabel::C, ChoiceLabel::D];
            if let Some(label) = labels.iter().find(|l| q.choices.get(**l).trim().is_empty()) {
                return Err(format!("{id}: choice {label:?} is empty"));
            }
        }
        Ok(())
    }
}

/// Decodes and validates each element of `items` independently.
pub fn parse_items(items: Vec<Value>) -> Vec<QuestionItem> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let item = match serde_json::from_value::<QuestionItem>(raw) {
                Ok(item) => item,
                Err(e) => {
                    warn!("Dropping question #{i}: {e}");
                    return None;
                }
            };
            match item.validate() {
                Ok(()) => Some(item),
                Err(reason) => {
                    warn!("Dropping question #{i}: {reason}");
                    None
                }
            }
        })
        .collect()
}

pub struct QuestionSetGenerator {
    llm: Arc<dyn CompletionModel>,
}

impl QuestionSetGenerator {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self { llm }
    }

    /// Never fails; any upstream or parse failure yields an empty set.
    pub async fn generate(&self, record: &SkjRecord) -> Vec<QuestionItem> {
        info!(
            "Generating questions for '{}' ({} competencies)",
            record.job_title,
            record.competency_count()
        );

        let skj_data = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                error!("Error serializing SKJ record: {e}");
                return Vec::new();
            }
        };
        let prompt = match QUESTION_SET_PROMPT.render(&[("skj_data", skj_data.as_str())]) {
            Ok(prompt) => prompt,
            Err(e) => {
                error!("Error rendering question prompt: {e}");
                return Vec::new();
            }
        };

        let reply = match self.llm.complete(JSON_ONLY_SYSTEM, &prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error generating questions: {e}");
                return Vec::new();
            }
        };

        let items = parse_array::<Vec<Value>>(&reply)
            .map(parse_items)
            .unwrap_or_default();
        info!("Generated {} questions", items.len());
        items
    }
}

pub fn save_question_set(items: &[QuestionItem], path: &Path) -> Result<(), StorageError> {
    write_json(path, items)
}

pub fn load_question_set(path: &Path) -> Result<Option<Vec<QuestionItem>>, StorageError> {
    read_json(path)
}
