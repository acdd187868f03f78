//! Question Generator: one case-study question per (job, level, competency).
//! Always returns usable text; the deterministic fallback covers LLM failure.

use std::sync::Arc;

use tracing::{info, warn};

use crate::assessment::prompts::QUESTION_GENERATION_PROMPT;
use crate::competency::mapping::CompetencyMapping;
use crate::llm_client::prompts::ASSESSOR_SYSTEM;
use crate::llm_client::CompletionModel;

/// Indicators embedded in a generated question.
const MAX_INDICATORS: usize = 3;
/// Bullet lines used when the level has fewer indicators than `MAX_INDICATORS`.
const DEFAULT_MEASURES: [&str; MAX_INDICATORS] = [
    "Relevansi jawaban dengan konteks",
    "Kedalaman analisis",
    "Aplikasi konsep",
];

pub struct QuestionGenerator {
    llm: Arc<dyn CompletionModel>,
}

impl QuestionGenerator {
    pub fn new(llm: Arc<dyn CompletionModel>) -> Self {
        Self { llm }
    }

    pub async fn generate(
        &self,
        mapping: &CompetencyMapping,
        job: &str,
        level: &str,
        competency: &str,
    ) -> String {
        info!("Generating question: {competency} ({level})");

        let indicators = mapping.indicators(job, level);
        let selected: Vec<&str> = indicators
            .iter()
            .take(MAX_INDICATORS)
            .map(String::as_str)
            .collect();
        let measure = |i: usize| selected.get(i).copied().unwrap_or(DEFAULT_MEASURES[i]);
        let joined = selected.join(", ");

        let prompt = QUESTION_GENERATION_PROMPT.render(&[
            ("competency", competency),
            ("job", job),
            ("level", level),
            ("indicators", joined.as_str()),
            ("indicator_1", measure(0)),
            ("indicator_2", measure(1)),
            ("indicator_3", measure(2)),
        ]);

        let reply = match prompt {
            Ok(prompt) => self.llm.complete(ASSESSOR_SYSTEM, &prompt).await,
            Err(e) => {
                warn!("Question prompt could not be rendered: {e}");
                return fallback_question(job, level, competency);
            }
        };

        match reply {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Empty question from LLM, using fallback");
                fallback_question(job, level, competency)
            }
            Err(e) => {
                warn!("Error generating question: {e}");
                fallback_question(job, level, competency)
            }
        }
    }
}

/// Deterministic question naming the job, level and competency verbatim.
pub fn fallback_question(job: &str, level: &str, competency: &str) -> String {
    format!(
        "### STUDI KASUS:\n\
         Anda adalah {job} level {level}. Dalam pelaksanaan tugas sehari-hari, Anda dihadapkan pada \
         situasi yang membutuhkan penerapan kompetensi {competency}.\n\n\
         ### PERTANYAAN:\n\
         Jelaskan bagaimana Anda akan menerapkan kompetensi {competency} dalam menyelesaikan tantangan \
         pekerjaan sebagai {job} level {level}? Berikan contoh konkret dari pengalaman atau pendekatan \
         yang akan Anda lakukan.\n\n\
         ### INDIKATOR YANG DIUKUR:\n\
         - Pemahaman konseptual tentang {competency}\n\
         - Kemampuan aplikasi dalam konteks nyata\n\
         - Kedalaman analisis dan solusi"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competency::seed::default_mapping;
    use crate::llm_client::mock::ScriptedModel;

    #[tokio::test]
    async fn test_prompt_embeds_up_to_three_indicators() {
        let model = Arc::new(ScriptedModel::replying("### STUDI KASUS:\nKasus"));
        let generator = QuestionGenerator::new(model.clone());
        let text = generator
            .generate(&default_mapping(), "Analis Kepegawaian", "Ahli Madya", "Perencanaan")
            .await;
        assert_eq!(text, "### STUDI KASUS:\nKasus");

        let prompt = &model.prompts()[0];
        assert!(prompt.contains("mengukur kompetensi: Perencanaan"));
        assert!(prompt.contains(
            "- Indikator Perilaku: Menyusun strategi pengembangan SDM, Memimpin unit kerja dengan efektif, \
             Melakukan analisis kebijakan kepegawaian"
        ));
        assert!(prompt.contains("### INDIKATOR YANG DIUKUR:\n- Menyusun strategi pengembangan SDM"));
    }

    #[tokio::test]
    async fn test_unknown_job_uses_default_measures() {
        let model = Arc::new(ScriptedModel::replying("soal"));
        let generator = QuestionGenerator::new(model.clone());
        generator
            .generate(&default_mapping(), "Arsiparis", "Ahli Muda", "Integritas")
            .await;
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("- Relevansi jawaban dengan konteks\n- Kedalaman analisis\n- Aplikasi konsep"));
    }

    #[tokio::test]
    async fn test_llm_failure_returns_fallback_naming_inputs() {
        let generator = QuestionGenerator::new(Arc::new(ScriptedModel::failing()));
        for (job, level, competency) in [
            ("Pranata Komputer", "Pranata Komputer Madya", "Keamanan Informasi"),
            ("Jabatan Tak Dikenal", "senior", "Kolaborasi"),
        ] {
            let text = generator
                .generate(&default_mapping(), job, level, competency)
                .await;
            assert!(!text.is_empty());
            assert!(text.contains(job));
            assert!(text.contains(level));
            assert!(text.contains(competency));
            assert!(text.starts_with("### STUDI KASUS:"));
        }
    }

    #[tokio::test]
    async fn test_blank_reply_returns_fallback() {
        let generator = QuestionGenerator::new(Arc::new(ScriptedModel::replying("  \n")));
        let text = generator
            .generate(&default_mapping(), "Analis Kepegawaian", "Ahli Muda", "Perencanaan")
            .await;
        assert_eq!(text, fallback_question("Analis Kepegawaian", "Ahli Muda", "Perencanaan"));
    }
}
