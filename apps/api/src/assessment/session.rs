//! Full assessment session: score every answer in order, then aggregate.

use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};

use crate::assessment::report::{build_report, save_report, Report, SessionMeta};
use crate::assessment::scorer::{AssessmentScorer, ScoreRequest};
use crate::competency::mapping::CompetencyMapping;
use crate::retrieval::VectorIndex;
use crate::storage::{ArtifactStore, StorageError};

#[derive(Debug, Clone, Deserialize)]
pub struct CompetencyAnswer {
    #[serde(rename = "kompetensi")]
    pub competency: String,
    #[serde(rename = "jawaban")]
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRequest {
    #[serde(flatten)]
    pub meta: SessionMeta,
    #[serde(rename = "jawaban")]
    pub answers: Vec<CompetencyAnswer>,
}

/// Scores each answer sequentially and persists the resulting report.
/// When the session lists no competencies, the answered ones are recorded.
pub async fn run_session(
    scorer: &AssessmentScorer,
    index: &VectorIndex,
    mapping: &CompetencyMapping,
    store: &ArtifactStore,
    request: SessionRequest,
) -> Result<Report, StorageError> {
    let SessionRequest { mut meta, answers } = request;
    info!(
        "Assessment session for {} ({}, {}): {} answers",
        meta.participant,
        meta.job,
        meta.level_target,
        answers.len()
    );

    let mut results = Vec::with_capacity(answers.len());
    for answer in &answers {
        let req = ScoreRequest {
            participant: meta.participant.clone(),
            job: meta.job.clone(),
            answer: answer.answer.clone(),
            competency: answer.competency.clone(),
            level: meta.level_target.clone(),
        };
        results.push(scorer.score(index, mapping, &req).await);
    }

    let failed = results.iter().filter(|r| r.is_error()).count();
    if failed > 0 {
        warn!("{failed} of {} answers could not be scored", results.len());
    }

    if meta.competencies.is_empty() {
        meta.competencies = answers.into_iter().map(|a| a.competency).collect();
    }

    let report = build_report(meta, results, Local::now());
    save_report(store, &report).await?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::assessment::report::EligibilityStatus;
    use crate::competency::seed::default_mapping;
    use crate::documents::Document;
    use crate::llm_client::embeddings::HashingEmbedder;
    use crate::llm_client::mock::ScriptedModel;
    use crate::retrieval::{IndexBuilder, TextSplitter};

    async fn index(embedder: Arc<HashingEmbedder>) -> VectorIndex {
        let docs = vec![Document::new(
            "skj_analis.txt",
            "Analis Kepegawaian Ahli Muda menyusun rencana kebutuhan pegawai dan \
             mengevaluasi pelaksanaan program kepegawaian.",
        )];
        IndexBuilder::new(embedder, TextSplitter::new(1000, 200))
            .build(&docs)
            .await
            .unwrap()
    }

    fn request(competencies: Vec<String>) -> SessionRequest {
        SessionRequest {
            meta: SessionMeta {
                participant: "Budi Santoso".to_string(),
                employee_id: String::new(),
                job: "Analis Kepegawaian".to_string(),
                level_target: "Ahli Muda".to_string(),
                competencies,
            },
            answers: vec![
                CompetencyAnswer {
                    competency: "Perencanaan".to_string(),
                    answer: "Saya menyusun rencana kerja tahunan.".to_string(),
                },
                CompetencyAnswer {
                    competency: "Integritas".to_string(),
                    answer: "Saya menolak gratifikasi.".to_string(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_session_scores_every_answer_and_saves() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let embedder = Arc::new(HashingEmbedder::new(64));
        let index = index(embedder.clone()).await;
        let llm = Arc::new(ScriptedModel::replying("### HASIL PENILAIAN\n#### SKOR: 4"));
        let scorer = AssessmentScorer::new(llm.clone(), embedder);

        let report = run_session(&scorer, &index, &default_mapping(), &store, request(vec![]))
            .await
            .unwrap();

        assert_eq!(llm.prompts().len(), 2);
        assert_eq!(report.summary.total_competencies, 2);
        assert_eq!(report.summary.mean_score, 4.0);
        assert_eq!(report.summary.status, EligibilityStatus::Competent);
        assert_eq!(
            report.metadata.session.competencies,
            vec!["Perencanaan".to_string(), "Integritas".to_string()]
        );
        assert_eq!(report.detailed_results[0].competency, "Perencanaan");
        assert_eq!(report.detailed_results[1].competency, "Integritas");
        assert_eq!(std::fs::read_dir(store.reports_dir()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_session_keeps_failed_scores_out_of_mean() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let embedder = Arc::new(HashingEmbedder::new(64));
        let index = index(embedder.clone()).await;
        let scorer = AssessmentScorer::new(Arc::new(ScriptedModel::failing()), embedder);

        let listed = vec!["Perencanaan".to_string()];
        let report = run_session(&scorer, &index, &default_mapping(), &store, request(listed.clone()))
            .await
            .unwrap();

        assert!(report.detailed_results.iter().all(|r| r.is_error()));
        assert_eq!(report.summary.scored, 0);
        assert_eq!(report.summary.mean_score, 0.0);
        assert_eq!(report.summary.status, EligibilityStatus::NeedsDevelopment);
        assert_eq!(report.metadata.session.competencies, listed);
    }

    #[test]
    fn test_request_deserializes_flat_body() {
        let body = serde_json::json!({
            "nama_pegawai": "Budi Santoso",
            "jabatan": "Analis Kepegawaian",
            "level_target": "Ahli Muda",
            "jawaban": [{"kompetensi": "Integritas", "jawaban": "Saya jujur."}]
        });
        let req: SessionRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.meta.participant, "Budi Santoso");
        assert_eq!(req.meta.employee_id, "");
        assert!(req.meta.competencies.is_empty());
        assert_eq!(req.answers.len(), 1);
    }
}
