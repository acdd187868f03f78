//! Report Aggregator. A report is built once per session, persisted, and
//! never mutated afterwards.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assessment::scorer::AssessmentResult;
use crate::storage::{run_blocking, write_json_new, ArtifactStore, StorageError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    #[serde(rename = "nama_pegawai")]
    pub participant: String,
    #[serde(rename = "nip", default)]
    pub employee_id: String,
    #[serde(rename = "jabatan")]
    pub job: String,
    pub level_target: String,
    #[serde(rename = "kompetensi_dinilai", default)]
    pub competencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    #[serde(rename = "COMPETENT")]
    Competent,
    #[serde(rename = "SUFFICIENTLY COMPETENT")]
    SufficientlyCompetent,
    #[serde(rename = "NEEDS DEVELOPMENT")]
    NeedsDevelopment,
}

impl EligibilityStatus {
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 4.0 {
            EligibilityStatus::Competent
        } else if mean >= 3.0 {
            EligibilityStatus::SufficientlyCompetent
        } else {
            EligibilityStatus::NeedsDevelopment
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityStatus::Competent => "COMPETENT",
            EligibilityStatus::SufficientlyCompetent => "SUFFICIENTLY COMPETENT",
            EligibilityStatus::NeedsDevelopment => "NEEDS DEVELOPMENT",
        }
    }
}

impl fmt::Display for EligibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(rename = "id_sesi")]
    pub session_id: Uuid,
    #[serde(rename = "tanggal_assessment")]
    pub assessed_at: DateTime<Local>,
    #[serde(flatten)]
    pub session: SessionMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(rename = "total_kompetensi")]
    pub total_competencies: usize,
    /// Results whose score could be read; the mean is taken over these.
    #[serde(rename = "skor_terbaca")]
    pub scored: usize,
    /// Rounded to two decimals; 0 when nothing could be scored.
    #[serde(rename = "rata_rata_skor")]
    pub mean_score: f64,
    #[serde(rename = "status_kelayakan")]
    pub status: EligibilityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub detailed_results: Vec<AssessmentResult>,
}

/// Aggregates session results. Results without a readable score are kept in
/// the report but left out of the mean.
pub fn build_report(
    session: SessionMeta,
    results: Vec<AssessmentResult>,
    assessed_at: DateTime<Local>,
) -> Report {
    let scores: Vec<u8> = results.iter().filter_map(AssessmentResult::score).collect();
    let mean_score = if scores.is_empty() {
        0.0
    } else {
        let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
        round2(f64::from(total) / scores.len() as f64)
    };

    Report {
        metadata: ReportMetadata {
            session_id: Uuid::new_v4(),
            assessed_at,
            session,
        },
        summary: ReportSummary {
            total_competencies: results.len(),
            scored: scores.len(),
            mean_score,
            status: EligibilityStatus::from_mean(mean_score),
        },
        detailed_results: results,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Writes the report under the reports directory, named after the
/// participant and the assessment time. An existing report is never
/// overwritten: a second session in the same minute gets its session id
/// appended to the filename.
pub async fn save_report(store: &ArtifactStore, report: &Report) -> Result<PathBuf, StorageError> {
    let store = store.clone();
    let report = report.clone();
    run_blocking(move || write_report(&store, &report)).await
}

fn write_report(store: &ArtifactStore, report: &Report) -> Result<PathBuf, StorageError> {
    let meta = &report.metadata;
    let participant = &meta.session.participant;

    let mut path = store.report_path(participant, meta.assessed_at);
    match write_json_new(&path, report) {
        Ok(()) => {}
        Err(e) if e.is_already_exists() => {
            path = store.session_report_path(participant, meta.assessed_at, meta.session_id);
            write_json_new(&path, report)?;
        }
        Err(e) => return Err(e),
    }

    info!(
        "Report saved for {participant}: {} ({})",
        path.display(),
        report.summary.status
    );
    Ok(path)
}
