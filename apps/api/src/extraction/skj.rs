//! Structured job-competency record ("SKJ") as extracted from a source
//! document. Every key is always present on serialization; missing input
//! fields default to empty strings / lists.

use serde::{Deserialize, Serialize};

use crate::competency::mapping::LevelKey;

pub const EXTRACTOR_VERSION: &str = "v1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkjRecord {
    #[serde(rename = "jabatan")]
    pub job_title: String,
    #[serde(rename = "kode_jabatan")]
    pub job_code: String,
    #[serde(rename = "unit_organisasi")]
    pub organization_unit: String,
    #[serde(rename = "ringkasan_tugas")]
    pub task_summary: String,
    #[serde(rename = "kompetensi_manajerial")]
    pub managerial: Vec<Competency>,
    #[serde(rename = "kompetensi_teknis")]
    pub technical: Vec<Competency>,
    #[serde(rename = "persyaratan_jabatan")]
    pub requirements: PositionRequirements,
    pub metadata: ExtractionMetadata,
}

impl SkjRecord {
    /// The canonical empty record returned when a reply holds no usable JSON.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn competency_count(&self) -> usize {
        self.managerial.len() + self.technical.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Competency {
    #[serde(rename = "nama_kompetensi")]
    pub name: String,
    #[serde(rename = "definisi")]
    pub definition: String,
    pub level_1: LevelDetail,
    pub level_2: LevelDetail,
    pub level_3: LevelDetail,
    pub level_4: LevelDetail,
}

impl Competency {
    pub fn level(&self, key: LevelKey) -> &LevelDetail {
        match key {
            LevelKey::Level1 => &self.level_1,
            LevelKey::Level2 => &self.level_2,
            LevelKey::Level3 => &self.level_3,
            LevelKey::Level4 => &self.level_4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDetail {
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "indikator_perilaku")]
    pub indicators: Vec<String>,
}

impl LevelDetail {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.indicators.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionRequirements {
    #[serde(rename = "pendidikan")]
    pub education: String,
    #[serde(rename = "pelatihan")]
    pub training: String,
    #[serde(rename = "pengalaman")]
    pub experience: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionMetadata {
    #[serde(rename = "sumber_file")]
    pub source_file: String,
    pub extracted_at: String,
    pub extractor_version: String,
}

impl Default for ExtractionMetadata {
    fn default() -> Self {
        Self {
            source_file: String::new(),
            extracted_at: String::new(),
            extractor_version: EXTRACTOR_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_record_serializes_every_key() {
        let value = serde_json::to_value(SkjRecord::empty()).unwrap();
        assert_eq!(
            value,
            json!({
                "jabatan": "",
                "kode_jabatan": "",
                "unit_organisasi": "",
                "ringkasan_tugas": "",
                "kompetensi_manajerial": [],
                "kompetensi_teknis": [],
                "persyaratan_jabatan": {
                    "pendidikan": "",
                    "pelatihan": "",
                    "pengalaman": ""
                },
                "metadata": {
                    "sumber_file": "",
                    "extracted_at": "",
                    "extractor_version": "v1"
                }
            })
        );
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let record: SkjRecord = serde_json::from_value(json!({
            "jabatan": "Analis Kepegawaian",
            "kompetensi_manajerial": [{
                "nama_kompetensi": "Integritas",
                "level_2": {"indikator_perilaku": ["Jujur"]}
            }]
        }))
        .unwrap();
        assert_eq!(record.job_title, "Analis Kepegawaian");
        assert!(record.job_code.is_empty());
        let comp = &record.managerial[0];
        assert!(comp.definition.is_empty());
        assert!(comp.level(LevelKey::Level1).is_empty());
        assert_eq!(comp.level(LevelKey::Level2).indicators, ["Jujur"]);
        assert_eq!(record.metadata.extractor_version, "v1");
        assert_eq!(record.competency_count(), 1);
    }
}
