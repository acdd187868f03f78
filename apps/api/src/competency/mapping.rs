//! Job → competency profile lookup table.
//!
//! The on-disk shape is the original JSON format:
//! `{ "<jabatan>": { "level": [...], "kompetensi_teknis": [...], ...,
//!   "indikator_perilaku": { "level_1": [...], ... } } }`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical proficiency tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelKey {
    #[serde(rename = "level_1")]
    Level1,
    #[serde(rename = "level_2")]
    Level2,
    #[serde(rename = "level_3")]
    Level3,
    #[serde(rename = "level_4")]
    Level4,
}

impl LevelKey {
    pub const ALL: [LevelKey; 4] = [
        LevelKey::Level1,
        LevelKey::Level2,
        LevelKey::Level3,
        LevelKey::Level4,
    ];

    /// Resolves a free-text level name by keyword containment, checked in
    /// priority order. Unmatched input falls back to `level_2`.
    pub fn resolve(level: &str) -> LevelKey {
        let level = level.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| level.contains(k));
        if has(&["pertama", "1"]) {
            LevelKey::Level1
        } else if has(&["muda", "2"]) {
            LevelKey::Level2
        } else if has(&["madya", "3"]) {
            LevelKey::Level3
        } else if has(&["utama", "4"]) {
            LevelKey::Level4
        } else {
            LevelKey::Level2
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelKey::Level1 => "level_1",
            LevelKey::Level2 => "level_2",
            LevelKey::Level3 => "level_3",
            LevelKey::Level4 => "level_4",
        }
    }
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetencyKind {
    Technical,
    Managerial,
    SocioCultural,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    #[serde(rename = "level", default)]
    pub levels: Vec<String>,
    #[serde(rename = "kompetensi_teknis", default)]
    pub technical: Vec<String>,
    #[serde(rename = "kompetensi_manajerial", default)]
    pub managerial: Vec<String>,
    #[serde(rename = "kompetensi_sosial_kultural", default)]
    pub socio_cultural: Vec<String>,
    #[serde(
        rename = "indikator_perilaku",
        default,
        deserialize_with = "deserialize_indicators"
    )]
    pub behavioral_indicators: BTreeMap<LevelKey, Vec<String>>,
}

impl JobProfile {
    pub fn competencies(&self, kind: CompetencyKind) -> &[String] {
        match kind {
            CompetencyKind::Technical => &self.technical,
            CompetencyKind::Managerial => &self.managerial,
            CompetencyKind::SocioCultural => &self.socio_cultural,
        }
    }

    /// Indicators for `key`; empty when the profile has none at that level.
    pub fn indicators(&self, key: LevelKey) -> &[String] {
        self.behavioral_indicators
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Accepts arbitrary level names (`"1"`, `"Ahli Madya"`, `"level_3"`) and
/// normalises them to canonical keys, merging lists that collide.
fn deserialize_indicators<'de, D>(deserializer: D) -> Result<BTreeMap<LevelKey, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Vec<String>> = BTreeMap::deserialize(deserializer)?;
    let mut out: BTreeMap<LevelKey, Vec<String>> = BTreeMap::new();
    for (name, indicators) in raw {
        out.entry(LevelKey::resolve(&name))
            .or_default()
            .extend(indicators);
    }
    Ok(out)
}

/// Process-wide job → profile table. Built once, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetencyMapping(BTreeMap<String, JobProfile>);

impl CompetencyMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, job: impl Into<String>, profile: JobProfile) {
        self.0.insert(job.into(), profile);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn job_list(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn get(&self, job: &str) -> Option<&JobProfile> {
        self.0.get(job)
    }

    /// Profile for `job`, or an empty profile when the job is unknown.
    pub fn job_info(&self, job: &str) -> JobProfile {
        self.0.get(job).cloned().unwrap_or_default()
    }

    pub fn competencies_by_type(&self, job: &str, kind: CompetencyKind) -> Vec<String> {
        self.0
            .get(job)
            .map(|p| p.competencies(kind).to_vec())
            .unwrap_or_default()
    }

    /// Indicators for `job` at the level resolved from `level`.
    pub fn indicators(&self, job: &str, level: &str) -> Vec<String> {
        self.0
            .get(job)
            .map(|p| p.indicators(LevelKey::resolve(level)).to_vec())
            .unwrap_or_default()
    }
}
