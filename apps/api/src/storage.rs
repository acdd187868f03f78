//! File-based artifact store. Every artifact kind has a fixed directory under
//! the data root; filenames derive from the source document's stem.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("blocking storage task failed: {0}")]
    Task(#[from] JoinError),
}

impl StorageError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StorageError::Io { source, .. } if source.kind() == io::ErrorKind::AlreadyExists)
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn skj_source_dir(&self) -> PathBuf {
        self.root.join("data").join("skj_documents")
    }

    pub fn extracted_skj_path(&self, filename: &str) -> PathBuf {
        self.root
            .join("data")
            .join("skj")
            .join("extracted")
            .join(format!("{}.json", file_stem(filename)))
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.root.join("models").join("job_competency_mapping.json")
    }

    pub fn question_set_path(&self, filename: &str) -> PathBuf {
        self.root
            .join("data")
            .join("soal")
            .join(format!("{}_soal.json", file_stem(filename)))
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join("vector_store").join("index.json")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn report_path(&self, participant: &str, at: DateTime<Local>) -> PathBuf {
        self.reports_dir().join(format!(
            "assessment_{}_{}.json",
            safe_file_component(participant),
            at.format("%Y%m%d_%H%M")
        ))
    }

    /// Used when `report_path` is already taken by an earlier session in the
    /// same minute.
    pub fn session_report_path(
        &self,
        participant: &str,
        at: DateTime<Local>,
        session_id: Uuid,
    ) -> PathBuf {
        self.reports_dir().join(format!(
            "assessment_{}_{}_{}.json",
            safe_file_component(participant),
            at.format("%Y%m%d_%H%M"),
            session_id.simple()
        ))
    }
}

fn serialize_for(path: &Path, value: &(impl Serialize + ?Sized)) -> Result<String, StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let body = serialize_for(path, value)?;
    fs::write(path, body).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved {}", path.display());
    Ok(())
}

/// Like `write_json`, but never touches an existing file: fails with an
/// `AlreadyExists` I/O error instead.
pub fn write_json_new<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let body = serialize_for(path, value)?;
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(body.as_bytes()).map_err(io_err)?;
    info!("Saved {}", path.display());
    Ok(())
}

/// Runs filesystem work on the blocking pool.
pub async fn run_blocking<T, F>(job: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job).await?
}

/// Reads a JSON artifact. An absent file is `Ok(None)`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
}

fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| safe_file_component(filename))
}

/// Replaces whitespace and path-hostile characters with `_`.
pub fn safe_file_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
