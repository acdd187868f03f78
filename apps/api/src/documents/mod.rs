pub mod loader;
pub mod preprocess;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::{list_documents, load_document, load_folder};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("unsupported file format: {0}")]
    Unsupported(String),

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A loaded source document: raw text plus provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Base filename the text was loaded from.
    pub source: String,
    pub content: String,
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }
}
