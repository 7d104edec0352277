//! Error taxonomy for the splitter.
//!
//! Library code returns [`SplitterError`]; the binary wraps it in `anyhow`
//! with extra context before logging and exiting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitterError {
    #[error("language model unavailable at {path}: {reason}")]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("failed to download language model from {url}: {reason}")]
    ModelDownload { url: String, reason: String },

    #[error("failed to read {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse word document {path}: {reason}")]
    DocumentParse { path: PathBuf, reason: String },

    #[error("sentence processing failed: {0}")]
    SentenceProcessing(String),

    #[error("failed to write {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SplitterError {
    pub fn document_parse(path: &std::path::Path, reason: impl ToString) -> Self {
        SplitterError::DocumentParse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = SplitterError> = std::result::Result<T, E>;
