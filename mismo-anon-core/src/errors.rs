//! errors.rs - Custom error types for the mismo-anon-core library.
//!
//! Every message built here is safe to log: variants carry byte offsets and
//! file names, never names or values read from the document.
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// All error kinds surfaced by the anonymization engine.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnonymizerError {
    /// The input could not be recovered as an XML document.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The batch target is missing, relative, or not a directory.
    #[error("Invalid path '{}': {reason}", path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// One file of a batch run failed. Recorded in the batch result, never propagated.
    #[error("Failed to anonymize '{file}': {reason}")]
    PerFile { file: String, reason: String },

    #[error("Invalid anonymizer configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnonymizerError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        AnonymizerError::MalformedDocument(msg.into())
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        AnonymizerError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
