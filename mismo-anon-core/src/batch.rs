// mismo-anon-core/src/batch.rs
//! Directory batch processing.
//!
//! Candidates are the regular files directly inside the target directory whose
//! extension equals the configured one. Each is read, anonymized and written
//! under the output subdirectory with the same file name. A failing file is
//! recorded and the batch moves on; only an unusable target path aborts.
//!
//! License: MIT OR APACHE 2.0

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

use crate::engine::Anonymizer;
use crate::errors::AnonymizerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// No file failed (including the empty directory case).
    Success,
    PartialSuccess,
    /// Every candidate failed.
    Failed,
}

/// Outcome of a single candidate file. File names are relative to the target
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FileOutcome {
    Anonymized { original: String, anonymized: String },
    Failed { original: String, error: String },
}

impl FileOutcome {
    pub fn original(&self) -> &str {
        match self {
            FileOutcome::Anonymized { original, .. } | FileOutcome::Failed { original, .. } => original,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Report of one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub status: BatchStatus,
    pub message: String,
    pub folder: PathBuf,
    /// `None` when there was nothing to process and no directory was created.
    pub output_folder: Option<PathBuf>,
    pub processed: usize,
    pub failed: usize,
    pub files: Vec<FileOutcome>,
}

impl BatchResult {
    /// Number of candidate files seen.
    pub fn attempted(&self) -> usize {
        self.processed + self.failed
    }

    fn from_outcomes(folder: PathBuf, output_folder: PathBuf, files: Vec<FileOutcome>) -> Self {
        let failed = files.iter().filter(|f| f.is_failure()).count();
        let processed = files.len() - failed;
        let status = if failed == 0 {
            BatchStatus::Success
        } else if processed == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::PartialSuccess
        };
        let mut message = format!("Processed {} files successfully", processed);
        if failed > 0 {
            message.push_str(&format!(", {} failed", failed));
        }
        Self {
            status,
            message,
            folder,
            output_folder: Some(output_folder),
            processed,
            failed,
            files,
        }
    }
}

/// Runs `anonymizer` over every candidate file in `folder`.
pub(crate) fn process_directory<R: Rng + ?Sized>(
    anonymizer: &Anonymizer,
    folder: &Path,
    rng: &mut R,
) -> Result<BatchResult, AnonymizerError> {
    validate_target(folder)?;

    let batch = &anonymizer.config().batch;
    let candidates = collect_candidates(folder, &batch.extension)?;
    if candidates.is_empty() {
        info!("No .{} files found in {}", batch.extension, folder.display());
        return Ok(BatchResult {
            status: BatchStatus::Success,
            message: "No XML files found in folder".to_string(),
            folder: folder.to_path_buf(),
            output_folder: None,
            processed: 0,
            failed: 0,
            files: Vec::new(),
        });
    }

    let output_folder = folder.join(&batch.output_dir_name);
    info!(
        "Processing {} file(s) from {} into {}",
        candidates.len(),
        folder.display(),
        output_folder.display()
    );

    if let Err(e) = fs::create_dir_all(&output_folder) {
        warn!("Cannot create output directory {}: {}", output_folder.display(), e);
        let reason = format!("cannot create output directory: {}", e);
        let files = candidates
            .into_iter()
            .map(|candidate| failure(candidate.display, reason.clone()))
            .collect();
        return Ok(BatchResult::from_outcomes(folder.to_path_buf(), output_folder, files));
    }

    let mut files = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let outcome = match anonymize_file(anonymizer, folder, &output_folder, &candidate, rng) {
            Ok(()) => {
                info!("Successfully anonymized: {}", candidate.display);
                FileOutcome::Anonymized {
                    anonymized: format!("{}/{}", batch.output_dir_name, candidate.display),
                    original: candidate.display,
                }
            }
            Err(e) => {
                warn!("Error processing {}: {}", candidate.display, e);
                failure(candidate.display, e.to_string())
            }
        };
        files.push(outcome);
    }

    let result = BatchResult::from_outcomes(folder.to_path_buf(), output_folder, files);
    info!("{}", result.message);
    Ok(result)
}

fn failure(name: String, reason: String) -> FileOutcome {
    let error = AnonymizerError::PerFile {
        file: name.clone(),
        reason,
    };
    FileOutcome::Failed {
        original: name,
        error: error.to_string(),
    }
}

/// The target must be an absolute path to an existing directory.
fn validate_target(folder: &Path) -> Result<(), AnonymizerError> {
    if !folder.is_absolute() {
        return Err(AnonymizerError::invalid_path(folder, "path must be absolute"));
    }
    if !folder.exists() {
        return Err(AnonymizerError::invalid_path(folder, "folder does not exist"));
    }
    if !folder.is_dir() {
        return Err(AnonymizerError::invalid_path(folder, "path is not a directory"));
    }
    Ok(())
}

/// A candidate file. I/O goes through `file_name`; reports use `display`,
/// which is lossy for names that are not valid UTF-8.
#[derive(Debug)]
struct Candidate {
    file_name: OsString,
    display: String,
}

/// Top-level regular files with exactly `extension`, sorted by file name.
fn collect_candidates(folder: &Path, extension: &str) -> Result<Vec<Candidate>, AnonymizerError> {
    let mut candidates = Vec::new();
    for entry in fs::read_dir(folder)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension() != Some(OsStr::new(extension)) {
            continue;
        }
        let file_name = entry.file_name();
        let display = file_name.to_string_lossy().into_owned();
        candidates.push(Candidate { file_name, display });
    }
    candidates.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(candidates)
}

fn anonymize_file<R: Rng + ?Sized>(
    anonymizer: &Anonymizer,
    folder: &Path,
    output_folder: &Path,
    candidate: &Candidate,
    rng: &mut R,
) -> Result<(), AnonymizerError> {
    debug!("Processing: {}", candidate.display);
    let raw = fs::read(folder.join(&candidate.file_name))?;
    let (bytes, summary) = anonymizer.anonymize_document_with_rng(&raw, rng)?;
    fs::write(output_folder.join(&candidate.file_name), bytes)?;
    debug!("{}: {} value(s) replaced", candidate.display, summary.total());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcomes(ok: usize, bad: usize) -> Vec<FileOutcome> {
        let mut files = Vec::new();
        for i in 0..ok {
            files.push(FileOutcome::Anonymized {
                original: format!("ok{}.xml", i),
                anonymized: format!("anon/ok{}.xml", i),
            });
        }
        for i in 0..bad {
            files.push(failure(format!("bad{}.xml", i), "broken".to_string()));
        }
        files
    }

    fn result(ok: usize, bad: usize) -> BatchResult {
        BatchResult::from_outcomes(PathBuf::from("/in"), PathBuf::from("/in/anon"), outcomes(ok, bad))
    }

    #[test]
    fn test_status_and_message() {
        let all_ok = result(3, 0);
        assert_eq!(all_ok.status, BatchStatus::Success);
        assert_eq!(all_ok.message, "Processed 3 files successfully");

        let partial = result(3, 1);
        assert_eq!(partial.status, BatchStatus::PartialSuccess);
        assert_eq!(partial.message, "Processed 3 files successfully, 1 failed");
        assert_eq!(partial.attempted(), 4);

        let none_ok = result(0, 2);
        assert_eq!(none_ok.status, BatchStatus::Failed);
        assert_eq!(none_ok.message, "Processed 0 files successfully, 2 failed");
    }

    #[test]
    fn test_failure_message_names_file() {
        match failure("x.xml".to_string(), "Malformed document: bad".to_string()) {
            FileOutcome::Failed { original, error } => {
                assert_eq!(original, "x.xml");
                assert!(error.contains("x.xml"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_outcome_serializes_untagged() {
        let json = serde_json::to_value(result(1, 1)).unwrap();
        assert_eq!(json["status"], "partial_success");
        assert_eq!(json["files"][0]["anonymized"], "anon/ok0.xml");
        assert!(json["files"][1]["error"].is_string());
        assert!(json["files"][1].get("anonymized").is_none());
    }

    #[test]
    fn test_relative_path_rejected() {
        let err = validate_target(Path::new("relative/dir")).unwrap_err();
        assert!(matches!(err, AnonymizerError::InvalidPath { .. }));
    }
}
