// mismo-anon-core/src/headless.rs
//! `headless.rs`
//! One-shot wrappers over [`Anonymizer`] built from the embedded default
//! policy, for callers that do not manage configuration themselves.

use std::path::Path;

use crate::batch::BatchResult;
use crate::engine::Anonymizer;
use crate::errors::AnonymizerError;

/// Anonymizes one serialized document with the default policy.
///
/// # Arguments
///
/// * `raw` - The document bytes, UTF-8 with an optional byte order mark.
pub fn anonymize_document(raw: &[u8]) -> Result<Vec<u8>, AnonymizerError> {
    Anonymizer::with_default_config()?.anonymize_document(raw)
}

/// Anonymizes every XML file directly inside `path` with the default policy.
///
/// # Arguments
///
/// * `path` - Absolute path to an existing directory.
pub fn anonymize_directory<P: AsRef<Path>>(path: P) -> Result<BatchResult, AnonymizerError> {
    Anonymizer::with_default_config()?.anonymize_directory(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_headless_anonymize_document() -> Result<()> {
        let raw = br#"<_RESIDENCE _StreetAddress="12 Oak" _City="Reno" Note="keep"/>"#;
        let out = String::from_utf8(anonymize_document(raw)?)?;
        assert!(out.contains(r#"_City="Anytown""#));
        assert!(out.contains(r#"Note="keep""#));
        assert!(!out.contains("12 Oak"));
        Ok(())
    }

    #[test]
    fn test_headless_anonymize_directory_rejects_missing_folder() {
        let missing = std::env::temp_dir().join("mismo-anon-missing-folder-for-test");
        let err = anonymize_directory(&missing).unwrap_err();
        assert!(matches!(err, AnonymizerError::InvalidPath { .. }));
    }
}
