// mismo-anon-core/src/engine.rs
//! The `Anonymizer` facade.
//!
//! An `Anonymizer` owns a validated configuration, the classification rule
//! table and the parsing strategy chosen by that configuration. It holds no
//! mutable state, so a single instance can be shared across threads; every
//! call brings (or draws) its own random number generator.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::path::Path;

use log::{debug, info};
use rand::Rng;

use crate::batch::{self, BatchResult};
use crate::config::AnonymizerConfig;
use crate::errors::AnonymizerError;
use crate::generator::SyntheticValueGenerator;
use crate::parser::{decode_input, parser_for, strip_bom, DocumentParser};
use crate::rewriter::{rewrite_document, RewriteSummary};
use crate::rules::RuleTable;

/// Single-document and batch anonymization over one configuration.
pub struct Anonymizer {
    config: AnonymizerConfig,
    rules: RuleTable,
    parser: Box<dyn DocumentParser>,
}

impl fmt::Debug for Anonymizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Anonymizer")
            .field("rules", &self.rules.rules().len())
            .field("parser", &self.parser.name())
            .finish()
    }
}

impl Anonymizer {
    /// Creates an anonymizer after validating `config`.
    ///
    /// # Errors
    /// Returns [`AnonymizerError::InvalidConfig`] listing every problem found.
    pub fn new(config: AnonymizerConfig) -> Result<Self, AnonymizerError> {
        config
            .validate()
            .map_err(|e| AnonymizerError::InvalidConfig(e.to_string()))?;
        let parser = parser_for(&config.parser);
        debug!(
            "Anonymizer created with {} rule(s) and the {} parser.",
            RuleTable::mismo().rules().len(),
            parser.name()
        );
        Ok(Self {
            config,
            rules: RuleTable::mismo(),
            parser,
        })
    }

    /// Creates an anonymizer from the embedded default policy.
    pub fn with_default_config() -> Result<Self, AnonymizerError> {
        let config = AnonymizerConfig::load_default()
            .map_err(|e| AnonymizerError::InvalidConfig(format!("{:#}", e)))?;
        Self::new(config)
    }

    pub fn config(&self) -> &AnonymizerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Anonymizes one serialized document using the thread-local RNG.
    ///
    /// # Errors
    /// Returns [`AnonymizerError::MalformedDocument`] when the input cannot be
    /// parsed even after repair. No partial output is produced.
    pub fn anonymize_document(&self, raw: &[u8]) -> Result<Vec<u8>, AnonymizerError> {
        let mut rng = rand::rng();
        self.anonymize_document_with_rng(raw, &mut rng)
            .map(|(bytes, _)| bytes)
    }

    /// Anonymizes one serialized document with the caller's RNG and reports
    /// what was replaced.
    pub fn anonymize_document_with_rng<R: Rng + ?Sized>(
        &self,
        raw: &[u8],
        rng: &mut R,
    ) -> Result<(Vec<u8>, RewriteSummary), AnonymizerError> {
        let text = decode_input(raw)?;
        self.anonymize_str_with_rng(text, rng)
    }

    /// Anonymizes inline XML text using the thread-local RNG.
    pub fn anonymize_str(&self, xml: &str) -> Result<String, AnonymizerError> {
        let mut rng = rand::rng();
        let (bytes, _) = self.anonymize_str_with_rng(xml, &mut rng)?;
        String::from_utf8(bytes).map_err(|e| AnonymizerError::Serialization(e.to_string()))
    }

    fn anonymize_str_with_rng<R: Rng + ?Sized>(
        &self,
        xml: &str,
        rng: &mut R,
    ) -> Result<(Vec<u8>, RewriteSummary), AnonymizerError> {
        let mut document = self.parser.parse(strip_bom(xml))?;
        let summary = {
            let mut generator = SyntheticValueGenerator::new(&self.config.generator, &mut *rng);
            rewrite_document(&mut document, &self.rules, &mut generator)
        };
        let bytes = document.to_xml_bytes(self.config.parser.emit_declaration)?;
        info!(
            "Anonymized document: {} value(s) replaced, {} bytes written.",
            summary.total(),
            bytes.len()
        );
        Ok((bytes, summary))
    }

    /// Anonymizes every candidate file directly inside `path` into its
    /// output subdirectory, using the thread-local RNG.
    ///
    /// # Errors
    /// Returns [`AnonymizerError::InvalidPath`] when `path` is not an
    /// absolute path to an existing directory. Per-file failures are recorded
    /// in the result instead.
    pub fn anonymize_directory<P: AsRef<Path>>(&self, path: P) -> Result<BatchResult, AnonymizerError> {
        let mut rng = rand::rng();
        self.anonymize_directory_with_rng(path, &mut rng)
    }

    pub fn anonymize_directory_with_rng<P: AsRef<Path>, R: Rng + ?Sized>(
        &self,
        path: P,
        rng: &mut R,
    ) -> Result<BatchResult, AnonymizerError> {
        batch::process_directory(self, path.as_ref(), rng)
    }
}
