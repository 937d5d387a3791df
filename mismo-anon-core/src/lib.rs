// mismo-anon-core/src/lib.rs
//! # mismo-anon Core Library
//!
//! `mismo-anon-core` provides the platform-independent logic for anonymizing
//! MISMO-style mortgage and credit XML documents. Personally identifiable
//! information lives in attribute values; this library finds those attributes
//! by name and structural context and overwrites their values with synthetic
//! data, leaving every other byte of structure intact.
//!
//! ## Modules
//!
//! * `document`: The mutable XML tree and its serializer.
//! * `parser`: The `DocumentParser` trait with strict and recovering strategies.
//! * `category`: The closed set of PII categories.
//! * `rules`: The ordered classification rule table.
//! * `generator`: Synthetic value generation per category.
//! * `rewriter`: In-place rewrite of a parsed document.
//! * `config`: Generator policy, parser and batch options (YAML).
//! * `engine`: The `Anonymizer` facade tying the pieces together.
//! * `batch`: Directory processing and its report.
//! * `headless`: One-shot wrappers using the default policy.
//! * `errors`: The `AnonymizerError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use mismo_anon_core::{Anonymizer, AnonymizerConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let anonymizer = Anonymizer::new(AnonymizerConfig::load_default()?)?;
//!     let input = r#"<BORROWER _FirstName="Jane" _SSN="123-45-6789" BorrowerID="B1"/>"#;
//!     let output = anonymizer.anonymize_str(input)?;
//!     assert!(output.contains(r#"BorrowerID="B1""#));
//!     assert!(!output.contains("Jane"));
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Document and batch operations return [`AnonymizerError`]. Configuration
//! loading returns `anyhow::Result` with context. Error messages carry offsets
//! and file names, never document content.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod batch;
pub mod category;
pub mod config;
pub mod document;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod headless;
pub mod parser;
pub mod rewriter;
pub mod rules;

/// Re-exports the configuration types and loaders.
pub use config::{
    config_candidate_paths, find_user_config, merge_config, AnonymizerConfig, BatchConfig,
    GeneratorPolicy, ParserConfig, MAX_HOUSE_NUMBER, MAX_NESTING_DEPTH,
};

pub use errors::AnonymizerError;

/// Re-exports the anonymization facade and its reports.
pub use engine::Anonymizer;
pub use batch::{BatchResult, BatchStatus, FileOutcome};
pub use rewriter::{rewrite_document, RewriteSummary, RewriteSummaryItem};

/// Re-exports the classification layer.
pub use category::PiiCategory;
pub use rules::{classify, Classification, ClassificationRule, RuleTable, MISMO_RULES};

pub use document::{Attribute, Document, Element, Node, XmlDeclaration};
pub use parser::{parser_for, repair_markup, DocumentParser, RecoveringParser, StrictParser};
pub use generator::SyntheticValueGenerator;

/// Re-exports the one-shot wrappers.
pub use headless::{anonymize_directory, anonymize_document};
