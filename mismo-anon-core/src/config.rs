//! Configuration management for `mismo-anon-core`.
//!
//! This module defines the generation policy (preset lists, constants and digit
//! counts), parser options and batch options. It handles YAML
//! deserialization and provides utilities for loading, merging and validating
//! configurations.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Deepest element nesting `parser.max_depth` may allow. Rewriting recurses
/// once per level.
pub const MAX_NESTING_DEPTH: usize = 4096;

/// House numbers are one to four digits.
pub const MAX_HOUSE_NUMBER: u32 = 9999;

/// Policy data consumed by the synthetic value generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorPolicy {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub creditor_names: Vec<String>,
    pub company_names: Vec<String>,
    pub street_name: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Area code used for phone and fax values (`555-XXX-XXXX`).
    pub phone_prefix: String,
    pub email_domain: String,
    pub min_age_years: u32,
    pub max_age_years: u32,
    /// Largest house number; house numbers are drawn from `1..=house_number_max`.
    pub house_number_max: u32,
    pub account_digits: usize,
    pub internal_account_digits: usize,
    pub lender_case_digits: usize,
    /// Largest numeric suffix for `user<N>` values.
    pub user_number_max: u32,
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self {
            first_names: Vec::new(),
            last_names: Vec::new(),
            creditor_names: Vec::new(),
            company_names: Vec::new(),
            street_name: "Main Street".to_string(),
            city: "Anytown".to_string(),
            state: "CA".to_string(),
            postal_code: "90001".to_string(),
            phone_prefix: "555".to_string(),
            email_domain: "example.com".to_string(),
            min_age_years: 30,
            max_age_years: 50,
            house_number_max: 9999,
            account_digits: 9,
            internal_account_digits: 4,
            lender_case_digits: 7,
            user_number_max: 999,
        }
    }
}

/// Options for turning raw input into a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    /// If true, escaping repairs are attempted when a strict parse fails.
    pub recover: bool,
    /// Maximum element nesting depth.
    pub max_depth: usize,
    /// Prepend an XML declaration to output when the input had none.
    pub emit_declaration: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            recover: true,
            max_depth: 256,
            emit_declaration: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// File extension (without the dot) of candidate documents.
    pub extension: String,
    /// Name of the subdirectory anonymized copies are written to.
    pub output_dir_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extension: "xml".to_string(),
            output_dir_name: "anon".to_string(),
        }
    }
}

/// Top-level configuration for the anonymizer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnonymizerConfig {
    pub generator: GeneratorPolicy,
    pub parser: ParserConfig,
    pub batch: BatchConfig,
}

impl AnonymizerConfig {
    /// Loads the built-in policy embedded at compile time.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default policy from embedded string...");
        let default_yaml = include_str!("../config/default_policy.yaml");
        let config: AnonymizerConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default policy")?;
        debug!(
            "Loaded default policy: {} first names, {} last names, {} creditors, {} companies.",
            config.generator.first_names.len(),
            config.generator.last_names.len(),
            config.generator.creditor_names.len(),
            config.generator.company_names.len()
        );
        Ok(config)
    }

    /// Loads a configuration from a YAML file and validates it.
    ///
    /// Fields missing from the file take their struct defaults; lists left
    /// empty are filled in by [`merge_config`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading anonymizer configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AnonymizerConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Checks every field and reports all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let g = &self.generator;

        for (field, list) in [
            ("first_names", &g.first_names),
            ("last_names", &g.last_names),
            ("creditor_names", &g.creditor_names),
            ("company_names", &g.company_names),
        ] {
            if list.is_empty() {
                errors.push(format!("`generator.{}` must not be empty.", field));
            } else if list.iter().any(|s| s.trim().is_empty()) {
                errors.push(format!("`generator.{}` contains a blank entry.", field));
            }
        }

        if g.min_age_years > g.max_age_years {
            errors.push(format!(
                "`generator.min_age_years` ({}) exceeds `generator.max_age_years` ({}).",
                g.min_age_years, g.max_age_years
            ));
        }
        if g.max_age_years > 150 {
            errors.push("`generator.max_age_years` must not exceed 150.".to_string());
        }
        for (field, value) in [
            ("account_digits", g.account_digits),
            ("internal_account_digits", g.internal_account_digits),
            ("lender_case_digits", g.lender_case_digits),
        ] {
            if value == 0 || value > 64 {
                errors.push(format!("`generator.{}` must be between 1 and 64.", field));
            }
        }
        if g.house_number_max == 0 || g.house_number_max > MAX_HOUSE_NUMBER {
            errors.push(format!(
                "`generator.house_number_max` must be between 1 and {}.",
                MAX_HOUSE_NUMBER
            ));
        }
        if g.user_number_max == 0 {
            errors.push("`generator.user_number_max` must be greater than 0.".to_string());
        }
        if g.phone_prefix.len() != 3 || !g.phone_prefix.chars().all(|c| c.is_ascii_digit()) {
            errors.push("`generator.phone_prefix` must be exactly three digits.".to_string());
        }
        for (field, value) in [
            ("street_name", &g.street_name),
            ("city", &g.city),
            ("state", &g.state),
            ("postal_code", &g.postal_code),
            ("email_domain", &g.email_domain),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("`generator.{}` must not be empty.", field));
            }
        }

        if self.parser.max_depth == 0 || self.parser.max_depth > MAX_NESTING_DEPTH {
            errors.push(format!(
                "`parser.max_depth` must be between 1 and {}.",
                MAX_NESTING_DEPTH
            ));
        }

        let ext = &self.batch.extension;
        if ext.is_empty() || ext.starts_with('.') {
            errors.push("`batch.extension` must be a bare extension such as 'xml'.".to_string());
        }
        let out = &self.batch.output_dir_name;
        if out.is_empty() || out.contains('/') || out.contains('\\') || out == "." || out == ".." {
            errors.push("`batch.output_dir_name` must be a single directory name.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed:\n{}", errors.join("\n")))
        }
    }
}

/// Overlays a user configuration on top of the defaults.
///
/// Non-empty user lists replace the default lists; scalar fields always come
/// from the user configuration, which already carries struct defaults for
/// anything the file omitted.
pub fn merge_config(
    default_config: AnonymizerConfig,
    user_config: Option<AnonymizerConfig>,
) -> AnonymizerConfig {
    let Some(user) = user_config else {
        debug!("No user configuration provided; using defaults.");
        return default_config;
    };

    let defaults = default_config.generator;
    let mut generator = user.generator;
    for (field, list, fallback) in [
        ("first_names", &mut generator.first_names, defaults.first_names),
        ("last_names", &mut generator.last_names, defaults.last_names),
        ("creditor_names", &mut generator.creditor_names, defaults.creditor_names),
        ("company_names", &mut generator.company_names, defaults.company_names),
    ] {
        if list.is_empty() {
            *list = fallback;
        } else {
            debug!("Overriding `{}` with {} user entries.", field, list.len());
        }
    }

    AnonymizerConfig {
        generator,
        parser: user.parser,
        batch: user.batch,
    }
}

/// Locations searched for a user configuration, in priority order.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let candidates = vec![
        dirs::home_dir().map(|p| p.join(".mismo-anon").join("config.yaml")),
        dirs::config_dir().map(|p| p.join("mismo-anon").join("config.yaml")),
        Some(PathBuf::from("./mismo-anon.yaml")),
    ];
    candidates.into_iter().flatten().collect()
}

/// Returns the first candidate configuration file that exists.
pub fn find_user_config() -> Option<PathBuf> {
    config_candidate_paths().into_iter().find(|p| p.is_file())
}
