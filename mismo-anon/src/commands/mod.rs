// mismo-anon/src/commands/mod.rs
//! Subcommand implementations and the helpers they share.

pub mod document;
pub mod folder;
pub mod rules;
pub mod text;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io;
use std::path::Path;

use mismo_anon_core::{config, merge_config, Anonymizer, AnonymizerConfig};

use crate::ui::output_format;

/// Loads the embedded policy and overlays the user file, if any.
///
/// An explicit `path` must exist; otherwise the first existing candidate
/// location is used.
pub fn load_config(path: Option<&Path>) -> Result<AnonymizerConfig> {
    let defaults = AnonymizerConfig::load_default()?;
    let user_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => config::find_user_config(),
    };
    let user = match user_path {
        Some(p) => {
            info!("Using configuration file {}", p.display());
            Some(AnonymizerConfig::load_from_file(&p)?)
        }
        None => {
            debug!("No user configuration found; using the embedded policy.");
            None
        }
    };
    Ok(merge_config(defaults, user))
}

pub fn build_anonymizer(config: AnonymizerConfig) -> Result<Anonymizer> {
    Anonymizer::new(config).context("Failed to initialize the anonymizer")
}

/// A seeded generator when `seed` is given, the thread-local one otherwise.
pub fn make_rng(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => {
            debug!("Using seeded random generator.");
            Box::new(StdRng::seed_from_u64(seed))
        }
        None => Box::new(rand::rng()),
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), supports_color);
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>) {
    let supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), supports_color);
}
