// mismo-anon/src/commands/text.rs
//! `text` command: anonymize XML given on the command line.

use anyhow::{Context, Result};
use std::io::{self, Write};

use mismo_anon_core::AnonymizerConfig;

use super::{build_anonymizer, make_rng};
use crate::cli::TextCommand;

pub fn run_text(args: &TextCommand, config: AnonymizerConfig) -> Result<()> {
    let anonymizer = build_anonymizer(config)?;
    let mut rng = make_rng(args.seed);
    let (output, _) = anonymizer
        .anonymize_document_with_rng(args.xml.as_bytes(), rng.as_mut())
        .context("Failed to anonymize text")?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&output)?;
    if !output.ends_with(b"\n") {
        writeln!(stdout)?;
    }
    Ok(())
}
