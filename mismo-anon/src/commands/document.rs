// mismo-anon/src/commands/document.rs
//! `document` command: anonymize one document from a file or stdin.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Write};

use mismo_anon_core::{AnonymizerConfig, RewriteSummary};

use super::{build_anonymizer, info_msg, make_rng};
use crate::cli::DocumentCommand;
use crate::ui::replacement_summary;

pub fn run_document(args: &DocumentCommand, mut config: AnonymizerConfig, quiet: bool) -> Result<()> {
    info!("Starting document operation.");
    if args.strict {
        config.parser.recover = false;
    }
    let anonymizer = build_anonymizer(config)?;

    let raw = read_input(args)?;
    let mut rng = make_rng(args.seed);
    let (output, summary) = anonymizer
        .anonymize_document_with_rng(&raw, rng.as_mut())
        .context("Failed to anonymize document")?;
    debug!("Input {} bytes, output {} bytes.", raw.len(), output.len());

    match &args.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            if !quiet {
                info_msg(format!("Anonymized document written to {}", path.display()));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            writer.write_all(&output)?;
            if !output.ends_with(b"\n") {
                writeln!(writer)?;
            }
            writer.flush()?;
        }
    }

    if !args.no_summary && !quiet {
        print_summary(&summary)?;
    }
    info!("Document operation completed.");
    Ok(())
}

fn read_input(args: &DocumentCommand) -> Result<Vec<u8>> {
    match &args.input_file {
        Some(path) => {
            info!("Reading input from file: {}", path.display());
            fs::read(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            info!("Reading input from stdin...");
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_summary(summary: &RewriteSummary) -> Result<()> {
    let stderr = io::stderr();
    let supports_color = stderr.is_terminal();
    replacement_summary::print_summary(summary, &mut stderr.lock(), supports_color)?;
    Ok(())
}
