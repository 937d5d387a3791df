// mismo-anon/src/commands/folder.rs
//! `folder` command: batch-anonymize a directory and report as JSON.

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, Write};

use mismo_anon_core::{AnonymizerConfig, BatchResult, BatchStatus};

use super::{build_anonymizer, info_msg, make_rng, success_msg, warn_msg};
use crate::cli::FolderCommand;

pub fn run_folder(args: &FolderCommand, config: AnonymizerConfig, quiet: bool) -> Result<()> {
    let anonymizer = build_anonymizer(config)?;
    let mut rng = make_rng(args.seed);
    let result = anonymizer
        .anonymize_directory_with_rng(&args.path, rng.as_mut())
        .context("Folder anonymization failed")?;

    let json = serde_json::to_string_pretty(&result).context("Failed to serialize batch report")?;
    match &args.json_file {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write report file: {}", path.display()))?;
            info!("Batch report written to {}", path.display());
            if !quiet {
                info_msg(format!("Batch report written to {}", path.display()));
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    if !quiet {
        report_status(&result);
    }
    Ok(())
}

fn report_status(result: &BatchResult) {
    match result.status {
        BatchStatus::Success => success_msg(&result.message),
        BatchStatus::PartialSuccess | BatchStatus::Failed => warn_msg(&result.message),
    }
}
