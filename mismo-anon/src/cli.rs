// mismo-anon/src/cli.rs
//! This file defines the command-line interface (CLI) for the mismo-anon application,
//! including all available commands and their arguments.
//! License: MIT OR APACHE 2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "mismo-anon",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replace PII in MISMO XML documents with synthetic values",
    long_about = "mismo-anon finds personally identifiable information in the attribute values of MISMO-style mortgage and credit XML documents and overwrites it with realistic synthetic data. Tags, attribute names, ordering and every non-PII value are left exactly as they were.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging for the mismo-anon crates
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a custom anonymizer configuration file (YAML).
    #[arg(
        long = "config",
        value_name = "FILE",
        global = true,
        env = "MISMO_ANON_CONFIG",
        help = "Path to a custom anonymizer configuration file (YAML)."
    )]
    pub config: Option<PathBuf>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `mismo-anon` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymizes one document read from a file or stdin.
    #[command(about = "Anonymizes one XML document read from a file or stdin.")]
    Document(DocumentCommand),

    /// Anonymizes XML passed inline as an argument.
    #[command(about = "Anonymizes XML text passed as an argument.")]
    Text(TextCommand),

    /// Anonymizes every XML file in a folder into its `anon` subfolder.
    #[command(about = "Anonymizes every XML file in a folder into its 'anon' subfolder.")]
    Folder(FolderCommand),

    /// Prints the classification rule table.
    #[command(about = "Prints the attribute classification rules.")]
    Rules,
}

/// Arguments for the `document` command.
#[derive(Parser, Debug)]
pub struct DocumentCommand {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Write anonymized output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Seed for reproducible synthetic values.
    #[arg(long, value_name = "N", help = "Seed the random generator for reproducible output.")]
    pub seed: Option<u64>,

    /// Fail on malformed markup instead of attempting repairs.
    #[arg(long, help = "Reject malformed input instead of repairing unescaped characters.")]
    pub strict: bool,

    /// Suppress the replacement summary.
    #[arg(long = "no-summary", help = "Suppress the replacement summary.")]
    pub no_summary: bool,
}

/// Arguments for the `text` command.
#[derive(Parser, Debug)]
pub struct TextCommand {
    /// The XML document to anonymize.
    #[arg(value_name = "XML")]
    pub xml: String,

    /// Seed for reproducible synthetic values.
    #[arg(long, value_name = "N", help = "Seed the random generator for reproducible output.")]
    pub seed: Option<u64>,
}

/// Arguments for the `folder` command.
#[derive(Parser, Debug)]
pub struct FolderCommand {
    /// Absolute path of the folder to process.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Seed for reproducible synthetic values.
    #[arg(long, value_name = "N", help = "Seed the random generator for reproducible output.")]
    pub seed: Option<u64>,

    /// Write the batch report to a JSON file instead of stdout.
    #[arg(long = "json-file", value_name = "FILE", help = "Write the batch report to a JSON file instead of stdout.")]
    pub json_file: Option<PathBuf>,
}
