// mismo-anon/src/main.rs
//! mismo-anon entry point.
//!
//! Parses arguments, initializes logging, resolves configuration and runs the
//! selected command. Errors are reported on stderr with a non-zero exit code.

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use mismo_anon::cli::{Cli, Commands};
use mismo_anon::commands::{self, document, folder, rules, text};
use mismo_anon::logger;

fn main() {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(LevelFilter::Off)
    } else if cli.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);
    info!("mismo-anon started. Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        commands::error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Rules => rules::run_rules(),
        Commands::Document(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            document::run_document(args, config, cli.quiet)
        }
        Commands::Text(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            text::run_text(args, config)
        }
        Commands::Folder(args) => {
            let config = commands::load_config(cli.config.as_deref())?;
            folder::run_folder(args, config, cli.quiet)
        }
    }
}
