// mismo-anon/src/logger.rs
//! Logger setup for the CLI.
//!
//! `RUST_LOG` is honored; without it only warnings and errors are shown. An
//! explicit level applies to the mismo-anon crates, and `Off` silences
//! everything.

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

const CRATES: [&str; 2] = ["mismo_anon", "mismo_anon_core"];

/// Initializes the global logger. Calling it twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    match level {
        Some(LevelFilter::Off) => {
            builder.filter_level(LevelFilter::Off);
        }
        Some(level) => {
            for krate in CRATES {
                builder.filter_module(krate, level);
            }
        }
        None => {}
    }

    builder.format(|buf, record| {
        writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
    });

    let _ = builder.try_init();
}
