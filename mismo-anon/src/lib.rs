// mismo-anon/src/lib.rs
//! # mismo-anon CLI Application
//!
//! Command-line front end for `mismo-anon-core`: anonymize a single document
//! from a file or stdin, inline XML text, or every XML file in a folder.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
