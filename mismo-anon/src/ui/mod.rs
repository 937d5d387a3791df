// mismo-anon/src/ui/mod.rs
//! Terminal output helpers: colored status messages and summary tables.

pub mod output_format;
pub mod replacement_summary;
pub mod rule_table;
