// mismo-anon/src/commands/rules.rs
//! `rules` command: print the classification rule table.

use anyhow::Result;
use std::io;

use mismo_anon_core::RuleTable;

use crate::ui::rule_table;

pub fn run_rules() -> Result<()> {
    rule_table::print_rules(&RuleTable::mismo(), &mut io::stdout().lock())?;
    Ok(())
}
