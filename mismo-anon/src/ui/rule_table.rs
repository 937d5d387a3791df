// mismo-anon/src/ui/rule_table.rs
//! Renders the classification rules in evaluation order.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use mismo_anon_core::{ClassificationRule, RuleTable};
use std::io::{self, Write};

fn context(rule: &ClassificationRule) -> String {
    match (rule.ancestor, rule.sibling) {
        (Some(tag), _) => format!("inside <{}>", tag),
        (None, Some(guard)) => format!("{} = {}", guard.attribute, guard.values.join(" | ")),
        (None, None) => "any element".to_string(),
    }
}

pub fn print_rules<W: Write>(rules: &RuleTable, writer: &mut W) -> io::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Attribute", "Context", "Category"]);

    for (index, rule) in rules.rules().iter().enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            rule.attribute.to_string(),
            context(rule),
            rule.category.to_string(),
        ]);
    }

    writeln!(writer, "{}", table)?;
    writeln!(writer, "Rules are evaluated top to bottom; the first match wins.")
}
