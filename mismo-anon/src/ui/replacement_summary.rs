// mismo-anon/src/ui/replacement_summary.rs
//! Renders a [`RewriteSummary`] as a table. Only counts are shown.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use mismo_anon_core::RewriteSummary;
use std::io::{self, Write};

pub fn print_summary<W: Write>(
    summary: &RewriteSummary,
    writer: &mut W,
    supports_color: bool,
) -> io::Result<()> {
    if summary.is_empty() {
        return writeln!(writer, "No PII attributes found.");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Category", "Attribute", "Occurrences"]);
    if !supports_color {
        table.force_no_tty();
    }

    for item in &summary.items {
        let category = if supports_color {
            Cell::new(item.category).fg(Color::Cyan)
        } else {
            Cell::new(item.category)
        };
        table.add_row(vec![category, Cell::new(&item.attribute), Cell::new(item.occurrences)]);
    }

    writeln!(writer, "Replacement Summary:")?;
    writeln!(writer, "{}", table)?;
    writeln!(writer, "Total: {} value(s) replaced", summary.total())
}
