// mismo-anon/src/ui/output_format.rs
//! Status message formatting for stderr.
//!
//! Colors are applied only when the destination supports them; the caller
//! decides, usually with `is_terminal()`.

use owo_colors::OwoColorize;
use std::io::{self, Write};

fn print_message<W: Write>(
    writer: &mut W,
    label: &str,
    message: &str,
    supports_color: bool,
    paint: fn(&str) -> String,
) -> io::Result<()> {
    if supports_color {
        writeln!(writer, "{} {}", paint(label), message)
    } else {
        writeln!(writer, "{} {}", label, message)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[INFO]", message, supports_color, |s| s.cyan().to_string())
}

pub fn print_success_message<W: Write>(
    writer: &mut W,
    message: &str,
    supports_color: bool,
) -> io::Result<()> {
    print_message(writer, "[OK]", message, supports_color, |s| s.green().bold().to_string())
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[WARN]", message, supports_color, |s| s.yellow().to_string())
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, "[ERROR]", message, supports_color, |s| s.red().bold().to_string())
}
