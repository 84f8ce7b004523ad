// src/report.rs

//! Terminal colors and the end-of-run summary.

use crate::config::DisplayOptions;
use crate::engine::RunReport;
use std::io::{IsTerminal, Write};

pub const GREEN: &str = "38;5;2";
pub const RED: &str = "38;5;1";
pub const YELLOW: &str = "38;5;11";

pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("\x1b[{}m{}\x1b[0m", color, text)
    } else {
        text.to_string()
    }
}

/// Summary printed after a batch run.
///
/// Cases without an expected output are listed on their own so "no oracle"
/// is never confused with "wrong answer".
pub fn write_summary<W: Write>(
    out: &mut W,
    report: &RunReport,
    display: DisplayOptions,
    use_color: bool,
) -> std::io::Result<()> {
    if display.verbose {
        writeln!(
            out,
            "\npassed: {}  failed: {}  timed out: {}",
            report.passed(),
            report.failed(),
            report.timed_out()
        )?;
    }

    let no_solution = report.no_solution();
    if no_solution.is_empty() {
        return Ok(());
    }

    writeln!(out, "{}", paint("\nNo solutions were found for:", RED, use_color))?;
    for label in no_solution {
        writeln!(out, "{}", paint(&format!("  {}", label), RED, use_color))?;
    }
    writeln!(out)?;

    if !display.show_output {
        writeln!(out, "Done. Use the -o flag to see program output(s)")?;
    }

    Ok(())
}
