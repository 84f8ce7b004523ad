use crate::config::DisplayOptions;
use crate::engine::events::CaseEvent;
use crate::engine::sink::EventSink;
use crate::engine::{CaseReport, Verdict};
use crate::report::{paint, GREEN, RED, YELLOW};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Prints each case to the terminal as it runs.
///
/// test 1: (./prog <group/case1); Test passed!
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    display: DisplayOptions,
    feed_stdin: bool,
    use_color: bool,
    output_only: bool,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout(display: DisplayOptions, feed_stdin: bool, use_color: bool) -> Self {
        Self::new(std::io::stdout(), display, feed_stdin, use_color)
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W, display: DisplayOptions, feed_stdin: bool, use_color: bool) -> Self {
        Self {
            out,
            display,
            feed_stdin,
            use_color,
            output_only: false,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn verdict_line(&self, verdict: Verdict) -> String {
        match verdict {
            Verdict::Passed => paint("Test passed!", GREEN, self.use_color),
            Verdict::Failed => paint("Test failed.", RED, self.use_color),
            Verdict::NoSolution => "..".to_string(),
            Verdict::TimedOut => "timed out".to_string(),
        }
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", paint(text, YELLOW, self.use_color))?;
        Ok(())
    }

    fn block(&mut self, bytes: &[u8]) -> Result<()> {
        writeln!(self.out, "\n{}", String::from_utf8_lossy(bytes))?;
        Ok(())
    }

    fn finished(&mut self, report: &CaseReport) -> Result<()> {
        writeln!(self.out, "{}", self.verdict_line(report.verdict))?;

        if report.verdict != Verdict::TimedOut {
            let output = report.shown_output();

            match &report.expected {
                Some(expected) if self.display.show_output => {
                    self.heading(&format!("\nProgram output ({}):", report.label))?;
                    self.block(output)?;
                    self.heading(&format!("Expected solution ({}):", report.label))?;
                    self.block(expected)?;
                }
                None if self.output_only
                    || (self.display.show_output
                        && (self.display.verbose || !self.feed_stdin)) =>
                {
                    self.heading(&format!("\nProgram output ({}):", report.label))?;
                    self.block(output)?;
                }
                _ => {}
            }
        }

        if self.display.verbose {
            let memory = report
                .result
                .max_rss_kb
                .map(|kb| format!("{}kb", kb))
                .unwrap_or_else(|| "n/a".to_string());
            writeln!(
                self.out,
                "time: {}ms  memory: {}",
                report.result.elapsed.as_millis(),
                memory
            )?;
        }

        Ok(())
    }
}

impl<W: Write + Send> EventSink for ConsoleSink<W> {
    fn emit(&mut self, event: &CaseEvent) -> Result<()> {
        match event {
            CaseEvent::CaseStarted {
                number,
                label,
                command,
                output_only,
            } => {
                self.output_only = *output_only;
                if *output_only {
                    write!(self.out, "{}; ", command)?;
                } else {
                    write!(self.out, "test {}: ({} <{}); ", number, command, label)?;
                }
                // Verdict lands on the same line once the program exits
                self.out.flush()?;
            }
            CaseEvent::CaseFinished(report) => self.finished(report)?,
            CaseEvent::FileMissing { number, path } => {
                tracing::debug!(number, path = %path, "test file missing");
                let name = Path::new(path)
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.clone());
                writeln!(self.out, "file '{}' not found in current directory.", name)?;
            }
        }
        Ok(())
    }
}
