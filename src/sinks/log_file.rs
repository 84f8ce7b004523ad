use crate::engine::events::CaseEvent;
use crate::engine::sink::EventSink;
use crate::engine::Verdict;
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%d %B %Y %H:%M:%S";

/// Copy mode: one log file for the whole run.
///
/// Truncated when the run starts and given a single timestamp header, then
/// one block per executed case:
///
/// Autotest run; 19 October 2026 14:02:11
///
/// ./prog group/case1
/// <program output>
pub struct LogFileSink {
    path: PathBuf,
    file: File,
}

impl LogFileSink {
    pub fn create(path: &Path) -> Result<Self> {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create log file {:?}", path))?;

        writeln!(file, "Autotest run; {}", Local::now().format(DATE_FORMAT))
            .and_then(|_| writeln!(file))
            .with_context(|| format!("Failed to write log file {:?}", path))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    fn append_case(&mut self, command: &str, label: &str, output: &[u8]) -> std::io::Result<()> {
        writeln!(self.file, "{} {}", command, label)?;
        self.file.write_all(output)?;
        writeln!(self.file)
    }
}

impl EventSink for LogFileSink {
    fn emit(&mut self, event: &CaseEvent) -> Result<()> {
        let CaseEvent::CaseFinished(report) = event else {
            return Ok(());
        };

        let output: &[u8] = if report.verdict == Verdict::TimedOut {
            b"timed out"
        } else {
            report.shown_output()
        };

        tracing::trace!(number = report.number, path = %self.path.display(), "case logged");
        self.append_case(&report.command, &report.label, output)
            .with_context(|| format!("Failed to write log file {:?}", self.path))
    }
}
