//! Output comparison and case classification.
//!
//! The default is a literal byte comparison: trailing whitespace and line
//! ending differences count as failures. `Normalized` is opt-in.

use crate::engine::ExecutionResult;
use clap::ValueEnum;
use serde::Deserialize;

/// How captured stdout is compared with the expected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Byte-for-byte equality
    #[default]
    Strict,

    /// CRLF folded to LF, trailing whitespace and trailing blank lines ignored
    Normalized,
}

/// Classification of a single executed case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
    /// No expected output exists; neither a pass nor a failure
    NoSolution,
    TimedOut,
}

/// Classify an execution against its optional oracle.
pub fn classify(result: &ExecutionResult, expected: Option<&[u8]>, mode: CompareMode) -> Verdict {
    if result.timed_out {
        return Verdict::TimedOut;
    }

    match expected {
        Some(expected) if outputs_match(&result.stdout, expected, mode) => Verdict::Passed,
        Some(_) => Verdict::Failed,
        None => Verdict::NoSolution,
    }
}

pub fn outputs_match(actual: &[u8], expected: &[u8], mode: CompareMode) -> bool {
    match mode {
        CompareMode::Strict => actual == expected,
        CompareMode::Normalized => normalize(actual) == normalize(expected),
    }
}

fn normalize(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());

    for line in bytes.split(|&b| b == b'\n') {
        let end = line
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        out.extend_from_slice(&line[..end]);
        out.push(b'\n');
    }

    while out.last() == Some(&b'\n') {
        out.pop();
    }

    out
}
