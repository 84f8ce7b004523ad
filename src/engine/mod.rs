pub mod compare;
pub mod discover;
pub mod events;
pub mod execute;
pub mod run;
pub mod sink;
pub mod validate;

pub use compare::Verdict;
pub use execute::ExecutionResult;
pub use validate::{load_config, validate_cli, Validated};

/* ---------------- case output ---------------- */

/// Outcome of one executed test case.
#[derive(Debug, Clone)]
pub struct CaseReport {
    /// 1-based position in the run
    pub number: usize,
    /// `<group>/<case>`, `<case>`, or the program for output-only runs
    pub label: String,
    /// Command line used for the execution
    pub command: String,
    pub verdict: Verdict,
    pub result: ExecutionResult,
    /// Expected bytes, when an oracle exists
    pub expected: Option<Vec<u8>>,
}

impl CaseReport {
    /// Output to show next to the verdict.
    ///
    /// With an oracle this is the stdout that was compared; otherwise stderr
    /// wins when the program wrote any.
    pub fn shown_output(&self) -> &[u8] {
        match self.expected {
            Some(_) => &self.result.stdout,
            None => self.result.effective_output(),
        }
    }
}

/* ---------------- run output ---------------- */

/// Everything a run produced, in execution order.
///
/// Returned to the caller, which prints the end-of-run summary.
#[derive(Debug, Default)]
pub struct RunReport {
    pub cases: Vec<CaseReport>,
    /// File arguments that did not exist (single-case mode)
    pub missing: Vec<String>,
}

impl RunReport {
    fn count(&self, verdict: Verdict) -> usize {
        self.cases.iter().filter(|c| c.verdict == verdict).count()
    }

    pub fn passed(&self) -> usize {
        self.count(Verdict::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(Verdict::Failed)
    }

    pub fn timed_out(&self) -> usize {
        self.count(Verdict::TimedOut)
    }

    /// Labels of cases that had no expected output.
    pub fn no_solution(&self) -> Vec<&str> {
        self.cases
            .iter()
            .filter(|c| c.verdict == Verdict::NoSolution)
            .map(|c| c.label.as_str())
            .collect()
    }
}

/* ---------------- validation ---------------- */

#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn push_error(&mut self, code: &'static str, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            code,
            message: message.into(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.valid && self.errors.is_empty()
    }

    #[cfg(test)]
    pub fn has(&self, code: &str) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }
}
