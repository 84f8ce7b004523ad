use crate::engine::CaseReport;

/// Progress of a run, delivered to sinks in execution order.
#[derive(Debug, Clone)]
pub enum CaseEvent {
    /// A case is about to execute.
    CaseStarted {
        number: usize,
        label: String,
        command: String,
        /// No test file is involved (output-only run)
        output_only: bool,
    },

    /// A case finished (passed, failed, timed out or had no solution).
    CaseFinished(CaseReport),

    /// A file argument did not exist and was skipped.
    FileMissing { number: usize, path: String },
}
