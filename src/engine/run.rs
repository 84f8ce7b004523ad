use anyhow::Result;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::{
    config::RunConfig,
    engine::{
        compare::classify,
        discover::{case_for_path, discover, TestCase},
        events::CaseEvent,
        execute::execute,
        sink::EventSink,
        CaseReport, RunReport,
    },
    util::read_bytes,
};

/// Run every case under the tests root, one at a time, in discovery order.
pub async fn run_batch(
    cfg: &RunConfig,
    filters: &BTreeSet<String>,
    sink: &mut dyn EventSink,
) -> Result<RunReport> {
    let cases = discover(&cfg.tests_root, &cfg.solutions_root, filters)?;
    let mut report = RunReport::default();

    for (idx, case) in cases.iter().enumerate() {
        let case_report = run_case(cfg, idx + 1, case, sink).await?;
        report.cases.push(case_report);
    }

    Ok(report)
}

/// Single-case mode: run each file argument, numbered by argument order.
///
/// Missing files are reported and skipped; the rest still run.
pub async fn run_files(
    cfg: &RunConfig,
    paths: &[PathBuf],
    sink: &mut dyn EventSink,
) -> Result<RunReport> {
    let mut report = RunReport::default();

    for (idx, path) in paths.iter().enumerate() {
        let number = idx + 1;

        if !path.is_file() {
            let path = path.display().to_string();
            sink.emit(&CaseEvent::FileMissing {
                number,
                path: path.clone(),
            })?;
            report.missing.push(path);
            continue;
        }

        let case = case_for_path(path, &cfg.tests_root, &cfg.solutions_root);
        let case_report = run_case(cfg, number, &case, sink).await?;
        report.cases.push(case_report);
    }

    Ok(report)
}

/// Run the program once with its command-line arguments and no test file.
pub async fn run_output_only(cfg: &RunConfig, sink: &mut dyn EventSink) -> Result<RunReport> {
    let command = cfg.invocation.display();
    let label = cfg.invocation.program.clone();

    sink.emit(&CaseEvent::CaseStarted {
        number: 1,
        label: label.clone(),
        command: command.clone(),
        output_only: true,
    })?;

    let result = execute(
        &cfg.invocation,
        None,
        cfg.timeout,
        &cfg.env,
        cfg.display.verbose,
    )
    .await?;
    let verdict = classify(&result, None, cfg.compare);

    let case_report = CaseReport {
        number: 1,
        label,
        command,
        verdict,
        result,
        expected: None,
    };
    sink.emit(&CaseEvent::CaseFinished(case_report.clone()))?;

    Ok(RunReport {
        cases: vec![case_report],
        missing: Vec::new(),
    })
}

async fn run_case(
    cfg: &RunConfig,
    number: usize,
    case: &TestCase,
    sink: &mut dyn EventSink,
) -> Result<CaseReport> {
    let command = cfg.invocation.display();

    sink.emit(&CaseEvent::CaseStarted {
        number,
        label: case.label.clone(),
        command: command.clone(),
        output_only: false,
    })?;

    let stdin = cfg.feed_stdin.then_some(case.path.as_path());
    let result = execute(
        &cfg.invocation,
        stdin,
        cfg.timeout,
        &cfg.env,
        cfg.display.verbose,
    )
    .await?;

    let expected = case.expected.as_deref().map(read_bytes).transpose()?;
    let verdict = classify(&result, expected.as_deref(), cfg.compare);

    tracing::debug!(
        number,
        case = %case.label,
        ?verdict,
        exit_ok = result.success,
        "case finished"
    );

    let case_report = CaseReport {
        number,
        label: case.label.clone(),
        command,
        verdict,
        result,
        expected,
    };
    sink.emit(&CaseEvent::CaseFinished(case_report.clone()))?;

    Ok(case_report)
}
