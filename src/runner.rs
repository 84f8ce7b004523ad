// src/runner.rs

use crate::cli::Cli;
use crate::config::{Config, RunConfig, RunMode};
use crate::engine::run::{run_batch, run_files, run_output_only};
use crate::engine::sink::EventSink;
use crate::engine::{load_config, validate_cli, ValidationResult, Validated};
use crate::report::{paint, should_use_color, write_summary, GREEN};
use crate::sinks::{console::ConsoleSink, fanout::FanoutSink, log_file::LogFileSink};

use anyhow::{Context, Result};
use clap::CommandFactory;
use std::process::ExitCode;

/// Exit code for invocations rejected before anything ran.
const EXIT_INVALID: u8 = 2;

/// Entry point from `main.rs`.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Unable to resolve working directory")?;

    let file_cfg: Config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(validation) => return Ok(reject(&validation)),
    };

    match validate_cli(&cli, &file_cfg, &cwd) {
        Validated::Help => {
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
        Validated::Invalid(validation) => Ok(reject(&validation)),
        Validated::Ready(cfg) => {
            execute(&cfg).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn reject(validation: &ValidationResult) -> ExitCode {
    for error in &validation.errors {
        tracing::debug!(code = error.code, "validation failed");
        eprintln!("autotest: {}", error.message);
    }
    ExitCode::from(EXIT_INVALID)
}

/* ---------------- core execution ---------------- */

async fn execute(cfg: &RunConfig) -> Result<()> {
    let use_color = should_use_color();

    let mut sinks: Vec<Box<dyn EventSink>> = vec![Box::new(ConsoleSink::stdout(
        cfg.display,
        cfg.feed_stdin,
        use_color,
    ))];
    if let Some(path) = &cfg.log_file {
        sinks.push(Box::new(LogFileSink::create(path)?));
    }
    let mut sink = FanoutSink::new(sinks);

    let report = match &cfg.mode {
        RunMode::Batch { filters } => {
            if !cfg.solutions_root.is_dir() {
                println!("Missing solutions folder. Running tests with outputs only...");
            }
            if !filters.is_empty() {
                let names: Vec<&str> = filters.iter().map(String::as_str).collect();
                println!("filter: {}", names.join(", "));
            }

            let report = run_batch(cfg, filters, &mut sink).await?;
            write_summary(&mut std::io::stdout(), &report, cfg.display, use_color)?;
            report
        }
        RunMode::Files(paths) => run_files(cfg, paths, &mut sink).await?,
        RunMode::OutputOnly => {
            println!(
                "running '{}' with commandline inputs: {}",
                cfg.invocation.program,
                paint(&cfg.invocation.args.join(" "), GREEN, use_color)
            );
            run_output_only(cfg, &mut sink).await?
        }
    };

    tracing::info!(
        cases = report.cases.len(),
        passed = report.passed(),
        failed = report.failed(),
        timed_out = report.timed_out(),
        no_solution = report.no_solution().len(),
        missing = report.missing.len(),
        "run complete"
    );

    if let Some(path) = &cfg.log_file {
        println!("\nprogram outputs written to '{}'", crate::util::file_name(path));
    }

    Ok(())
}
