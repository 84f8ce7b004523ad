// src/main.rs

//! autotest
//!
//! Entry point for the autotest CLI.
//!
//! This binary runs a program against test inputs and compares its output
//! with expected solutions. It delegates all real work to the `runner` module.
//!
//! Responsibilities of this file:
//! - Parse CLI arguments
//! - Initialise logging and the async runtime
//! - Abort silently on Ctrl-C
//!
//! There is intentionally *no business logic* here.

mod cli;
mod config;
mod engine;
mod metrics;
mod report;
mod runner;
mod sinks;
mod util;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Program entry point.
///
/// Uses Tokio because each test case spawns and waits on a child process
/// with a timeout.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    // Parse CLI arguments (mode / flags / positional args)
    let cli = cli::Cli::parse();

    // Dropping the run future kills the current child (kill_on_drop)
    tokio::select! {
        res = runner::run(cli) => res,
        _ = tokio::signal::ctrl_c() => Ok(ExitCode::from(130)),
    }
}

/// Diagnostics go to stderr so the test report on stdout stays clean.
///
/// Controlled with `AUTOTEST_LOG`, e.g. `AUTOTEST_LOG=autotest=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("AUTOTEST_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
