//! Turns raw command-line input into a `RunConfig`.
//!
//! All checks happen here, before any process is spawned.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Cli, Filetype, DEFAULT_CONFIG};
use crate::config::{Config, DisplayOptions, Invocation, RunConfig, RunMode};
use crate::engine::ValidationResult;

/// Outcome of validating the command line.
#[derive(Debug)]
pub enum Validated {
    Ready(RunConfig),
    /// Nothing actionable was supplied
    Help,
    Invalid(ValidationResult),
}

/// Validate `cli` against `file` defaults, resolving paths against `cwd`.
pub fn validate_cli(cli: &Cli, file: &Config, cwd: &Path) -> Validated {
    if cli.positional_args.is_empty() && !(cli.testcases || cli.input || cli.output) {
        return Validated::Help;
    }

    let mut result = ValidationResult::ok();
    let tests_root = cwd.join(&file.tests_dir);

    validate_config_path(cli, &mut result);
    validate_mode(cli, &tests_root, &mut result);

    if !result.is_valid() {
        return Validated::Invalid(result);
    }

    let takes_program = cli.filetype.map_or(true, Filetype::takes_program_arg);
    if takes_program && cli.positional_args.is_empty() {
        return Validated::Help;
    }

    let (program, rest) = if takes_program {
        (
            Some(cli.positional_args[0].as_str()),
            &cli.positional_args[1..],
        )
    } else {
        (None, &cli.positional_args[..])
    };

    if let Some(program) = program {
        validate_program(cli.filetype, program, cwd, &mut result);
    }
    validate_inputs(cli, rest, &mut result);
    validate_timeout(cli, file, &mut result);

    if !result.is_valid() {
        return Validated::Invalid(result);
    }

    if !cli.filter.is_empty() && !cli.testcases {
        tracing::warn!("--filter only applies with -t; ignored");
    }

    let (mode, extra_args) = if cli.testcases {
        let filters: BTreeSet<String> = cli.filter.iter().cloned().collect();
        (RunMode::Batch { filters }, rest.to_vec())
    } else if cli.input {
        (
            RunMode::Files(rest.iter().map(PathBuf::from).collect()),
            Vec::new(),
        )
    } else {
        (RunMode::OutputOnly, rest.to_vec())
    };

    Validated::Ready(RunConfig {
        invocation: resolve_invocation(cli.filetype, program, extra_args, file),
        mode,
        feed_stdin: cli.input,
        timeout: Duration::from_secs(cli.timeout.unwrap_or(file.timeout_secs)),
        compare: cli.compare.unwrap_or(file.compare),
        display: DisplayOptions {
            show_output: cli.output,
            verbose: cli.verbose,
        },
        log_file: cli.copy.then(|| cwd.join(&file.log_file)),
        tests_root,
        solutions_root: cwd.join(&file.solutions_dir),
        env: file.env.clone(),
    })
}

/// Build the command line for the program under test.
///
/// r  → cargo run --quiet [args]
/// py → python3 prog.py [args]
/// c  → ./prog [args]
pub fn resolve_invocation(
    filetype: Option<Filetype>,
    program: Option<&str>,
    extra_args: Vec<String>,
    file: &Config,
) -> Invocation {
    let program = program.unwrap_or_default();

    match filetype {
        Some(Filetype::Rust) => Invocation {
            program: file.runtime.cargo.clone(),
            args: file
                .runtime
                .cargo_args
                .iter()
                .cloned()
                .chain(extra_args)
                .collect(),
        },
        Some(Filetype::Python) => Invocation {
            program: file.runtime.python.clone(),
            args: std::iter::once(program.to_string())
                .chain(extra_args)
                .collect(),
        },
        Some(Filetype::C) | None => Invocation {
            program: native_path(program),
            args: extra_args,
        },
    }
}

/// Bare names are run from the working directory, not looked up in PATH.
fn native_path(program: &str) -> String {
    if program.contains('/') {
        program.to_string()
    } else {
        format!("./{}", program)
    }
}

/* ---------------- config ---------------- */

/// Load the config file at `path`.
///
/// A missing file yields defaults; an explicit path that does not exist is
/// reported by `validate_cli`. Unreadable or malformed YAML is a validation
/// error like any other.
pub fn load_config(path: &Path) -> Result<Config, ValidationResult> {
    if !path.is_file() {
        return Ok(Config::default());
    }

    Config::load(path).map_err(|err| {
        let mut result = ValidationResult::ok();
        result.push_error(
            "CONFIG_INVALID",
            format!("invalid config file {}: {:#}", path.display(), err),
        );
        result
    })
}

fn validate_config_path(cli: &Cli, result: &mut ValidationResult) {
    if cli.config != Path::new(DEFAULT_CONFIG) && !cli.config.is_file() {
        result.push_error(
            "CONFIG_NOT_FOUND",
            format!("config file not found: {}", cli.config.display()),
        );
    }
}

/* ---------------- mode ---------------- */

fn validate_mode(cli: &Cli, tests_root: &Path, result: &mut ValidationResult) {
    if cli.testcases && !tests_root.is_dir() {
        result.push_error(
            "TESTS_DIR_MISSING",
            "the -t flag requires a 'tests' directory.",
        );
    }

    if !cli.testcases && !(cli.input || cli.output) {
        result.push_error(
            "INPUT_REQUIRED",
            "running programs without input require the use of the -o flag.",
        );
    }
}

/* ---------------- program ---------------- */

fn validate_program(
    filetype: Option<Filetype>,
    program: &str,
    cwd: &Path,
    result: &mut ValidationResult,
) {
    if !cwd.join(program).is_file() {
        result.push_error("PROGRAM_MISSING", "missing program file");
        return;
    }

    if let Some(expected) = filetype.and_then(Filetype::expected_extension) {
        let ext = Path::new(program)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if ext != expected {
            result.push_error("FILETYPE_MISMATCH", "Invalid program filetype provided");
        }
    }
}

/* ---------------- inputs ---------------- */

fn validate_inputs(cli: &Cli, rest: &[String], result: &mut ValidationResult) {
    if cli.input && !cli.testcases && rest.is_empty() {
        result.push_error("TESTS_MISSING", "expected inputs <list [ files... ]>");
    }
}

/* ---------------- timeout ---------------- */

fn validate_timeout(cli: &Cli, file: &Config, result: &mut ValidationResult) {
    if cli.timeout.unwrap_or(file.timeout_secs) == 0 {
        result.push_error("TIMEOUT_INVALID", "timeout must be greater than zero");
    }
}
