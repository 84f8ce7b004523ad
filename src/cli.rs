// src/cli.rs

use crate::engine::compare::CompareMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Autotesting tool for rust, python and c programs.
///
/// `autotest.yaml` (optional) provides defaults.
/// CLI flags override config values.
#[derive(Parser, Debug, Clone)]
#[command(name = "autotest", version)]
pub struct Cli {
    /// Set filetype for autotest
    ///
    /// r  = build and run the current cargo project
    /// py = run a python script through the interpreter
    /// c  = run a compiled native binary
    #[arg(short = 'f', long = "file", value_enum)]
    pub filetype: Option<Filetype>,

    /// Feed each test file to the program as standard input
    #[arg(short, long)]
    pub input: bool,

    /// Display program output
    #[arg(short, long)]
    pub output: bool,

    /// Display all output (plus timing and memory)
    #[arg(short, long)]
    pub verbose: bool,

    /// Copy output to the log file (p.out by default)
    #[arg(short, long)]
    pub copy: bool,

    /// Execute the tests in the `tests` folder
    #[arg(short = 't', long)]
    pub testcases: bool,

    /// Only run the named group(s) or file(s) (can be passed multiple times)
    #[arg(short = 'F', long = "filter", value_name = "FOLDER")]
    pub filter: Vec<String>,

    /// Set a custom timeout in seconds
    #[arg(short = 'T', long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output comparison mode
    ///
    /// Overrides config `compare`.
    #[arg(long, value_enum)]
    pub compare: Option<CompareMode>,

    /// Path to config file
    ///
    /// Defaults to ./autotest.yaml (optional unless passed explicitly)
    #[arg(long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// <program> [args | test files...]
    #[arg(trailing_var_arg = true)]
    pub positional_args: Vec<String>,
}

pub const DEFAULT_CONFIG: &str = "autotest.yaml";

/// Kind of program under test.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filetype {
    /// Build-then-run target (`cargo run` in the working directory)
    #[value(name = "r")]
    Rust,

    /// Interpreted python script
    #[value(name = "py")]
    Python,

    /// Compiled native binary
    #[value(name = "c")]
    C,
}

impl Filetype {
    /// Extension the program argument must carry, if any.
    pub fn expected_extension(self) -> Option<&'static str> {
        match self {
            Filetype::Python => Some("py"),
            Filetype::Rust | Filetype::C => None,
        }
    }

    /// Whether the first positional argument names the program.
    pub fn takes_program_arg(self) -> bool {
        !matches!(self, Filetype::Rust)
    }
}
