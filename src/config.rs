// src/config.rs

use crate::engine::compare::CompareMode;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Root configuration loaded from `autotest.yaml`.
///
/// Every field is optional. This file controls:
/// - The default per-execution timeout
/// - Where tests and expected solutions live
/// - Which python / cargo binaries to use
/// - Environment variables injected into the program under test
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timeout for a single execution, in seconds
    pub timeout_secs: u64,

    /// Output comparison mode (strict | normalized)
    pub compare: CompareMode,

    /// Log file written in copy mode
    pub log_file: String,

    /// Directory holding the test inputs
    pub tests_dir: String,

    /// Directory mirroring `tests_dir` with expected outputs
    pub solutions_dir: String,

    /// Runtime binaries
    pub runtime: Runtime,

    /// Environment variables injected into the program process
    pub env: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            compare: CompareMode::Strict,
            log_file: "p.out".to_string(),
            tests_dir: "tests".to_string(),
            solutions_dir: "solutions".to_string(),
            runtime: Runtime::default(),
            env: BTreeMap::new(),
        }
    }
}

/// Runtime binary configuration.
///
/// Example:
///
/// runtime:
///   python: python3
///   cargo: cargo
///   cargo_args: [run, --quiet]
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Runtime {
    pub python: String,
    pub cargo: String,
    pub cargo_args: Vec<String>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            cargo: "cargo".to_string(),
            cargo_args: vec!["run".to_string(), "--quiet".to_string()],
        }
    }
}

impl Config {
    /// Load and parse `autotest.yaml` from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let cfg: Config =
            serde_yaml::from_str(&raw).context("Failed to parse YAML config")?;

        Ok(cfg)
    }
}

/* ---------------- validated run configuration ---------------- */

/// A fully resolved program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// Command line as shown to the user and written to the log.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }
}

/// Which cases a run executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Every case discovered under the tests root
    Batch { filters: BTreeSet<String> },

    /// Explicit test file arguments, in argument order
    Files(Vec<PathBuf>),

    /// Run the program once with its command-line arguments
    OutputOnly,
}

/// What the console shows for each case.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    pub show_output: bool,
    pub verbose: bool,
}

/// Immutable configuration for one invocation.
///
/// Built once by `engine::validate`; everything downstream assumes it is
/// valid and normalized.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub invocation: Invocation,
    pub mode: RunMode,
    pub feed_stdin: bool,
    pub timeout: Duration,
    pub compare: CompareMode,
    pub display: DisplayOptions,
    pub log_file: Option<PathBuf>,
    pub tests_root: PathBuf,
    pub solutions_root: PathBuf,
    pub env: BTreeMap<String, String>,
}
