//! Test-case discovery.
//!
//! Layout:
//!
//! tests/
//!   single_case
//!   group/
//!     case1
//!     case2
//!     case10
//!
//! solutions/ mirrors tests/ with the expected outputs.

use crate::util::{file_name, is_hidden, numeric_suffix};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A discovered test input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub path: PathBuf,
    /// `<group>/<case>` or `<case>`
    pub label: String,
    pub expected: Option<PathBuf>,
}

/// Enumerate the cases under `tests_root` in execution order.
///
/// Directories directly under the root are groups; their files are ordered
/// by numeric suffix (case1, case2, case10). When `filters` is non-empty,
/// groups and top-level files not named in it are skipped.
pub fn discover(
    tests_root: &Path,
    solutions_root: &Path,
    filters: &BTreeSet<String>,
) -> Result<Vec<TestCase>> {
    let mut cases = Vec::new();

    for entry in list_sorted(tests_root)? {
        let name = file_name(&entry);

        if !filters.is_empty() && !filters.contains(&name) {
            tracing::debug!(entry = %entry.display(), "skipped by filter");
            continue;
        }

        if entry.is_dir() {
            for child in list_sorted(&entry)? {
                if child.is_dir() {
                    tracing::debug!(entry = %child.display(), "nested directory ignored");
                    continue;
                }
                let label = format!("{}/{}", name, file_name(&child));
                cases.push(make_case(child, label, tests_root, solutions_root));
            }
        } else {
            cases.push(make_case(entry, name, tests_root, solutions_root));
        }
    }

    tracing::debug!(count = cases.len(), root = %tests_root.display(), "discovered test cases");
    Ok(cases)
}

/// Build a case for an explicit path (single-case mode).
pub fn case_for_path(path: &Path, tests_root: &Path, solutions_root: &Path) -> TestCase {
    make_case(
        path.to_path_buf(),
        path.display().to_string(),
        tests_root,
        solutions_root,
    )
}

fn make_case(path: PathBuf, label: String, tests_root: &Path, solutions_root: &Path) -> TestCase {
    let expected = expected_path(&path, tests_root, solutions_root);
    TestCase {
        path,
        label,
        expected,
    }
}

/// Locate the expected output for a test input, if one exists on disk.
///
/// tests/group/case1 → solutions/group/case1
pub fn expected_path(case: &Path, tests_root: &Path, solutions_root: &Path) -> Option<PathBuf> {
    let candidate = mirror_path(case, tests_root, solutions_root)?;
    if candidate != case && candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

fn mirror_path(case: &Path, tests_root: &Path, solutions_root: &Path) -> Option<PathBuf> {
    if let Ok(rel) = case.strip_prefix(tests_root) {
        return Some(solutions_root.join(rel));
    }

    // Paths given relative to another base: swap the first `tests` segment.
    let tests_name = tests_root.file_name()?;
    let solutions_name = solutions_root.file_name()?;

    let mut swapped = false;
    let mut out = PathBuf::new();
    for component in case.components() {
        match component {
            Component::Normal(part) if !swapped && part == tests_name => {
                out.push(solutions_name);
                swapped = true;
            }
            other => out.push(other.as_os_str()),
        }
    }

    swapped.then_some(out)
}

/// Direct children of `dir`, hidden entries removed, in numeric-suffix order.
fn list_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {:?}", dir))?;
        if !is_hidden(entry.path()) {
            entries.push(entry.into_path());
        }
    }

    entries.sort_by_key(|p| sort_key(p));
    Ok(entries)
}

/// Entries with a numeric suffix come first, by number; the rest by name.
fn sort_key(path: &Path) -> (bool, u64, String) {
    let suffix = numeric_suffix(path);
    (suffix.is_none(), suffix.unwrap_or(0), file_name(path))
}
