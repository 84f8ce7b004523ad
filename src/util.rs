// src/util.rs

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Read a file into raw bytes with a clear error message.
///
/// Test inputs and expected solutions are compared as bytes, never decoded.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Trailing digits of a file name, falling back to the stem.
///
/// Example:
/// case10    → Some(10)
/// in.10     → Some(10)
/// case2.in  → Some(2)
/// sample    → None
pub fn numeric_suffix(path: &Path) -> Option<u64> {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re = SUFFIX.get_or_init(|| Regex::new(r"(\d+)$").expect("valid regex"));

    let trailing = |s: &str| -> Option<u64> { re.captures(s)?.get(1)?.as_str().parse().ok() };

    let name = path.file_name()?.to_str()?;
    trailing(name).or_else(|| trailing(path.file_stem()?.to_str()?))
}

/// Whether a directory entry should be ignored during discovery.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Last path component as a string (lossy).
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_suffix_reads_trailing_digits() {
        assert_eq!(numeric_suffix(Path::new("tests/g/case10")), Some(10));
        assert_eq!(numeric_suffix(Path::new("tests/g/case2.in")), Some(2));
        assert_eq!(numeric_suffix(Path::new("tests/g/in.10")), Some(10));
        assert_eq!(numeric_suffix(Path::new("tests/g/run3.v2")), Some(2));
        assert_eq!(numeric_suffix(Path::new("tests/g/007")), Some(7));
        assert_eq!(numeric_suffix(Path::new("tests/g/sample")), None);
        assert_eq!(numeric_suffix(Path::new("tests/g/1a")), None);
    }

    #[test]
    fn hidden_entries_are_detected() {
        assert!(is_hidden(Path::new("tests/.DS_Store")));
        assert!(!is_hidden(Path::new("tests/case1")));
    }
}
