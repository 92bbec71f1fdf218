//! Shared iteration and skip-path helpers used by all static analyzers.
//!
//! Grounded in `legacy_src/analysis/scanner.rs`'s regex-driven file scanning
//! style, re-targeted from walking a checkout to walking added/removed diff
//! lines.

use crate::diff::model::{FileDiff, FileStatus};

/// Files every static analyzer is allowed to look at: not deleted, not
/// binary. Individual analyzers layer further skip rules on top.
pub fn eligible_files(files: &[FileDiff]) -> impl Iterator<Item = &FileDiff> {
    files
        .iter()
        .filter(|f| f.status != FileStatus::Deleted && !f.is_binary)
}

pub fn added_lines(file: &FileDiff) -> impl Iterator<Item = (u32, &str)> {
    file.hunks
        .iter()
        .flat_map(|h| h.added_lines.iter())
        .map(|l| (l.number, l.content.as_str()))
}

pub fn removed_lines(file: &FileDiff) -> impl Iterator<Item = (u32, &str)> {
    file.hunks
        .iter()
        .flat_map(|h| h.removed_lines.iter())
        .map(|l| (l.number, l.content.as_str()))
}

/// Test-file indicators shared by the patterns and complexity analyzers.
pub fn is_test_file(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.ends_with("_test.go")
        || lower.contains(".test.")
        || lower.contains(".spec.")
        || lower.contains("test_")
        || lower.contains("__test__")
        || lower.ends_with("_test.py")
        || lower.ends_with("_test.rb")
}

pub fn is_fixture_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    lower.contains("tests/fixtures/") || lower.ends_with(".diff")
}

/// Deterministic finding id: `<tag>-<file>:<line>-<ordinal>`, stable across
/// runs of the same input.
pub fn finding_id(tag: &str, file: &str, line: u32, ordinal: usize) -> String {
    format!("{tag}-{file}:{line}-{ordinal}")
}
