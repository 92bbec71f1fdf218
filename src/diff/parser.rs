//! Unified-diff text -> structured `Diff`.
//!
//! A hand-rolled line-prefix state machine, generalised from
//! `legacy_src/diff.rs`'s single-file parser to multi-file `diff --git`
//! boundaries, per spec §4.1.

use super::language;
use super::model::{Diff, FileDiff, FileStatus, Hunk, Line};
use crate::cancel::CancellationToken;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("diff is empty")]
    Empty,
    #[error("invalid diff: {0}")]
    Invalid(String),
    #[error("parsing cancelled")]
    Cancelled,
}

impl From<ParseError> for crate::error::ShipSafeError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Empty => crate::error::ShipSafeError::EmptyDiff,
            ParseError::Invalid(s) => crate::error::ShipSafeError::InvalidDiff(s),
            ParseError::Cancelled => crate::error::ShipSafeError::Cancelled,
        }
    }
}

/// Parse unified-diff bytes into a `Diff`. `base_sha`/`head_sha`/`pr_title`/
/// `pr_body`/`author` are not present in the diff text itself and are
/// supplied by the caller (the out-of-scope VCS/dispatcher layer).
pub fn parse(
    input: &str,
    base_sha: impl Into<String>,
    head_sha: impl Into<String>,
    cancel: &CancellationToken,
) -> Result<Diff, ParseError> {
    let files = parse_files(input, cancel)?;
    Ok(Diff {
        base_sha: base_sha.into(),
        head_sha: head_sha.into(),
        files,
        pr_title: String::new(),
        pr_body: String::new(),
        author: String::new(),
    })
}

/// Parse just the file-level structure, without attaching VCS metadata.
pub fn parse_files(input: &str, cancel: &CancellationToken) -> Result<Vec<FileDiff>, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    if !input.lines().any(|l| l.starts_with("diff --git ")) {
        return Err(ParseError::Invalid(
            "no 'diff --git' header found".to_string(),
        ));
    }

    let lines: Vec<&str> = input.lines().collect();
    let mut files = Vec::new();
    let mut current: Option<FileBuilder> = None;
    let mut i = 0;

    while i < lines.len() {
        if cancel.is_cancelled() {
            return Err(ParseError::Cancelled);
        }
        let line = lines[i];

        if let Some(rest) = line.strip_prefix("diff --git ") {
            if let Some(builder) = current.take() {
                files.push(builder.finish());
            }
            current = Some(FileBuilder::from_git_header(rest));
            i += 1;
            continue;
        }

        let Some(builder) = current.as_mut() else {
            // Stray line before any `diff --git` header (e.g. a leading
            // `commit`/`index` preamble) - skip it.
            i += 1;
            continue;
        };

        if let Some(path) = line.strip_prefix("--- ") {
            builder.old_header_path = Some(strip_timestamp(path));
        } else if let Some(path) = line.strip_prefix("+++ ") {
            builder.new_header_path = Some(strip_timestamp(path));
        } else if line.starts_with("new file mode") {
            builder.new_file_mode = true;
        } else if line.starts_with("deleted file mode") {
            builder.deleted_file_mode = true;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            builder.rename_from = Some(path.to_string());
        } else if let Some(path) = line.strip_prefix("rename to ") {
            builder.rename_to = Some(path.to_string());
        } else if line.starts_with("Binary files ") && line.ends_with(" differ") {
            builder.is_binary = true;
        } else if line.starts_with("@@ ") {
            let (hunk, consumed) = parse_hunk(&lines, i, cancel)?;
            builder.hunks.push(hunk);
            i += consumed;
            continue;
        }

        i += 1;
    }

    if let Some(builder) = current.take() {
        files.push(builder.finish());
    }

    Ok(files)
}

/// Strip a trailing tab-separated timestamp from a `---`/`+++` path, and the
/// leading `a/`/`b/` prefix git adds.
fn strip_timestamp(raw: &str) -> String {
    let path = raw.split('\t').next().unwrap_or(raw).trim();
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

struct FileBuilder {
    git_old_path: String,
    git_new_path: String,
    old_header_path: Option<String>,
    new_header_path: Option<String>,
    rename_from: Option<String>,
    rename_to: Option<String>,
    new_file_mode: bool,
    deleted_file_mode: bool,
    is_binary: bool,
    hunks: Vec<Hunk>,
}

impl FileBuilder {
    fn from_git_header(rest: &str) -> Self {
        // rest looks like "a/<old> b/<new>"; paths with spaces are rare but
        // we bias toward the last " b/" occurrence, matching git's own
        // heuristic for ambiguous headers.
        let (old, new) = match rest.rfind(" b/") {
            Some(idx) => (
                rest[..idx].trim().to_string(),
                rest[idx + 3..].trim().to_string(),
            ),
            None => (String::new(), String::new()),
        };
        let old = old.strip_prefix("a/").unwrap_or(&old).to_string();
        Self {
            git_old_path: old,
            git_new_path: new,
            old_header_path: None,
            new_header_path: None,
            rename_from: None,
            rename_to: None,
            new_file_mode: false,
            deleted_file_mode: false,
            is_binary: false,
            hunks: Vec::new(),
        }
    }

    fn finish(self) -> FileDiff {
        let is_rename = self.rename_from.is_some() && self.rename_to.is_some();
        let header_added = matches!(self.old_header_path.as_deref(), Some("/dev/null"));
        let header_deleted = matches!(self.new_header_path.as_deref(), Some("/dev/null"));

        let status = if is_rename {
            FileStatus::Renamed
        } else if self.new_file_mode || header_added {
            FileStatus::Added
        } else if self.deleted_file_mode || header_deleted {
            FileStatus::Deleted
        } else {
            FileStatus::Modified
        };

        let path = if is_rename {
            self.rename_to.clone().unwrap_or(self.git_new_path.clone())
        } else if !header_deleted {
            self.new_header_path
                .clone()
                .filter(|p| p != "/dev/null")
                .unwrap_or_else(|| self.git_new_path.clone())
        } else {
            self.old_header_path
                .clone()
                .filter(|p| p != "/dev/null")
                .unwrap_or_else(|| self.git_old_path.clone())
        };

        let old_path = if is_rename { self.rename_from.clone() } else { None };

        let language = language::detect(&path);

        FileDiff {
            path,
            old_path,
            status,
            hunks: self.hunks,
            language,
            is_binary: self.is_binary,
        }
    }
}

/// Parse one `@@ -a,b +c,d @@` hunk starting at `lines[start]`. Returns the
/// hunk and the number of lines consumed (including the header).
fn parse_hunk(
    lines: &[&str],
    start: usize,
    cancel: &CancellationToken,
) -> Result<(Hunk, usize), ParseError> {
    let header = lines[start];
    let (old_start, old_lines, new_start, new_lines) = parse_hunk_header(header)?;

    let mut added_lines = Vec::new();
    let mut removed_lines = Vec::new();
    let mut raw = Vec::new();

    let mut old_counter = old_start;
    let mut new_counter = new_start;
    let mut idx = start + 1;

    while idx < lines.len() {
        if cancel.is_cancelled() {
            return Err(ParseError::Cancelled);
        }
        let line = lines[idx];

        if line.starts_with("@@ ") || line.starts_with("diff --git ") {
            break;
        }

        if line.starts_with('\\') {
            // "\ No newline at end of file" - part of the hunk text, but
            // not a line of content.
            raw.push(line.to_string());
            idx += 1;
            continue;
        }

        if let Some(content) = line.strip_prefix('+') {
            added_lines.push(Line {
                number: new_counter,
                content: content.to_string(),
            });
            new_counter += 1;
        } else if let Some(content) = line.strip_prefix('-') {
            removed_lines.push(Line {
                number: old_counter,
                content: content.to_string(),
            });
            old_counter += 1;
        } else if let Some(content) = line.strip_prefix(' ') {
            let _ = content;
            old_counter += 1;
            new_counter += 1;
        } else if line.is_empty() {
            old_counter += 1;
            new_counter += 1;
        } else {
            // Unexpected prefix inside a hunk; stop the hunk here rather
            // than misinterpreting trailing content as diff lines.
            break;
        }

        raw.push(line.to_string());
        idx += 1;
    }

    let hunk = Hunk {
        old_start,
        old_lines,
        new_start,
        new_lines,
        content: raw.join("\n"),
        added_lines,
        removed_lines,
    };

    Ok((hunk, idx - start))
}

fn parse_hunk_header(header: &str) -> Result<(u32, u32, u32, u32), ParseError> {
    let body = header
        .strip_prefix("@@ ")
        .ok_or_else(|| ParseError::Invalid(format!("malformed hunk header: {header}")))?;
    let end = body
        .find(" @@")
        .ok_or_else(|| ParseError::Invalid(format!("malformed hunk header: {header}")))?;
    let ranges = &body[..end];
    let mut parts = ranges.split_whitespace();
    let old_range = parts
        .next()
        .ok_or_else(|| ParseError::Invalid(format!("malformed hunk header: {header}")))?;
    let new_range = parts
        .next()
        .ok_or_else(|| ParseError::Invalid(format!("malformed hunk header: {header}")))?;

    let (old_start, old_lines) = parse_range(old_range.trim_start_matches('-'), header)?;
    let (new_start, new_lines) = parse_range(new_range.trim_start_matches('+'), header)?;

    Ok((old_start, old_lines, new_start, new_lines))
}

fn parse_range(s: &str, header: &str) -> Result<(u32, u32), ParseError> {
    let invalid = || ParseError::Invalid(format!("malformed hunk range in: {header}"));
    if let Some((start, count)) = s.split_once(',') {
        Ok((
            start.parse().map_err(|_| invalid())?,
            count.parse().map_err(|_| invalid())?,
        ))
    } else {
        Ok((s.parse().map_err(|_| invalid())?, 1))
    }
}
