//! Renders a `Diff` into a bounded plain-text prompt context: security-
//! sensitive files first, then largest hunks first, truncated to a
//! character budget derived from the configured token budget.

use crate::diff::model::{Diff, FileDiff};

const SECURITY_SENSITIVE_MARKERS: &[&str] = &[
    "auth", "login", "password", "secret", "token", "crypt", "security", "permission",
    "session", "credential", "key", "oauth", "jwt", "cert", "ssl", "tls",
];

pub fn build(diff: &Diff, max_token_budget: usize) -> String {
    let max_chars = max_token_budget.saturating_mul(4);
    let mut out = String::new();

    let title = if diff.pr_title.is_empty() { "(none)" } else { diff.pr_title.as_str() };
    out.push_str(&format!("PR: {title}\n"));
    out.push_str(&format!("Description: {}\n", truncate_chars(&diff.pr_body, 500)));

    let mut languages: Vec<&str> = diff
        .files
        .iter()
        .map(|f| f.language.as_str())
        .filter(|l| !l.is_empty())
        .collect();
    languages.sort_unstable();
    languages.dedup();
    out.push_str(&format!("Languages: {}\n", languages.join(", ")));
    out.push_str(&format!("Files changed: {}\n\n", diff.files.len()));

    let mut files: Vec<&FileDiff> = diff.files.iter().filter(|f| !f.is_binary).collect();
    files.sort_by(|a, b| {
        is_security_sensitive(&b.path)
            .cmp(&is_security_sensitive(&a.path))
            .then_with(|| hunk_content_size(b).cmp(&hunk_content_size(a)))
    });

    for file in files {
        if out.len() >= max_chars {
            out.push_str("...[truncated: token budget exhausted]\n");
            break;
        }

        let header = format!(
            "--- {} ({}, {}) +{} -{} lines ---\n",
            file.path,
            file.status,
            if file.language.is_empty() { "unknown" } else { &file.language },
            file.additions(),
            file.deletions(),
        );
        if out.len() + header.len() > max_chars {
            out.push_str("...[truncated: token budget exhausted]\n");
            break;
        }
        out.push_str(&header);

        let mut hit_limit = false;
        for hunk in &file.hunks {
            let hunk_header = format!(
                "@@ -{},{} +{},{} @@\n",
                hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines
            );
            let remaining = max_chars.saturating_sub(out.len());
            if hunk_header.len() >= remaining {
                out.push_str("...[truncated: token budget exhausted]\n");
                hit_limit = true;
                break;
            }
            let body_budget = remaining - hunk_header.len();
            out.push_str(&hunk_header);
            if hunk.content.len() > body_budget {
                out.push_str(&truncate_chars(&hunk.content, body_budget));
                out.push_str("\n...[truncated: token budget exhausted]\n");
                hit_limit = true;
                break;
            }
            out.push_str(&hunk.content);
            out.push('\n');
        }
        out.push('\n');
        if hit_limit {
            break;
        }
    }

    out
}

fn is_security_sensitive(path: &str) -> bool {
    let lower = path.to_lowercase();
    SECURITY_SENSITIVE_MARKERS.iter().any(|m| lower.contains(m))
}

fn hunk_content_size(file: &FileDiff) -> usize {
    file.hunks.iter().map(|h| h.content.len()).sum()
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let idx = s.char_indices().nth(max).map(|(i, _)| i).unwrap_or(s.len());
        s[..idx].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{FileStatus, Hunk, Line};

    fn file(path: &str, content: &str) -> FileDiff {
        FileDiff {
            path: path.to_string(),
            old_path: None,
            status: FileStatus::Modified,
            language: crate::diff::language::detect(path),
            is_binary: false,
            hunks: vec![Hunk {
                old_start: 1,
                old_lines: 1,
                new_start: 1,
                new_lines: 1,
                content: content.to_string(),
                added_lines: vec![Line { number: 1, content: content.to_string() }],
                removed_lines: Vec::new(),
            }],
        }
    }

    #[test]
    fn security_sensitive_files_come_first() {
        let diff = Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: vec![file("src/widgets.rs", "+fn render() {}"), file("src/auth/login.rs", "+fn login() {}")],
            pr_title: "Add login".into(),
            pr_body: "Implements login".into(),
            author: "alice".into(),
        };
        let ctx = build(&diff, 10_000);
        let auth_idx = ctx.find("src/auth/login.rs").unwrap();
        let widgets_idx = ctx.find("src/widgets.rs").unwrap();
        assert!(auth_idx < widgets_idx);
    }

    #[test]
    fn truncates_to_budget() {
        let diff = Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: vec![file("src/big.rs", &"x".repeat(10_000))],
            pr_title: String::new(),
            pr_body: String::new(),
            author: String::new(),
        };
        let ctx = build(&diff, 100);
        assert!(ctx.len() <= 500);
        assert!(ctx.contains("truncated"));
    }

    #[test]
    fn binary_files_are_skipped() {
        let mut bin = file("image.png", "binary");
        bin.is_binary = true;
        let diff = Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: vec![bin],
            pr_title: String::new(),
            pr_body: String::new(),
            author: String::new(),
        };
        let ctx = build(&diff, 10_000);
        assert!(!ctx.contains("image.png"));
    }
}
