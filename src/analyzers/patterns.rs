//! Anti-pattern regexes over added lines: SQL concatenation, empty
//! catch/except blocks, debug prints, and TODO-style comments.

use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;

use crate::analyzer::Analyzer;
use crate::cancel::CancellationToken;
use crate::diff::model::{AnalysisResult, Category, Finding, FileDiff, Severity};
use crate::diff::Diff;

use super::common::{eligible_files, finding_id, is_fixture_path, is_test_file};

const NAME: &str = "patterns";

pub struct PatternsAnalyzer;

impl Analyzer for PatternsAnalyzer {
    fn name(&self) -> &str {
        NAME
    }

    fn analyze(&self, diff: &Diff, cancel: &CancellationToken) -> AnalysisResult {
        let start = Instant::now();
        let mut findings = Vec::new();
        let mut ordinal = 0usize;

        for file in eligible_files(&diff.files) {
            if cancel.is_cancelled() {
                return AnalysisResult::failed(NAME, "cancelled");
            }
            if is_test_file(&file.path) || is_fixture_path(&file.path) {
                continue;
            }
            let is_yaml = file.language == "yaml";

            for hunk in &file.hunks {
                let added: Vec<_> = hunk.added_lines.iter().collect();
                for (idx, line) in added.iter().enumerate() {
                    if cancel.is_cancelled() {
                        return AnalysisResult::failed(NAME, "cancelled");
                    }
                    let content = line.content.as_str();
                    let trimmed = content.trim();

                    if looks_like_sql_concat(content) {
                        ordinal += 1;
                        findings.push(make_finding(
                            "PAT-SQL-CONCAT",
                            "SQL built via string concatenation",
                            Severity::Medium,
                            "Use parameterised queries instead of building SQL with string concatenation or interpolation.",
                            file,
                            line.number,
                            ordinal,
                        ));
                    }

                    if !is_yaml && is_empty_catch_line(trimmed) {
                        ordinal += 1;
                        findings.push(make_finding(
                            "PAT-EMPTY-CATCH",
                            "Empty catch/except block",
                            Severity::Medium,
                            "Handle the error or at minimum log it - silently swallowing exceptions hides failures.",
                            file,
                            line.number,
                            ordinal,
                        ));
                    } else if !is_yaml && is_python_bare_except(trimmed) {
                        if let Some(next) = added.get(idx + 1) {
                            if next.content.trim() == "pass" {
                                ordinal += 1;
                                findings.push(make_finding(
                                    "PAT-EMPTY-CATCH",
                                    "Empty except block",
                                    Severity::Medium,
                                    "Handle the error or at minimum log it - silently swallowing exceptions hides failures.",
                                    file,
                                    line.number,
                                    ordinal,
                                ));
                            }
                        }
                    }

                    if !is_comment_line(trimmed) && debug_print_re().is_match(content) {
                        ordinal += 1;
                        findings.push(make_finding(
                            "PAT-DEBUG-PRINT",
                            "Debug print left in code",
                            Severity::Low,
                            "Remove debug output or route it through the project's logger.",
                            file,
                            line.number,
                            ordinal,
                        ));
                    }

                    if todo_re().is_match(content) {
                        ordinal += 1;
                        findings.push(make_finding(
                            "PAT-TODO",
                            "TODO/FIXME/HACK comment",
                            Severity::Info,
                            "Track this in an issue tracker if it needs follow-up.",
                            file,
                            line.number,
                            ordinal,
                        ));
                    }
                }
            }
        }

        AnalysisResult::ok(NAME, findings, start.elapsed())
    }
}

fn sql_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(select|insert|update|delete)\b").unwrap())
}

fn fstring_interp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"f["'][^"']*\{|`[^`]*\$\{"#).unwrap())
}

fn looks_like_sql_concat(line: &str) -> bool {
    if !sql_keyword_re().is_match(line) {
        return false;
    }
    line.contains("\" +")
        || line.contains("' +")
        || line.contains("+ \"")
        || line.contains("+ '")
        || line.contains("%s")
        || fstring_interp_re().is_match(line)
}

fn empty_catch_brace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(catch|rescue)\b\s*(\([^)]*\))?\s*\{\s*\}").unwrap()
    })
}

fn is_empty_catch_line(trimmed: &str) -> bool {
    empty_catch_brace_re().is_match(trimmed)
}

fn python_bare_except_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^except\b[^:]*:\s*$").unwrap())
}

fn is_python_bare_except(trimmed: &str) -> bool {
    python_bare_except_re().is_match(trimmed)
}

fn debug_print_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(console\.(log|debug|info|warn|error)|fmt\.(print|println|printf)|System\.out\.(print|println)|puts|pp|print|println)\s*\(",
        )
        .unwrap()
    })
}

fn is_comment_line(trimmed: &str) -> bool {
    trimmed.starts_with("//") || trimmed.starts_with('#') || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

fn todo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(TODO|FIXME|HACK|XXX)\b").unwrap())
}

fn make_finding(
    tag: &str,
    title: &str,
    severity: Severity,
    suggestion: &str,
    file: &FileDiff,
    line: u32,
    ordinal: usize,
) -> Finding {
    Finding {
        id: finding_id(tag, &file.path, line, ordinal),
        category: Category::Pattern,
        severity,
        file: file.path.clone(),
        start_line: line,
        end_line: line,
        title: title.to_string(),
        description: format!("{title} at {}:{line}", file.path),
        suggestion: Some(suggestion.to_string()),
        source: NAME.to_string(),
        confidence: 0.8,
        metadata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{FileStatus, Hunk, Line};

    fn file_with(path: &str, lines: &[&str]) -> FileDiff {
        let added_lines = lines
            .iter()
            .enumerate()
            .map(|(i, l)| Line {
                number: (i + 1) as u32,
                content: l.to_string(),
            })
            .collect();
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
                new_lines: lines.len() as u32,
                content: String::new(),
                added_lines,
                removed_lines: Vec::new(),
            }],
        }
    }

    fn diff_with(file: FileDiff) -> Diff {
        Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: vec![file],
            pr_title: String::new(),
            pr_body: String::new(),
            author: String::new(),
        }
    }

    #[test]
    fn detects_sql_concatenation() {
        let file = file_with(
            "internal/db/query.go",
            &[r#"query := "SELECT * FROM users WHERE id = " + userID"#],
        );
        let result = PatternsAnalyzer.analyze(&diff_with(file), &CancellationToken::new());
        assert!(result.findings.iter().any(|f| f.id.starts_with("PAT-SQL-CONCAT")));
    }

    #[test]
    fn detects_empty_catch_block() {
        let file = file_with("src/main.ts", &["} catch (e) {}"]);
        let result = PatternsAnalyzer.analyze(&diff_with(file), &CancellationToken::new());
        assert!(result.findings.iter().any(|f| f.id.starts_with("PAT-EMPTY-CATCH")));
    }

    #[test]
    fn detects_debug_print() {
        let file = file_with("src/app.js", &["console.log(\"debugging\")"]);
        let result = PatternsAnalyzer.analyze(&diff_with(file), &CancellationToken::new());
        assert!(result.findings.iter().any(|f| f.id.starts_with("PAT-DEBUG-PRINT")));
    }

    #[test]
    fn commented_out_debug_print_is_skipped() {
        let file = file_with("src/app.js", &["// console.log(\"debugging\")"]);
        let result = PatternsAnalyzer.analyze(&diff_with(file), &CancellationToken::new());
        assert!(result.findings.iter().all(|f| !f.id.starts_with("PAT-DEBUG-PRINT")));
    }

    #[test]
    fn detects_todo_comment() {
        let file = file_with("src/app.go", &["// TODO: handle retry"]);
        let result = PatternsAnalyzer.analyze(&diff_with(file), &CancellationToken::new());
        let found = result
            .findings
            .iter()
            .find(|f| f.id.starts_with("PAT-TODO"))
            .expect("expected todo finding");
        assert_eq!(found.severity, Severity::Info);
    }

    #[test]
    fn test_files_are_skipped() {
        let file = file_with("src/app_test.go", &["console.log(\"debugging\")"]);
        let result = PatternsAnalyzer.analyze(&diff_with(file), &CancellationToken::new());
        assert!(result.findings.is_empty());
    }
}
