//! Heuristic test-file-existence check: does the diff include a test file
//! matching each changed source file's naming convention?

use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;

use crate::analyzer::Analyzer;
use crate::cancel::CancellationToken;
use crate::diff::model::{AnalysisResult, Category, Finding, FileDiff, FileStatus};
use crate::diff::Diff;

use super::common::{eligible_files, finding_id, is_test_file};

const NAME: &str = "coverage";
const MIN_LINES_FOR_COVERAGE: usize = 20;

pub struct CoverageAnalyzer;

impl Analyzer for CoverageAnalyzer {
    fn name(&self) -> &str {
        NAME
    }

    fn analyze(&self, diff: &Diff, cancel: &CancellationToken) -> AnalysisResult {
        let start = Instant::now();
        let mut findings = Vec::new();
        let mut ordinal = 0usize;

        let existing_paths: std::collections::HashSet<&str> =
            diff.files.iter().map(|f| f.path.as_str()).collect();

        for file in eligible_files(&diff.files) {
            if cancel.is_cancelled() {
                return AnalysisResult::failed(NAME, "cancelled");
            }

            if is_test_file(&file.path) || is_exempt(&file.path) {
                continue;
            }
            if file.additions() < MIN_LINES_FOR_COVERAGE {
                continue;
            }
            if is_react_component(&file.path) && !has_logic_indicator(file) {
                continue;
            }

            let candidates = candidate_test_paths(&file.path);
            if candidates.is_empty() {
                continue;
            }
            if candidates.iter().any(|c| existing_paths.contains(c.as_str())) {
                continue;
            }

            let severity = if file.status == FileStatus::Added {
                crate::diff::model::Severity::Medium
            } else {
                crate::diff::model::Severity::Low
            };

            ordinal += 1;
            findings.push(make_finding(file, severity, ordinal));
        }

        AnalysisResult::ok(NAME, findings, start.elapsed())
    }
}

fn is_react_component(path: &str) -> bool {
    path.ends_with(".tsx") || path.ends_with(".jsx")
}

fn logic_indicator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)usestate|useeffect|usereducer|usecallback|fetch\(|axios|async\s+function|async\s*=>|async\s*\(",
        )
        .unwrap()
    })
}

fn has_logic_indicator(file: &FileDiff) -> bool {
    file.hunks
        .iter()
        .flat_map(|h| h.added_lines.iter())
        .any(|l| logic_indicator_re().is_match(&l.content))
}

fn is_exempt(path: &str) -> bool {
    let file_name = Path::new(path).file_name().and_then(|n| n.to_str()).unwrap_or("");
    let lower_name = file_name.to_lowercase();
    let lower_path = path.to_lowercase();

    if lower_name.starts_with("layout.tsx")
        || lower_name.starts_with("layout.jsx")
        || lower_name.starts_with("page.tsx")
        || lower_name.starts_with("page.jsx")
    {
        return true;
    }
    if lower_path.ends_with(".d.ts") || lower_path.ends_with(".css") || lower_path.ends_with(".scss") {
        return true;
    }
    if lower_name.starts_with("next.config.")
        || lower_name.starts_with("tailwind.config.")
        || lower_name.starts_with("postcss.config.")
        || lower_name.starts_with("tsconfig")
        || lower_name.starts_with("eslint")
        || lower_name.starts_with("prettier")
    {
        return true;
    }
    matches!(
        lower_name.as_str(),
        "constants.ts" | "constants.tsx" | "animations.ts" | "animations.tsx"
    )
}

fn candidate_test_paths(path: &str) -> Vec<String> {
    let p = Path::new(path);
    let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let dir = p
        .parent()
        .map(|d| d.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");

    let join = |f: String| if dir.is_empty() { f } else { format!("{dir}/{f}") };

    match ext {
        "go" => vec![join(format!("{stem}_test.go"))],
        "py" => vec![
            join(format!("test_{stem}.py")),
            join(format!("{stem}_test.py")),
            join(format!("tests/test_{stem}.py")),
        ],
        "ts" | "tsx" | "js" | "jsx" => vec![
            join(format!("{stem}.test.{ext}")),
            join(format!("{stem}.spec.{ext}")),
        ],
        "rb" => vec![
            join(format!("{stem}_test.rb")),
            join(format!("{stem}_spec.rb")),
            join(format!("spec/{stem}_spec.rb")),
        ],
        "rs" => vec![join(format!("tests/{stem}.rs")), format!("tests/{stem}.rs")],
        _ => Vec::new(),
    }
}

fn make_finding(file: &FileDiff, severity: crate::diff::model::Severity, ordinal: usize) -> Finding {
    Finding {
        id: finding_id("COV-MISSING", &file.path, 0, ordinal),
        category: Category::Coverage,
        severity,
        file: file.path.clone(),
        start_line: 0,
        end_line: 0,
        title: "No matching test file in this change".to_string(),
        description: format!("{} adds substantial logic with no corresponding test file in the diff.", file.path),
        suggestion: Some("Add or update a test file covering this change.".to_string()),
        source: NAME.to_string(),
        confidence: 0.6,
        metadata: None,
    }
}
