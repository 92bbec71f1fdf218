//! Dependency-manifest diffing: flags new and major-version-bumped
//! dependencies, and dependencies dropped without replacement.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;

use crate::analyzer::Analyzer;
use crate::cancel::CancellationToken;
use crate::diff::model::{AnalysisResult, Category, Finding, FileDiff, Severity};
use crate::diff::Diff;

use super::common::{added_lines, eligible_files, finding_id, removed_lines};

const NAME: &str = "imports";

const MANIFEST_NAMES: &[&str] = &[
    "go.mod",
    "go.sum",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "requirements.txt",
    "Pipfile",
    "Pipfile.lock",
    "pyproject.toml",
    "poetry.lock",
    "Cargo.toml",
    "Cargo.lock",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "Gemfile",
    "Gemfile.lock",
    "composer.json",
    "composer.lock",
];

pub struct ImportsAnalyzer;

impl Analyzer for ImportsAnalyzer {
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
            let basename = Path::new(&file.path).file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !MANIFEST_NAMES.contains(&basename) {
                continue;
            }

            let added_deps = collect_deps(basename, added_lines(file));
            let removed_deps = collect_deps(basename, removed_lines(file));

            for (name, new_version) in &added_deps {
                if let Some(old_version) = removed_deps.get(name) {
                    if let (Some(old_major), Some(new_major)) =
                        (major_version(old_version), major_version(new_version))
                    {
                        if old_major != new_major {
                            ordinal += 1;
                            findings.push(make_finding(
                                "IMP-MAJOR",
                                &format!("{name} bumped across a major version ({old_version} -> {new_version})"),
                                Severity::Medium,
                                file,
                                ordinal,
                                Some((old_major, new_major)),
                            ));
                        }
                    }
                } else {
                    ordinal += 1;
                    findings.push(make_finding(
                        "IMP-NEW",
                        &format!("New dependency added: {name} {new_version}"),
                        Severity::Low,
                        file,
                        ordinal,
                        None,
                    ));
                }
            }

            for name in removed_deps.keys() {
                if !added_deps.contains_key(name) {
                    ordinal += 1;
                    findings.push(make_finding(
                        "IMP-REMOVED",
                        &format!("Dependency removed: {name}"),
                        Severity::Info,
                        file,
                        ordinal,
                        None,
                    ));
                }
            }
        }

        AnalysisResult::ok(NAME, findings, start.elapsed())
    }
}

fn collect_deps<'a>(basename: &str, lines: impl Iterator<Item = (u32, &'a str)>) -> BTreeMap<String, String> {
    let mut deps = BTreeMap::new();
    for (_, content) in lines {
        let trimmed = content.trim();
        if trimmed.starts_with("//") || trimmed.starts_with('#') {
            continue;
        }
        if let Some((name, version)) = parse_dep_line(basename, content) {
            deps.insert(name, version);
        }
    }
    deps
}

fn parse_dep_line(basename: &str, line: &str) -> Option<(String, String)> {
    let caps = match basename {
        "go.mod" | "go.sum" => go_mod_re().captures(line),
        "package.json" | "package-lock.json" => npm_re().captures(line),
        "requirements.txt" | "Pipfile" => python_requirement_re().captures(line),
        "pyproject.toml" | "poetry.lock" | "Cargo.toml" | "Cargo.lock" | "Pipfile.lock" => toml_assignment_re().captures(line),
        _ => generic_dep_re().captures(line),
    }?;
    Some((caps["name"].to_string(), caps["version"].to_string()))
}

fn go_mod_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?P<name>[\w./-]+)\s+v(?P<version>\d+\.\d+\.\d+[\w.-]*)").unwrap())
}

fn npm_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""(?P<name>[@\w][\w@/.-]*)":\s*"[\^~]?v?(?P<version>\d+\.\d+\.\d+[\w.-]*)""#).unwrap()
    })
}

fn python_requirement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<name>[A-Za-z0-9_.-]+)\s*[=><~!]+\s*(?P<version>\d+\.\d+(?:\.\d+)?[\w.-]*)").unwrap()
    })
}

fn toml_assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(?P<name>[A-Za-z0-9_.-]+)\s*=\s*"[\^~]?v?(?P<version>\d+\.\d+(?:\.\d+)?[\w.-]*)""#).unwrap()
    })
}

fn generic_dep_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?P<name>[A-Za-z0-9_.@/-]{2,})["']?\s*[:=@]\s*["']?[\^~]?v?(?P<version>\d+\.\d+(?:\.\d+)?[\w.-]*)"#)
            .unwrap()
    })
}

fn major_version(version: &str) -> Option<u64> {
    version
        .trim_start_matches(['v', '^', '~'])
        .split('.')
        .next()?
        .parse()
        .ok()
}

fn make_finding(
    tag: &str,
    title: &str,
    severity: Severity,
    file: &FileDiff,
    ordinal: usize,
    majors: Option<(u64, u64)>,
) -> Finding {
    let mut finding = Finding {
        id: finding_id(tag, &file.path, 0, ordinal),
        category: Category::Import,
        severity,
        file: file.path.clone(),
        start_line: 0,
        end_line: 0,
        title: title.to_string(),
        description: title.to_string(),
        suggestion: None,
        source: NAME.to_string(),
        confidence: 0.6,
        metadata: None,
    };
    if let Some((old_major, new_major)) = majors {
        finding = finding
            .with_metadata("old_major", serde_json::json!(old_major))
            .with_metadata("new_major", serde_json::json!(new_major));
    }
    finding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{FileStatus, Hunk, Line};

    fn manifest_diff(path: &str, added: &[&str], removed: &[&str]) -> Diff {
        let added_lines = added
            .iter()
            .enumerate()
            .map(|(i, l)| Line { number: (i + 1) as u32, content: l.to_string() })
            .collect();
        let removed_lines = removed
            .iter()
            .enumerate()
            .map(|(i, l)| Line { number: (i + 1) as u32, content: l.to_string() })
            .collect();
        let file = FileDiff {
            path: path.to_string(),
            old_path: None,
            status: FileStatus::Modified,
            language: crate::diff::language::detect(path),
            is_binary: false,
            hunks: vec![Hunk {
                old_start: 1,
                old_lines: removed.len() as u32,
                new_start: 1,
                new_lines: added.len() as u32,
                content: String::new(),
                added_lines,
                removed_lines,
            }],
        };
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
    fn flags_major_version_bump() {
        let diff = manifest_diff(
            "go.mod",
            &["    github.com/gorilla/mux v2.0.0"],
            &["    github.com/gorilla/mux v1.8.0"],
        );
        let result = ImportsAnalyzer.analyze(&diff, &CancellationToken::new());
        assert!(result.findings.iter().any(|f| f.id.starts_with("IMP-MAJOR")));
    }

    #[test]
    fn flags_new_dependency() {
        let diff = manifest_diff("go.mod", &["    github.com/gorilla/mux v1.8.0"], &[]);
        let result = ImportsAnalyzer.analyze(&diff, &CancellationToken::new());
        assert!(result.findings.iter().any(|f| f.id.starts_with("IMP-NEW")));
    }

    #[test]
    fn flags_removed_dependency() {
        let diff = manifest_diff("go.mod", &[], &["    github.com/gorilla/mux v1.8.0"]);
        let result = ImportsAnalyzer.analyze(&diff, &CancellationToken::new());
        assert!(result.findings.iter().any(|f| f.id.starts_with("IMP-REMOVED")));
        assert_eq!(result.findings[0].severity, Severity::Info);
    }

    #[test]
    fn non_manifest_files_are_ignored() {
        let diff = manifest_diff("src/main.go", &["    github.com/gorilla/mux v2.0.0"], &[]);
        let result = ImportsAnalyzer.analyze(&diff, &CancellationToken::new());
        assert!(result.findings.is_empty());
    }
}
