//! Strict-ish JSON parsing of a review pass's raw model output, grounded in
//! `legacy_src/suggest/llm/parse.rs`'s fence-stripping and JSON-repair
//! helpers.

use serde::Deserialize;

use crate::diff::model::{Category, Finding, Severity};

pub struct ParsedPass {
    pub findings: Vec<Finding>,
    pub confidence: f64,
}

#[derive(Deserialize)]
struct RawFinding {
    file: Option<String>,
    line: Option<u32>,
    severity: Option<String>,
    title: Option<String>,
    description: Option<String>,
    suggestion: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawResponse {
    #[serde(default)]
    findings: Vec<RawFinding>,
}

/// Parses one pass's raw model output into findings tagged with `category`.
/// A response that fails to parse as JSON yields zero findings at
/// confidence 0, per the graceful-degradation contract - callers never see
/// a parse error.
pub fn parse_response(raw: &str, category: Category) -> ParsedPass {
    let clean = strip_fences(raw);
    let sanitized = fix_json_issues(&clean);

    let parsed: RawResponse = match serde_json::from_str(&sanitized) {
        Ok(v) => v,
        Err(_) => return ParsedPass { findings: Vec::new(), confidence: 0.0 },
    };

    let total = parsed.findings.len();
    let mut findings = Vec::new();

    for (idx, item) in parsed.findings.into_iter().enumerate() {
        let Some(title) = item.title.filter(|t| !t.is_empty()) else { continue };
        let Some(description) = item.description.filter(|d| !d.is_empty()) else { continue };
        let line = item.line.unwrap_or(0);
        let severity = item
            .severity
            .as_deref()
            .map(parse_severity)
            .unwrap_or(Severity::Medium);

        findings.push(Finding {
            id: format!("ai-{}-{idx}", category.as_str()),
            category,
            severity,
            file: item.file.unwrap_or_default(),
            start_line: line,
            end_line: line,
            title,
            description,
            suggestion: item.suggestion,
            source: "ai-reviewer".to_string(),
            confidence: 0.7,
            metadata: None,
        });
    }

    let confidence = if total == 0 { 1.0 } else { findings.len() as f64 / total as f64 };

    ParsedPass { findings, confidence }
}

fn parse_severity(s: &str) -> Severity {
    match s.to_lowercase().as_str() {
        "critical" => Severity::Critical,
        "high" => Severity::High,
        "medium" => Severity::Medium,
        "low" => Severity::Low,
        "info" => Severity::Info,
        _ => Severity::Medium,
    }
}

fn strip_fences(text: &str) -> String {
    let trimmed = text.trim();
    let clean = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        trimmed
    };
    clean.strip_suffix("```").unwrap_or(clean).trim().to_string()
}

fn fix_json_issues(json: &str) -> String {
    let mut fixed = json.replace(",]", "]").replace(",}", "}");
    fixed = fixed
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'");
    fixed.chars().filter(|c| !c.is_control() || *c == '\n' || *c == '\t').collect()
}
