//! Report assembly: collects findings from usable analyzer results, sorts
//! them, derives diff-level stats, and renders a one-line summary. The
//! three output formatters below all consume the resulting `Report`.

pub mod json;
pub mod markdown;
pub mod terminal;

use std::time::Duration;

use uuid::Uuid;

use crate::diff::model::{AnalysisResult, Diff, DiffMetadata, Finding, Report, Severity, TrustScore};

pub fn generate(results: &[AnalysisResult], diff: &Diff, trust_score: TrustScore, duration: Duration, config: serde_json::Value) -> Report {
    let mut findings: Vec<Finding> = results
        .iter()
        .filter(|r| r.is_usable())
        .flat_map(|r| r.findings.clone())
        .collect();

    findings.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| a.file.cmp(&b.file)));

    let additions: usize = diff.files.iter().map(|f| f.additions()).sum();
    let deletions: usize = diff.files.iter().map(|f| f.deletions()).sum();

    let diff_meta = DiffMetadata {
        files_changed: diff.files.len(),
        additions,
        deletions,
        base_sha: diff.base_sha.clone(),
        head_sha: diff.head_sha.clone(),
    };

    let summary = build_summary(&trust_score, &findings);

    Report {
        id: Uuid::new_v4().simple().to_string()[..16].to_string(),
        timestamp: chrono::Utc::now(),
        trust_score,
        findings,
        summary,
        diff_meta,
        duration,
        config,
    }
}

fn build_summary(trust_score: &TrustScore, findings: &[Finding]) -> String {
    let header = format!("Trust Score: {}/100 [{}]", trust_score.score, trust_score.rating);

    if findings.is_empty() {
        return format!("{header} — no findings");
    }

    let mut parts = Vec::new();
    for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low, Severity::Info] {
        let count = findings.iter().filter(|f| f.severity == severity).count();
        if count > 0 {
            parts.push(format!("{count} {}", severity.as_str()));
        }
    }

    format!("{header} — {} findings ({})", findings.len(), parts.join(", "))
}
