//! JSON report formatter: pretty-printed, two-space indent, the canonical
//! serialisation of `Report` (`Finding.error` is never serialised because
//! `AnalysisResult`, not `Finding`, carries that field).

use crate::diff::model::Report;

pub fn format(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{DiffMetadata, Rating, TrustScore};
    use std::collections::BTreeMap;
    use std::time::Duration;

    #[test]
    fn formats_with_two_space_indent() {
        let report = Report {
            id: "abcdef0123456789".into(),
            timestamp: chrono::Utc::now(),
            trust_score: TrustScore {
                score: 90,
                rating: Rating::Green,
                breakdown: BTreeMap::new(),
                finding_count: BTreeMap::new(),
            },
            findings: Vec::new(),
            summary: "Trust Score: 90/100 [GREEN] — no findings".into(),
            diff_meta: DiffMetadata {
                files_changed: 0,
                additions: 0,
                deletions: 0,
                base_sha: "a".into(),
                head_sha: "b".into(),
            },
            duration: Duration::default(),
            config: serde_json::Value::Null,
        };
        let text = format(&report).unwrap();
        assert!(text.starts_with('{'));
        assert!(text.contains("  \"id\""));
    }
}
