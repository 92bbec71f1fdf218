//! Token-similarity + line-proximity dedup, shared by the cross-pass merge
//! (within the LLM reviewer) and the cross-analyzer merge (AI findings
//! dropped in favor of overlapping static findings).

use std::collections::HashSet;

use crate::diff::model::Finding;

const LINE_PROXIMITY: u32 = 6;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "to", "of", "in", "on", "for",
    "and", "or", "this", "that", "with", "it", "as", "at",
];

fn significant_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// Two findings are "similar" when their descriptions' first four
/// significant words match exactly, or at least three of the first four
/// overlap as a set.
fn descriptions_similar(a: &str, b: &str) -> bool {
    let wa: Vec<String> = significant_words(a).into_iter().take(4).collect();
    let wb: Vec<String> = significant_words(b).into_iter().take(4).collect();
    if wa.is_empty() || wb.is_empty() {
        return false;
    }
    if wa == wb {
        return true;
    }
    let set_a: HashSet<&String> = wa.iter().collect();
    let overlap = wb.iter().filter(|w| set_a.contains(w)).count();
    overlap >= 3
}

fn is_duplicate(a: &Finding, b: &Finding) -> bool {
    a.file == b.file && a.start_line.abs_diff(b.start_line) <= LINE_PROXIMITY && descriptions_similar(&a.description, &b.description)
}

/// Merges `incoming` into `existing`-already-kept findings, in order.
/// On a match, the earlier finding wins unless the incoming one has
/// strictly higher severity, in which case it replaces the earlier one in
/// place. Used to fold a later pass's findings into the accumulated set
/// from earlier passes.
pub fn merge_pass(kept: &mut Vec<Finding>, incoming: Vec<Finding>) {
    for finding in incoming {
        if let Some(existing) = kept.iter_mut().find(|k| is_duplicate(k, &finding)) {
            if finding.severity.rank() > existing.severity.rank() {
                *existing = finding;
            }
        } else {
            kept.push(finding);
        }
    }
}

/// Drops any `ai` finding that duplicates a `static_findings` finding.
/// Static findings are always kept untouched.
pub fn drop_ai_duplicates_of_static(ai: Vec<Finding>, static_findings: &[Finding]) -> Vec<Finding> {
    ai.into_iter()
        .filter(|f| !static_findings.iter().any(|s| is_duplicate(s, f)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::{Category, Severity};

    fn finding(file: &str, line: u32, title: &str, description: &str, severity: Severity) -> Finding {
        Finding {
            id: format!("{file}:{line}"),
            category: Category::Logic,
            severity,
            file: file.to_string(),
            start_line: line,
            end_line: line,
            title: title.to_string(),
            description: description.to_string(),
            suggestion: None,
            source: "ai-reviewer".to_string(),
            confidence: 0.7,
            metadata: None,
        }
    }

    #[test]
    fn merge_keeps_first_seen_on_equal_severity() {
        let mut kept = vec![finding("a.rs", 10, "null deref", "null pointer dereference risk here", Severity::Medium)];
        merge_pass(&mut kept, vec![finding("a.rs", 12, "possible crash", "null pointer dereference here too", Severity::Medium)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start_line, 10);
    }

    #[test]
    fn merge_upgrades_to_higher_severity() {
        let mut kept = vec![finding("a.rs", 10, "a", "possible null pointer dereference", Severity::Low)];
        merge_pass(&mut kept, vec![finding("a.rs", 11, "b", "possible null pointer dereference", Severity::Critical)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].severity, Severity::Critical);
    }

    #[test]
    fn distant_lines_are_not_duplicates() {
        let mut kept = vec![finding("a.rs", 10, "a", "null pointer dereference risk", Severity::Medium)];
        merge_pass(&mut kept, vec![finding("a.rs", 100, "a", "null pointer dereference risk", Severity::Medium)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn differing_descriptions_with_matching_titles_are_not_merged() {
        let mut kept = vec![finding("a.rs", 10, "null pointer dereference risk", "uses an unchecked map lookup", Severity::Medium)];
        merge_pass(&mut kept, vec![finding("a.rs", 11, "null pointer dereference risk", "leaks a file handle on error", Severity::Medium)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn ai_duplicate_of_static_is_dropped() {
        let static_findings = vec![finding(
            "a.rs",
            10,
            "hardcoded secret",
            "hardcoded database credentials found in source",
            Severity::High,
        )];
        let ai = vec![finding(
            "a.rs",
            11,
            "credentials embedded in code",
            "hardcoded database credentials detected in source",
            Severity::Medium,
        )];
        let result = drop_ai_duplicates_of_static(ai, &static_findings);
        assert!(result.is_empty());
    }

    #[test]
    fn unrelated_ai_finding_survives() {
        let static_findings = vec![finding(
            "a.rs",
            10,
            "hardcoded secret",
            "hardcoded database credentials found in source",
            Severity::High,
        )];
        let ai = vec![finding("b.rs", 5, "unreachable branch", "unreachable branch in error handler", Severity::Medium)];
        let result = drop_ai_duplicates_of_static(ai, &static_findings);
        assert_eq!(result.len(), 1);
    }
}
