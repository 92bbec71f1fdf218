//! Weighted-penalty trust score: severity weights times category
//! multipliers, capped per category, floored when no critical/high findings
//! exist.

use std::collections::BTreeMap;

use crate::diff::model::{AnalysisResult, Category, Rating, Severity, TrustScore};

const CATEGORY_PENALTY_CAP: f64 = 25.0;
const CRITICAL_CATEGORY_PENALTY_CAP: f64 = 40.0;
const MIN_SCORE_NO_CRITICAL_NO_HIGH: i64 = 30;
const MIN_SCORE_NO_CRITICAL: i64 = 15;

fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Critical => 25.0,
        Severity::High => 15.0,
        Severity::Medium => 8.0,
        Severity::Low => 3.0,
        Severity::Info => 0.0,
    }
}

fn category_multiplier(category: Category) -> f64 {
    match category {
        Category::Security => 1.5,
        Category::Secrets => 2.0,
        Category::Logic => 1.3,
        Category::Complexity => 0.8,
        Category::Coverage => 0.4,
        Category::Pattern => 0.5,
        Category::Import => 0.3,
        Category::Convention => 0.3,
    }
}

pub struct Scorer {
    pub green_threshold: u8,
    pub yellow_threshold: u8,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            green_threshold: 80,
            yellow_threshold: 50,
        }
    }
}

impl Scorer {
    pub fn score(&self, results: &[AnalysisResult]) -> TrustScore {
        let mut category_penalty: BTreeMap<Category, f64> = BTreeMap::new();
        let mut category_has_critical_or_high: BTreeMap<Category, bool> = BTreeMap::new();
        let mut finding_count: BTreeMap<Severity, usize> = BTreeMap::new();
        let mut has_critical = false;
        let mut has_high = false;

        for result in results {
            if !result.is_usable() {
                continue;
            }
            for finding in &result.findings {
                *finding_count.entry(finding.severity).or_insert(0) += 1;

                if finding.severity == Severity::Critical {
                    has_critical = true;
                }
                if finding.severity == Severity::High {
                    has_high = true;
                }
                if matches!(finding.severity, Severity::Critical | Severity::High) {
                    *category_has_critical_or_high.entry(finding.category).or_insert(false) = true;
                }

                let confidence = if finding.confidence <= 0.0 { 1.0 } else { finding.confidence };
                let penalty = severity_weight(finding.severity) * category_multiplier(finding.category) * confidence;
                *category_penalty.entry(finding.category).or_insert(0.0) += penalty;
            }
        }

        let mut breakdown = BTreeMap::new();
        let mut total_penalty = 0.0;
        for (category, penalty) in &category_penalty {
            let cap = if matches!(category, Category::Security | Category::Secrets)
                && category_has_critical_or_high.get(category).copied().unwrap_or(false)
            {
                CRITICAL_CATEGORY_PENALTY_CAP
            } else {
                CATEGORY_PENALTY_CAP
            };
            let capped = penalty.min(cap);
            breakdown.insert(*category, capped.round() as i64);
            total_penalty += capped;
        }

        let mut score = (100.0 - total_penalty.round()).clamp(0.0, 100.0) as i64;

        if !has_critical && !has_high {
            score = score.max(MIN_SCORE_NO_CRITICAL_NO_HIGH);
        } else if !has_critical {
            score = score.max(MIN_SCORE_NO_CRITICAL);
        }
        let score = score.clamp(0, 100) as u8;

        let rating = if score >= self.green_threshold {
            Rating::Green
        } else if score >= self.yellow_threshold {
            Rating::Yellow
        } else {
            Rating::Red
        };

        TrustScore {
            score,
            rating,
            breakdown,
            finding_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::Finding;
    use std::time::Duration;

    fn finding(category: Category, severity: Severity) -> Finding {
        Finding {
            id: "id".into(),
            category,
            severity,
            file: "f.rs".into(),
            start_line: 1,
            end_line: 1,
            title: "t".into(),
            description: "d".into(),
            suggestion: None,
            source: "test".into(),
            confidence: 0.9,
            metadata: None,
        }
    }

    #[test]
    fn no_findings_scores_100_green() {
        let score = Scorer::default().score(&[AnalysisResult::ok("secrets", vec![], Duration::default())]);
        assert_eq!(score.score, 100);
        assert_eq!(score.rating, Rating::Green);
    }

    #[test]
    fn errored_results_are_skipped() {
        let results = vec![AnalysisResult::failed("secrets", "boom")];
        let score = Scorer::default().score(&results);
        assert_eq!(score.score, 100);
    }

    #[test]
    fn floor_applies_with_no_critical_or_high() {
        let findings: Vec<Finding> = (0..20).map(|_| finding(Category::Pattern, Severity::Medium)).collect();
        let results = vec![AnalysisResult::ok("patterns", findings, Duration::default())];
        let score = Scorer::default().score(&results);
        assert!(score.score >= 30);
    }

    #[test]
    fn floor_applies_with_high_but_no_critical() {
        let findings: Vec<Finding> = (0..20).map(|_| finding(Category::Secrets, Severity::High)).collect();
        let results = vec![AnalysisResult::ok("secrets", findings, Duration::default())];
        let score = Scorer::default().score(&results);
        assert!(score.score >= 15);
    }

    #[test]
    fn critical_findings_can_drive_score_to_zero() {
        let findings: Vec<Finding> = (0..20).map(|_| finding(Category::Secrets, Severity::Critical)).collect();
        let results = vec![AnalysisResult::ok("secrets", findings, Duration::default())];
        let score = Scorer::default().score(&results);
        assert_eq!(score.score, 0);
        assert_eq!(score.rating, Rating::Red);
    }

    #[test]
    fn category_penalty_is_capped() {
        let findings: Vec<Finding> = (0..5).map(|_| finding(Category::Pattern, Severity::Medium)).collect();
        let results = vec![AnalysisResult::ok("patterns", findings, Duration::default())];
        let score = Scorer::default().score(&results);
        assert_eq!(*score.breakdown.get(&Category::Pattern).unwrap(), 25);
    }

    #[test]
    fn doubling_identical_findings_never_drops_more_than_one_cap() {
        let one: Vec<Finding> = vec![finding(Category::Pattern, Severity::Medium)];
        let many: Vec<Finding> = (0..20).map(|_| finding(Category::Pattern, Severity::Medium)).collect();
        let base = Scorer::default().score(&[AnalysisResult::ok("patterns", one, Duration::default())]);
        let doubled = Scorer::default().score(&[AnalysisResult::ok("patterns", many, Duration::default())]);
        assert!(base.score as i64 - doubled.score as i64 <= CATEGORY_PENALTY_CAP as i64);
    }
}
