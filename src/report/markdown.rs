//! Markdown report formatter: emoji-badged heading, summary table, findings
//! grouped into fixed-order category sections, collapsible finding blocks.

use std::fmt::Write as _;

use crate::diff::model::{Category, Report};

const CATEGORY_ORDER: &[Category] = &[
    Category::Secrets,
    Category::Security,
    Category::Logic,
    Category::Complexity,
    Category::Coverage,
    Category::Pattern,
    Category::Import,
    Category::Convention,
];

pub fn format(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# {} Trust Score: {}/100 ({})",
        report.trust_score.rating.emoji(),
        report.trust_score.score,
        report.trust_score.rating,
    );
    out.push('\n');

    let _ = writeln!(out, "| | |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Score | {}/100 |", report.trust_score.score);
    let _ = writeln!(out, "| Rating | {} |", report.trust_score.rating);
    let _ = writeln!(out, "| Findings | {} |", report.findings.len());
    let _ = writeln!(out, "| Files changed | {} |", report.diff_meta.files_changed);
    let _ = writeln!(out, "| Lines | +{} -{} |", report.diff_meta.additions, report.diff_meta.deletions);
    for (category, penalty) in &report.trust_score.breakdown {
        let _ = writeln!(out, "| {category} penalty | -{penalty} |");
    }
    out.push('\n');

    if report.findings.is_empty() {
        out.push_str("⚪ No findings.\n\n");
    } else {
        for category in CATEGORY_ORDER {
            let in_category: Vec<_> = report.findings.iter().filter(|f| f.category == *category).collect();
            if in_category.is_empty() {
                continue;
            }
            let _ = writeln!(out, "## {category}\n");
            for finding in in_category {
                let _ = writeln!(out, "<details>");
                let _ = writeln!(out, "<summary>{} ({})</summary>\n", finding.title, finding.severity);
                let _ = writeln!(out, "- **Location:** `{}:{}`", finding.file, finding.start_line);
                let _ = writeln!(out, "- **Description:** {}", finding.description);
                if let Some(suggestion) = &finding.suggestion {
                    let _ = writeln!(out, "- **Suggestion:** {suggestion}");
                }
                let _ = writeln!(out, "- **Source:** {}", finding.source);
                let _ = writeln!(out, "- **Confidence:** {:.0}%", finding.confidence * 100.0);
                let _ = writeln!(out, "\n</details>\n");
            }
        }
    }

    let _ = writeln!(out, "---");
    let _ = writeln!(out, "_Report `{}` generated {}_", report.id, report.timestamp.to_rfc3339());

    out
}
