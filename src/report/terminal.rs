//! ANSI-coloured terminal formatter: colour-by-severity, grounded in the
//! teacher's `score.rs::HealthScore`-style bucketed-match colour convention,
//! reimplemented with `colored` instead of `ratatui::style::Color` since the
//! report prints once rather than inside a TUI frame.

use colored::{Color, Colorize};

use crate::diff::model::{Rating, Report, Severity};

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Red,
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Blue,
        Severity::Info => Color::White,
    }
}

fn rating_color(rating: Rating) -> Color {
    match rating {
        Rating::Green => Color::Green,
        Rating::Yellow => Color::Yellow,
        Rating::Red => Color::Red,
    }
}

pub fn format(report: &Report) -> String {
    let mut out = String::new();

    out.push_str(
        &format!(
            "{} {}\n",
            report.trust_score.rating.emoji(),
            format!("Trust Score: {}/100 [{}]", report.trust_score.score, report.trust_score.rating)
                .color(rating_color(report.trust_score.rating))
                .bold(),
        ),
    );
    out.push_str(&format!("{}\n\n", report.summary.dimmed()));

    for severity in [Severity::Critical, Severity::High, Severity::Medium, Severity::Low, Severity::Info] {
        let findings: Vec<_> = report.findings.iter().filter(|f| f.severity == severity).collect();
        if findings.is_empty() {
            continue;
        }
        out.push_str(&format!("{}\n", severity.as_str().to_uppercase().color(severity_color(severity)).bold()));
        for finding in findings {
            out.push_str(&format!("  {}\n", finding.title.bold()));
            out.push_str(&format!("  {}\n", format!("{}:{}", finding.file, finding.start_line).dimmed()));
            out.push_str(&format!("  {}\n", finding.description));
            if let Some(suggestion) = &finding.suggestion {
                out.push_str(&format!("  {} {}\n", "->".cyan(), suggestion.cyan()));
            }
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "{}\n",
        format!("{} findings · report {}", report.findings.len(), report.id).dimmed()
    ));

    out
}
