//! CLI surface (`scan`, `ci`), constrained by spec §6. The full dispatcher
//! that resolves a VCS collaborator, posts comments, and detects CI
//! platforms beyond environment-variable sniffing is out of scope; these
//! commands drive the core pipeline directly against a diff file or stdin,
//! in `legacy_src/main.rs`'s `#[derive(Parser)]` style.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, FailOn, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "shipsafe", version, about = "Self-hosted code-verification gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a diff and print a trust report.
    Scan(ScanArgs),
    /// Run in CI: auto-detects the platform, scores the diff, and exits
    /// non-zero per `ci.failOn`.
    Ci(CiArgs),
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to a unified-diff file. Reads stdin if omitted.
    #[arg(long)]
    pub diff: Option<PathBuf>,

    /// Repository root (unused by the core; reserved for future local-scan support).
    #[arg(default_value = ".")]
    pub target_dir: PathBuf,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormatArg>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct CiArgs {
    #[arg(long)]
    pub diff: Option<PathBuf>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormatArg {
    Terminal,
    Json,
    Markdown,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Terminal => OutputFormat::Terminal,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

/// CI platform sniffed from environment variables, per spec §6.
#[derive(Debug, PartialEq, Eq)]
pub enum CiPlatform {
    GitHub,
    Forgejo,
    GitLab,
    None,
}

pub fn detect_ci_platform() -> CiPlatform {
    if std::env::var("GITHUB_ACTIONS").is_ok() {
        CiPlatform::GitHub
    } else if std::env::var("FORGEJO_ACTIONS").is_ok() || std::env::var("GITEA_ACTIONS").is_ok() {
        CiPlatform::Forgejo
    } else if std::env::var("GITLAB_CI").is_ok() {
        CiPlatform::GitLab
    } else {
        CiPlatform::None
    }
}

/// Exit code contribution from `ci.failOn` given a rating. `1` means fail.
pub fn ci_exit_code(fail_on: FailOn, rating: crate::diff::model::Rating) -> i32 {
    use crate::diff::model::Rating::*;
    let should_fail = match fail_on {
        FailOn::Red => rating == Red,
        FailOn::Yellow => matches!(rating, Red | Yellow),
    };
    if should_fail {
        1
    } else {
        0
    }
}

pub fn scan_exit_code(rating: crate::diff::model::Rating) -> i32 {
    if rating == crate::diff::model::Rating::Red {
        1
    } else {
        0
    }
}

pub fn resolve_format(config: &Config, override_format: Option<OutputFormatArg>) -> OutputFormat {
    override_format.map(Into::into).unwrap_or(config.output.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::Rating;

    #[test]
    fn fail_on_red_only_fails_on_red() {
        assert_eq!(ci_exit_code(FailOn::Red, Rating::Yellow), 0);
        assert_eq!(ci_exit_code(FailOn::Red, Rating::Red), 1);
    }

    #[test]
    fn fail_on_yellow_fails_on_red_and_yellow() {
        assert_eq!(ci_exit_code(FailOn::Yellow, Rating::Yellow), 1);
        assert_eq!(ci_exit_code(FailOn::Yellow, Rating::Red), 1);
        assert_eq!(ci_exit_code(FailOn::Yellow, Rating::Green), 0);
    }

    #[test]
    fn scan_exit_code_only_fails_on_red() {
        assert_eq!(scan_exit_code(Rating::Green), 0);
        assert_eq!(scan_exit_code(Rating::Yellow), 0);
        assert_eq!(scan_exit_code(Rating::Red), 1);
    }
}
