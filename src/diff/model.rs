//! Entities for parsed diffs, hunks, lines, findings, scores, and reports.
//!
//! These are produced once per pipeline invocation and never mutated after
//! creation by a later stage (see spec §3 "Lifecycle").

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Ordered high -> low. Declaration order backs the derived `Ord` impl,
/// which the report generator relies on to sort findings severity-ascending
/// (critical first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Rank used by LLM dedup to decide which of two duplicate findings to
    /// keep (higher rank wins).
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 5,
            Severity::High => 4,
            Severity::Medium => 3,
            Severity::Low => 2,
            Severity::Info => 1,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Complexity,
    Coverage,
    Security,
    Secrets,
    Pattern,
    Import,
    Logic,
    Convention,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Complexity => "complexity",
            Category::Coverage => "coverage",
            Category::Security => "security",
            Category::Secrets => "secrets",
            Category::Pattern => "pattern",
            Category::Import => "import",
            Category::Logic => "logic",
            Category::Convention => "convention",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Complexity,
            Category::Coverage,
            Category::Security,
            Category::Secrets,
            Category::Pattern,
            Category::Import,
            Category::Logic,
            Category::Convention,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "GREEN")]
    Green,
    #[serde(rename = "YELLOW")]
    Yellow,
    #[serde(rename = "RED")]
    Red,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Green => "GREEN",
            Rating::Yellow => "YELLOW",
            Rating::Red => "RED",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Rating::Green => "🟢",
            Rating::Yellow => "🟡",
            Rating::Red => "🔴",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Added => "added",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Renamed => "renamed",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Commit-status state reported to a VCS host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Pending,
    Success,
    Failure,
    Error,
}

impl StatusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusState::Pending => "pending",
            StatusState::Success => "success",
            StatusState::Failure => "failure",
            StatusState::Error => "error",
        }
    }
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single line of content at a known line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub number: u32,
    pub content: String,
}

/// A contiguous changed region of a file in a unified diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hunk {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// Raw hunk body (the lines following the `@@ ... @@` header, including
    /// their `+`/`-`/` ` prefixes), before splitting into added/removed.
    pub content: String,
    pub added_lines: Vec<Line>,
    pub removed_lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDiff {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub status: FileStatus,
    pub hunks: Vec<Hunk>,
    pub language: String,
    pub is_binary: bool,
}

impl FileDiff {
    pub fn additions(&self) -> usize {
        self.hunks.iter().map(|h| h.added_lines.len()).sum()
    }

    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(|h| h.removed_lines.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diff {
    pub base_sha: String,
    pub head_sha: String,
    pub files: Vec<FileDiff>,
    #[serde(default)]
    pub pr_title: String,
    #[serde(default)]
    pub pr_body: String,
    #[serde(default)]
    pub author: String,
}

/// A single reported issue about a diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    pub source: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl Finding {
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value);
        self
    }
}

/// The outcome of running one analyzer over a diff. A non-`None` `error`
/// marks the result as unusable; downstream stages skip it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analyzer_name: String,
    pub findings: Vec<Finding>,
    pub duration: std::time::Duration,
    #[serde(skip)]
    pub error: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AnalysisResult {
    pub fn ok(analyzer_name: impl Into<String>, findings: Vec<Finding>, duration: std::time::Duration) -> Self {
        Self {
            analyzer_name: analyzer_name.into(),
            findings,
            duration,
            error: None,
            metadata: HashMap::new(),
        }
    }

    pub fn failed(analyzer_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            analyzer_name: analyzer_name.into(),
            findings: Vec::new(),
            duration: std::time::Duration::default(),
            error: Some(error.into()),
            metadata: HashMap::new(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustScore {
    pub score: u8,
    pub rating: Rating,
    pub breakdown: BTreeMap<Category, i64>,
    pub finding_count: BTreeMap<Severity, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffMetadata {
    pub files_changed: usize,
    pub additions: usize,
    pub deletions: usize,
    pub base_sha: String,
    pub head_sha: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub trust_score: TrustScore,
    pub findings: Vec<Finding>,
    pub summary: String,
    pub diff_meta: DiffMetadata,
    pub duration: std::time::Duration,
    #[serde(default)]
    pub config: serde_json::Value,
}
