//! Orchestrates the three AI review passes: semantic, logic, convention.
//! Runs sequentially (not via the analyzer engine's parallel fan-out) so a
//! single provider's rate limit governs all three, and so cancellation
//! between passes is cheap to honor.

use std::time::Instant;

use crate::analyzer::Analyzer;
use crate::cancel::CancellationToken;
use crate::diff::model::{AnalysisResult, Diff};

use super::client::LlmClient;
use super::{context, dedup, parse, prompts};

const MIN_PASS_CONFIDENCE: f64 = 0.3;
const DEFAULT_MAX_TOKEN_BUDGET: usize = 8_000;

pub struct LlmReviewer {
    client: LlmClient,
    max_token_budget: usize,
}

impl LlmReviewer {
    pub fn new(client: LlmClient) -> Self {
        Self { client, max_token_budget: DEFAULT_MAX_TOKEN_BUDGET }
    }

    pub fn with_token_budget(client: LlmClient, max_token_budget: usize) -> Self {
        Self { client, max_token_budget }
    }

    /// Runs the full review. Provider unavailability or a single pass's
    /// parse/transport failure degrades gracefully to fewer findings. A
    /// cancellation, by contrast, aborts the whole review with a failed
    /// result carrying the upstream cancellation error - a cancelled
    /// review must never look like a clean empty one.
    pub async fn review(&self, diff: &Diff, cancel: &CancellationToken) -> AnalysisResult {
        let start = Instant::now();

        if cancel.is_cancelled() {
            return AnalysisResult::failed(self.name(), crate::error::ShipSafeError::Cancelled.to_string());
        }

        if !self.client.is_available().await {
            return AnalysisResult::ok(self.name(), Vec::new(), start.elapsed());
        }

        let ctx = context::build(diff, self.max_token_budget);
        let mut findings = Vec::new();

        for prompt in [prompts::semantic(), prompts::logic(), prompts::convention()] {
            if cancel.is_cancelled() {
                return AnalysisResult::failed(self.name(), crate::error::ShipSafeError::Cancelled.to_string());
            }

            let user_message = prompts::render_user_message(&prompt, &ctx);
            let raw = match self.client.chat(prompt.system, &user_message, cancel).await {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(category = ?prompt.category, error = %err, "ai review pass failed, skipping");
                    continue;
                }
            };

            let parsed = parse::parse_response(&raw, prompt.category);
            if parsed.confidence < MIN_PASS_CONFIDENCE {
                tracing::warn!(category = ?prompt.category, confidence = parsed.confidence, "ai review pass below confidence floor, discarding");
                continue;
            }

            dedup::merge_pass(&mut findings, parsed.findings);
        }

        AnalysisResult::ok(self.name(), findings, start.elapsed())
    }

    fn name(&self) -> &str {
        "ai-reviewer"
    }
}

// Not registered with the static-analyzer `Registry`: the engine's rayon
// fan-out assumes synchronous, CPU-bound work, while review passes are
// network-bound and sequential by design. `Analyzer` is implemented only
// so the reviewer can share `AnalysisResult` construction helpers and be
// referenced uniformly by the report generator.
impl Analyzer for LlmReviewer {
    fn name(&self) -> &str {
        "ai-reviewer"
    }

    fn analyze(&self, _diff: &Diff, _cancel: &CancellationToken) -> AnalysisResult {
        AnalysisResult::failed(self.name(), "ai-reviewer must be invoked via review(), not analyze()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;

    fn diff() -> Diff {
        Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: Vec::new(),
            pr_title: String::new(),
            pr_body: String::new(),
            author: String::new(),
        }
    }

    #[tokio::test]
    async fn unavailable_provider_yields_zero_findings_not_an_error() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            model: "test-model".to_string(),
            api_key: "sk-test".to_string(),
            provider_type: "openai-compatible".to_string(),
        };
        let reviewer = LlmReviewer::new(LlmClient::new(config));
        let cancel = CancellationToken::new();
        let result = reviewer.review(&diff(), &cancel).await;
        assert!(result.is_usable());
        assert!(result.findings.is_empty());
    }

    #[tokio::test]
    async fn cancellation_before_start_short_circuits() {
        let config = LlmConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            model: "test-model".to_string(),
            api_key: "sk-test".to_string(),
            provider_type: "openai-compatible".to_string(),
        };
        let reviewer = LlmReviewer::new(LlmClient::new(config));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = reviewer.review(&diff(), &cancel).await;
        assert!(!result.is_usable());
        assert!(result.findings.is_empty());
    }
}
