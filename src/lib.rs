//! Self-hosted code-verification gateway core: unified-diff parser, a
//! parallel static-analyzer engine, an optional AI reviewer, a weighted
//! trust scorer, and report formatters. The CLI and any VCS integration
//! are thin shells around [`Pipeline`].

pub mod analyzer;
pub mod analyzers;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod llm;
pub mod report;
pub mod scorer;
pub mod vcs;

use std::sync::Arc;
use std::time::Instant;

use analyzer::{Analyzer, Registry};
use analyzers::{ComplexityAnalyzer, CoverageAnalyzer, ImportsAnalyzer, PatternsAnalyzer, SecretsAnalyzer};
use cancel::CancellationToken;
use config::Config;
use diff::model::{Diff, Report};
use error::Result;
use llm::{LlmClient, LlmConfig, LlmReviewer};
use scorer::Scorer;

/// Wires together the analyzer registry, the optional AI reviewer, and the
/// scorer/report stages for one configuration. Built once per invocation;
/// stateless across diffs.
pub struct Pipeline {
    registry: Registry,
    scorer: Scorer,
    reviewer: Option<LlmReviewer>,
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let registry = Registry::new();

        register(&registry, Arc::new(SecretsAnalyzer), config.analyzers.secrets.enabled)?;
        register(&registry, Arc::new(PatternsAnalyzer), config.analyzers.patterns.enabled)?;
        register(
            &registry,
            Arc::new(ComplexityAnalyzer {
                threshold: config.analyzers.complexity.threshold,
                high_threshold: analyzers::complexity::HIGH_THRESHOLD,
            }),
            config.analyzers.complexity.enabled,
        )?;
        register(&registry, Arc::new(CoverageAnalyzer), config.analyzers.coverage.enabled)?;
        register(&registry, Arc::new(ImportsAnalyzer), config.analyzers.imports.enabled)?;

        let reviewer = if config.ai.enabled {
            config.ai_api_key().map(|api_key| {
                LlmReviewer::new(LlmClient::new(LlmConfig {
                    endpoint: config.ai.endpoint.clone(),
                    model: config.ai.model.clone(),
                    api_key,
                    provider_type: config.ai.provider.clone(),
                }))
            })
        } else {
            None
        };

        let scorer = Scorer {
            green_threshold: config.thresholds.green,
            yellow_threshold: config.thresholds.yellow,
        };

        Ok(Self { registry, scorer, reviewer, config })
    }

    /// Runs the static analyzers and, if configured, the AI reviewer over
    /// `diff`, then scores and assembles the final `Report`. Cancellation
    /// observed by the analyzer engine aborts the pipeline with
    /// `ShipSafeError::Cancelled` rather than returning a partial report.
    pub async fn run(&self, diff: Diff, cancel: &CancellationToken) -> Result<Report> {
        let start = Instant::now();

        let engine = analyzer::Engine::new(&self.registry);
        let outcome = engine.run(&diff, cancel);
        if outcome.cancelled {
            return Err(error::ShipSafeError::Cancelled);
        }
        let mut results = outcome.results;

        if let Some(reviewer) = &self.reviewer {
            if cancel.is_cancelled() {
                return Err(error::ShipSafeError::Cancelled);
            }
            let mut ai_result = reviewer.review(&diff, cancel).await;
            if cancel.is_cancelled() {
                return Err(error::ShipSafeError::Cancelled);
            }
            let static_findings: Vec<_> = results.iter().filter(|r| r.is_usable()).flat_map(|r| r.findings.clone()).collect();
            ai_result.findings = llm::dedup::drop_ai_duplicates_of_static(ai_result.findings, &static_findings);
            results.push(ai_result);
        }

        let trust_score = self.scorer.score(&results);
        let config_json = serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null);

        Ok(report::generate(&results, &diff, trust_score, start.elapsed(), config_json))
    }
}

fn register(registry: &Registry, analyzer: Arc<dyn Analyzer>, enabled: bool) -> Result<()> {
    let name = analyzer.name().to_string();
    registry
        .register(analyzer)
        .map_err(|e| error::ShipSafeError::Config(e.to_string()))?;
    registry.set_enabled(&name, enabled);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diff::model::FileStatus;

    fn sample_diff() -> Diff {
        Diff {
            base_sha: "a".into(),
            head_sha: "b".into(),
            files: vec![diff::model::FileDiff {
                path: "src/lib.rs".into(),
                old_path: None,
                status: FileStatus::Modified,
                language: "rust".into(),
                is_binary: false,
                hunks: vec![diff::model::Hunk {
                    old_start: 1,
                    old_lines: 1,
                    new_start: 1,
                    new_lines: 1,
                    content: "+let password = \"hunter2hunter2hunter2\";".into(),
                    added_lines: vec![diff::model::Line { number: 1, content: "let password = \"hunter2hunter2hunter2\";".into() }],
                    removed_lines: Vec::new(),
                }],
            }],
            pr_title: "test".into(),
            pr_body: String::new(),
            author: "tester".into(),
        }
    }

    #[tokio::test]
    async fn pipeline_runs_without_ai_and_produces_a_report() {
        let pipeline = Pipeline::new(Config::default()).unwrap();
        let cancel = CancellationToken::new();
        let report = pipeline.run(sample_diff(), &cancel).await.unwrap();
        assert!(!report.findings.is_empty());
        assert!(report.trust_score.score <= 100);
    }

    #[tokio::test]
    async fn cancelled_before_run_yields_a_cancelled_error() {
        let pipeline = Pipeline::new(Config::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = pipeline.run(sample_diff(), &cancel).await;
        assert!(matches!(result, Err(error::ShipSafeError::Cancelled)));
    }
}
