//! Parallel fan-out over enabled analyzers: a task per analyzer, sharing a
//! read-only `Diff`, collected through rayon's scoped collector.

use std::time::Instant;

use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::diff::model::{AnalysisResult, Diff};

use super::registry::Registry;

pub struct Engine<'a> {
    registry: &'a Registry,
}

pub struct EngineOutcome {
    pub results: Vec<AnalysisResult>,
    pub cancelled: bool,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Runs every enabled analyzer concurrently. An analyzer panicking or
    /// observing cancellation produces a failed result rather than
    /// aborting its peers; the engine always waits for all of them before
    /// returning.
    pub fn run(&self, diff: &Diff, cancel: &CancellationToken) -> EngineOutcome {
        let analyzers = self.registry.enabled_analyzers();

        let results: Vec<AnalysisResult> = analyzers
            .par_iter()
            .map(|analyzer| {
                if cancel.is_cancelled() {
                    return AnalysisResult::failed(analyzer.name(), "cancelled");
                }
                let start = Instant::now();
                let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    analyzer.analyze(diff, cancel)
                }));
                match outcome {
                    Ok(mut result) => {
                        result.duration = start.elapsed();
                        result
                    }
                    Err(_) => AnalysisResult::failed(analyzer.name(), "analyzer panicked"),
                }
            })
            .collect();

        EngineOutcome {
            cancelled: cancel.is_cancelled(),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::model::Finding;
    use crate::analyzer::Analyzer;
    use std::sync::Arc;

    struct AlwaysOk;
    impl Analyzer for AlwaysOk {
        fn name(&self) -> &str {
            "always-ok"
        }
        fn analyze(&self, _diff: &Diff, _cancel: &CancellationToken) -> AnalysisResult {
            AnalysisResult::ok("always-ok", Vec::new(), std::time::Duration::default())
        }
    }

    struct AlwaysFails;
    impl Analyzer for AlwaysFails {
        fn name(&self) -> &str {
            "always-fails"
        }
        fn analyze(&self, _diff: &Diff, _cancel: &CancellationToken) -> AnalysisResult {
            AnalysisResult::failed("always-fails", "boom")
        }
    }

    fn blank_diff() -> Diff {
        Diff {
            base_sha: String::new(),
            head_sha: String::new(),
            files: Vec::new(),
            pr_title: String::new(),
            pr_body: String::new(),
            author: String::new(),
        }
    }

    #[test]
    fn partial_failure_does_not_abort_peers() {
        let registry = Registry::new();
        registry.register(Arc::new(AlwaysOk)).unwrap();
        registry.register(Arc::new(AlwaysFails)).unwrap();

        let engine = Engine::new(&registry);
        let outcome = engine.run(&blank_diff(), &CancellationToken::new());

        assert_eq!(outcome.results.len(), 2);
        assert!(!outcome.cancelled);
        let ok = outcome
            .results
            .iter()
            .find(|r| r.analyzer_name == "always-ok")
            .unwrap();
        assert!(ok.is_usable());
        let failed = outcome
            .results
            .iter()
            .find(|r| r.analyzer_name == "always-fails")
            .unwrap();
        assert!(!failed.is_usable());
    }

    #[test]
    fn cancellation_short_circuits_pending_analyzers() {
        let registry = Registry::new();
        registry.register(Arc::new(AlwaysOk)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let engine = Engine::new(&registry);
        let outcome = engine.run(&blank_diff(), &cancel);

        assert!(outcome.cancelled);
        assert!(!outcome.results[0].is_usable());
    }

    #[test]
    fn finding_metadata_round_trips() {
        let f = Finding {
            id: "x".into(),
            category: crate::diff::model::Category::Pattern,
            severity: crate::diff::model::Severity::Low,
            file: "a.rs".into(),
            start_line: 1,
            end_line: 1,
            title: "t".into(),
            description: "d".into(),
            suggestion: None,
            source: "patterns".into(),
            confidence: 1.0,
            metadata: None,
        }
        .with_metadata("k", serde_json::json!("v"));
        assert_eq!(f.metadata.unwrap().get("k").unwrap(), "v");
    }
}
