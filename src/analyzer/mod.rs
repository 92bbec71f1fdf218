//! The analyzer contract: a capability `{name, analyze}` rather than a class
//! hierarchy, registered by name and fanned out in parallel by the engine.

pub mod engine;
pub mod registry;

pub use engine::{Engine, EngineOutcome};
pub use registry::{Registry, RegistryError};

use crate::cancel::CancellationToken;
use crate::diff::model::{AnalysisResult, Diff};

/// A single check over a diff. Implementations must not panic; the engine
/// tolerates it defensively but a well-behaved analyzer reports failure
/// through `AnalysisResult::failed` instead.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;
    fn analyze(&self, diff: &Diff, cancel: &CancellationToken) -> AnalysisResult;
}
