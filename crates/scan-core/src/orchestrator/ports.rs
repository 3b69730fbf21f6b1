use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::model::ScanResult;
use crate::normalize::{ConfigProbeResult, DastRawRecord, SastRawResult, ScaMatch};

/// One free async function per tool family rather than one polymorphic
/// trait, mirroring how the original keeps one module per runner
/// (SPEC_FULL.md §4.3). Each port raises only on an execution error — "no
/// findings" is always `Ok(vec![])`/`Ok(None)`.

#[async_trait]
pub trait SastAdapter: Send + Sync {
    async fn run(&self, repo_path: &Path, languages: &[String]) -> anyhow::Result<Vec<SastRawResult>>;
}

#[async_trait]
pub trait SbomAdapter: Send + Sync {
    /// Produces a CycloneDX JSON file under `repo_path` and returns its
    /// path. Failure here always raises (spec.md §4.3).
    async fn generate(&self, repo_path: &Path) -> anyhow::Result<std::path::PathBuf>;
}

#[async_trait]
pub trait ScaAdapter: Send + Sync {
    async fn run(&self, sbom_path: &Path) -> anyhow::Result<Vec<ScaMatch>>;
}

#[async_trait]
pub trait DastAdapter: Send + Sync {
    async fn run(
        &self,
        target_url: &str,
        headers: &HashMap<String, String>,
    ) -> anyhow::Result<Vec<DastRawRecord>>;
}

#[async_trait]
pub trait ConfigAdapter: Send + Sync {
    async fn probe(&self, target_url: &str) -> anyhow::Result<ConfigProbeResult>;
}

/// External callback sink; analogous to [`crate::planner::ModelProvider`]
/// (spec.md §6, "Callback"). A failure here is logged, never fatal
/// (spec.md §7).
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn send(&self, result: &ScanResult) -> anyhow::Result<()>;
}

/// Bundles whichever adapters the embedder has wired up. Any of them may
/// be absent; the orchestrator treats a missing adapter for a plan flag
/// that is set as a tool-execution error (SYSTEM finding), not a panic.
#[derive(Default)]
pub struct AnalyzerAdapters {
    pub sast: Option<Box<dyn SastAdapter>>,
    pub sbom: Option<Box<dyn SbomAdapter>>,
    pub sca: Option<Box<dyn ScaAdapter>>,
    pub dast: Option<Box<dyn DastAdapter>>,
    pub config: Option<Box<dyn ConfigAdapter>>,
}
