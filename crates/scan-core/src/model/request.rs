use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::finding::Finding;
use super::plan::{ExecutionPlan, ScopePolicy};

/// A live-endpoint probe target, nested under `dast` in the input envelope
/// (spec.md §6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DastTarget {
    pub target_url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// The orchestrator's input envelope (spec.md §6). `plan` and `scope` are
/// normally absent and constructed by the orchestrator itself (spec.md
/// §4.5 steps 2-3); callers may supply either to bypass that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub run_id: String,
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub is_pr: bool,
    #[serde(default)]
    pub changed_files: Vec<String>,
    #[serde(default)]
    pub dast: Option<DastTarget>,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub plan: Option<ExecutionPlan>,
    #[serde(default)]
    pub scope: Option<ScopePolicy>,
}

/// Pipeline exit status (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Completed,
    Blocked,
    Failed,
}

/// The orchestrator's output (spec.md §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub run_id: String,
    pub status: ScanStatus,
    pub tools: Vec<String>,
    pub findings: Vec<Finding>,
}
