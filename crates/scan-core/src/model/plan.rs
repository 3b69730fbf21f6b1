use serde::{Deserialize, Serialize};

/// Safe metadata handed to the Planner. Never source code, never secrets
/// (spec.md §3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentContext {
    pub repo_id: String,
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
    pub has_public_endpoint: bool,
}

/// Hard resource ceilings carried by both a [`ScopePolicy`] and an
/// [`ExecutionPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLimits {
    pub max_runtime_seconds: u32,
    pub max_requests: u32,
}

impl ScanLimits {
    /// Elementwise minimum, used by the Planner's model/baseline merge and
    /// by the Gatekeeper's clamp (spec.md §4.1/§4.2).
    pub fn elementwise_min(self, other: ScanLimits) -> ScanLimits {
        ScanLimits {
            max_runtime_seconds: self.max_runtime_seconds.min(other.max_runtime_seconds),
            max_requests: self.max_requests.min(other.max_requests),
        }
    }
}

/// The plan produced by the Planner and clamped by the Gatekeeper.
/// Immutable once the Gatekeeper returns it (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub run_sast: bool,
    pub run_sca: bool,
    pub run_dast: bool,
    pub reason: String,
    pub limits: ScanLimits,
}

/// Immutable allowlists and hard ceilings governing what a run may touch
/// (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopePolicy {
    #[serde(default)]
    pub allowed_repo_prefixes: Vec<String>,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default = "default_schemes")]
    pub allowed_schemes: Vec<String>,
    pub max_requests: u32,
    pub max_runtime_seconds: u32,
    #[serde(default)]
    pub safe_mode: bool,
}

fn default_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

impl ScopePolicy {
    /// The orchestrator's fallback scope when none is supplied: localhost
    /// only, conservative limits (spec.md §4.5 step 3).
    pub fn local_default() -> Self {
        ScopePolicy {
            allowed_repo_prefixes: Vec::new(),
            allowed_domains: vec!["localhost".to_string()],
            allowed_schemes: default_schemes(),
            max_requests: 200,
            max_runtime_seconds: 300,
            safe_mode: true,
        }
    }
}
