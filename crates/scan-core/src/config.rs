//! YAML-backed pipeline configuration (SPEC_FULL.md §2, "Config loading").
//!
//! Embedders load a [`PipelineConfig`] once at startup and hand its parts to
//! the orchestrator/planner/remediation entry points; `scan-core` itself
//! never reads a file from disk. Every field is defaulted so a partial
//! config (or an empty one) is always safe to deserialize.

use serde::{Deserialize, Serialize};

use crate::model::ScopePolicy;
use crate::planner::PlannerOptions;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub scope: ScopePolicy,
    pub planner: PlannerConfig,
    pub remediation: RemediationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            scope: ScopePolicy::local_default(),
            planner: PlannerConfig::default(),
            remediation: RemediationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PlannerConfig {
    pub model_endpoint: Option<String>,
    pub max_retries: u32,
    pub timeout_seconds: u64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            model_endpoint: None,
            max_retries: 1,
            timeout_seconds: 15,
        }
    }
}

impl PlannerConfig {
    pub fn to_options(&self) -> PlannerOptions {
        PlannerOptions {
            max_retries: self.max_retries,
            timeout: std::time::Duration::from_secs(self.timeout_seconds),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct RemediationConfig {
    pub enabled: bool,
}

/// Parses a `PipelineConfig` from a YAML document. Missing sections and
/// missing fields within a section fall back to their defaults.
pub fn from_yaml_str(raw: &str) -> Result<PipelineConfig, serde_yaml::Error> {
    serde_yaml::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = from_yaml_str("").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn partial_document_only_overrides_named_fields() {
        let cfg = from_yaml_str(
            r#"
planner:
  max_retries: 3
"#,
        )
        .unwrap();
        assert_eq!(cfg.planner.max_retries, 3);
        assert_eq!(cfg.planner.timeout_seconds, 15);
        assert_eq!(cfg.scope, ScopePolicy::local_default());
    }

    #[test]
    fn full_document_round_trips() {
        let raw = r#"
scope:
  allowed_repo_prefixes: ["https://github.com/acme/"]
  allowed_domains: ["acme.example"]
  allowed_schemes: ["https"]
  max_requests: 50
  max_runtime_seconds: 120
  safe_mode: true
planner:
  model_endpoint: "https://planner.internal/complete"
  max_retries: 2
  timeout_seconds: 20
remediation:
  enabled: true
"#;
        let cfg = from_yaml_str(raw).unwrap();
        assert_eq!(cfg.scope.max_requests, 50);
        assert!(cfg.scope.safe_mode);
        assert_eq!(
            cfg.planner.model_endpoint.as_deref(),
            Some("https://planner.internal/complete")
        );
        assert!(cfg.remediation.enabled);
    }
}
