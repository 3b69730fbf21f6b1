//! Grype/OSV-like SCA adapter (spec.md §4.3, §6). The two divergent
//! backends named in spec.md §9(b) are unified behind [`scan_core::normalize::ScaMatch`]
//! so the normalizer stays backend-agnostic.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use scan_core::orchestrator::ScaAdapter;
use scan_core::normalize::ScaMatch;
use serde::Deserialize;
use tokio::process::Command;

use crate::subprocess::run_with_timeout;

#[derive(Debug, Deserialize)]
struct RawVulnerability {
    id: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    fix: RawFix,
}

#[derive(Debug, Deserialize, Default)]
struct RawFix {
    #[serde(default)]
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    name: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    vulnerability: RawVulnerability,
    artifact: RawArtifact,
}

#[derive(Debug, Deserialize, Default)]
struct RawMatchesOutput {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

/// Invokes `grype sbom:<path> -o json` against the generated SBOM.
pub struct GrypeAdapter {
    pub binary: String,
    pub timeout: Duration,
}

impl Default for GrypeAdapter {
    fn default() -> Self {
        GrypeAdapter {
            binary: "grype".to_string(),
            timeout: Duration::from_secs(180),
        }
    }
}

#[async_trait]
impl ScaAdapter for GrypeAdapter {
    async fn run(&self, sbom_path: &Path) -> anyhow::Result<Vec<ScaMatch>> {
        let mut command = Command::new(&self.binary);
        command
            .arg(format!("sbom:{}", sbom_path.display()))
            .arg("-o")
            .arg("json");

        let output = run_with_timeout(command, self.timeout).await?;
        if !output.success() && output.stdout.is_empty() {
            anyhow::bail!(
                "grype failed (exit {:?}): {}",
                output.exit_code,
                output.stderr
            );
        }

        Ok(parse_matches_json(&output.stdout))
    }
}

fn parse_matches_json(raw: &[u8]) -> Vec<ScaMatch> {
    let parsed: RawMatchesOutput = serde_json::from_slice(raw).unwrap_or_default();
    parsed
        .matches
        .into_iter()
        .map(|m| ScaMatch {
            vulnerability_id: m.vulnerability.id,
            severity: m.vulnerability.severity,
            description: m.vulnerability.description,
            fix_versions: m.vulnerability.fix.versions,
            package_name: m.artifact.name,
            package_version: m.artifact.version,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grype_style_matches() {
        let raw = br#"{"matches": [{
            "vulnerability": {"id": "CVE-2021-1234", "severity": "High", "fix": {"versions": ["2.1.0"]}},
            "artifact": {"name": "requests", "version": "2.0.0"}
        }]}"#;
        let matches = parse_matches_json(raw);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].vulnerability_id, "CVE-2021-1234");
        assert_eq!(matches[0].package_name, "requests");
        assert_eq!(matches[0].fix_versions, vec!["2.1.0".to_string()]);
    }

    #[test]
    fn malformed_output_yields_no_matches() {
        assert!(parse_matches_json(b"not json").is_empty());
    }
}
