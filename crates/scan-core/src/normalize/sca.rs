use serde::Deserialize;
use serde_json::json;

use crate::fingerprint::sca_fingerprint;
use crate::model::{Category, Confidence, Finding, Severity};

/// One `matches[].{vulnerability,artifact}` pair from the SCA adapter
/// (spec.md §6), already flattened to one record per package x CVE.
#[derive(Debug, Clone, Deserialize)]
pub struct ScaMatch {
    pub vulnerability_id: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fix_versions: Vec<String>,
    pub package_name: String,
    pub package_version: String,
}

/// Keyword → severity mapping used only when the tool did not carry its
/// own severity (spec.md §4.4).
fn severity_from_description(description: &str) -> Severity {
    let lower = description.to_ascii_lowercase();
    const CRITICAL_KEYWORDS: &[&str] = &["rce", "authentication bypass", "privilege escalation"];
    const HIGH_KEYWORDS: &[&str] = &["dos", "sql injection", "command injection"];

    if CRITICAL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::Critical
    } else if HIGH_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Maps raw SCA matches into `Finding`s (spec.md §4.4).
pub fn normalize_sca(tool: &str, matches: &[ScaMatch]) -> Vec<Finding> {
    matches
        .iter()
        .map(|m| {
            let severity = m
                .severity
                .as_deref()
                .map(Severity::from_tool_str)
                .unwrap_or_else(|| severity_from_description(&m.description));

            let fingerprint =
                sca_fingerprint(&m.vulnerability_id, &m.package_name, &m.package_version);

            let evidence = json!({
                "package": m.package_name,
                "installed_version": m.package_version,
                "fix_versions": m.fix_versions,
                "description": m.description,
            });

            Finding {
                category: Category::Sca,
                tool: tool.to_string(),
                rule_id: m.vulnerability_id.clone(),
                title: format!("{}: {}", m.vulnerability_id, m.package_name),
                severity,
                confidence: Confidence::Medium,
                file: format!("{}@{}", m.package_name, m.package_version),
                line: None,
                fingerprint,
                occurrences: 1,
                evidence,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_match() -> ScaMatch {
        ScaMatch {
            vulnerability_id: "CVE-2021-1234".to_string(),
            severity: None,
            description: "remote code execution".to_string(),
            fix_versions: vec!["2.1.0".to_string()],
            package_name: "requests".to_string(),
            package_version: "2.0.0".to_string(),
        }
    }

    #[test]
    fn keyword_mapping_promotes_to_critical() {
        let findings = normalize_sca("grype", &[base_match()]);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn tool_severity_wins_over_keyword_mapping() {
        let mut m = base_match();
        m.severity = Some("LOW".to_string());
        let findings = normalize_sca("grype", &[m]);
        assert_eq!(findings[0].severity, Severity::Low);
    }

    #[test]
    fn fingerprint_ignores_backend_tool_name() {
        let a = normalize_sca("grype", &[base_match()]);
        let b = normalize_sca("osv", &[base_match()]);
        assert_eq!(a[0].fingerprint, b[0].fingerprint);
    }
}
