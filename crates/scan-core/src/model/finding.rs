use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::severity::{Category, Confidence, Severity};

/// A single raw signal from one analyzer, normalized into the canonical
/// schema described in spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub category: Category,
    pub tool: String,
    pub rule_id: String,
    pub title: String,
    pub severity: Severity,
    pub confidence: Confidence,
    /// Source path for SAST, URL path for DAST, `purl`/`pkg@version` for SCA.
    pub file: String,
    /// Absent for DAST/SCA findings; the start line for SAST.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 256-bit hex SHA-256 fingerprint, stable identity (spec.md §3).
    pub fingerprint: String,
    pub occurrences: u32,
    /// Free-form tool-specific detail. A pure JSON object.
    pub evidence: Value,
}

impl Finding {
    /// A `SYSTEM` finding for a pipeline error or scope violation. Always
    /// `Severity::Low` per spec.md §3/§7 so it never pollutes SLA math.
    pub fn system(rule_id: impl Into<String>, title: impl Into<String>, evidence: Value) -> Self {
        let rule_id = rule_id.into();
        Finding {
            category: Category::System,
            tool: "pipeline".to_string(),
            rule_id: rule_id.clone(),
            title: title.into(),
            severity: Severity::Low,
            confidence: Confidence::High,
            file: String::new(),
            line: None,
            fingerprint: format!("system:{rule_id}"),
            occurrences: 1,
            evidence,
        }
    }
}
