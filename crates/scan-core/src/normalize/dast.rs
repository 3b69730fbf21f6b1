use serde::Deserialize;
use serde_json::json;

use crate::fingerprint::dast_fingerprint;
use crate::model::{Category, Confidence, Finding, Severity};

/// One JSONL record from the DAST adapter's output (spec.md §6): flattened
/// from `template-id`, `info.{name,severity,description,reference}`,
/// `matched-at`, `type`, `response.{status,headers}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DastRawRecord {
    pub template_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reference: Vec<String>,
    pub matched_at: String,
    #[serde(default)]
    pub record_type: String,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}

/// Maps raw DAST records into `Finding`s (spec.md §4.4).
pub fn normalize_dast(tool: &str, records: &[DastRawRecord]) -> Vec<Finding> {
    records
        .iter()
        .filter_map(|r| {
            let parsed = url::Url::parse(&r.matched_at).ok()?;
            let host = parsed.host_str().unwrap_or_default().to_string();
            let path = parsed.path().to_string();

            let severity = r
                .severity
                .as_deref()
                .map(Severity::from_tool_str)
                .unwrap_or(Severity::Medium);

            let fingerprint = dast_fingerprint(
                tool,
                &r.template_id,
                &host,
                &path,
                r.parameter.as_deref(),
            );

            let evidence = json!({
                "method": r.record_type,
                "status": r.status,
                "content_type": r.content_type,
                "description": r.description,
                "reference": r.reference,
            });

            Some(Finding {
                category: Category::Dast,
                tool: tool.to_string(),
                rule_id: r.template_id.clone(),
                title: if r.name.is_empty() {
                    r.template_id.clone()
                } else {
                    r.name.clone()
                },
                severity,
                confidence: Confidence::Medium,
                file: path,
                line: None,
                fingerprint,
                occurrences: 1,
                evidence,
            })
        })
        .collect()
}
