use serde::Deserialize;
use serde_json::json;

use crate::fingerprint::sast_fingerprint;
use crate::model::{Category, Confidence, Finding, Severity};

use super::redact::redact_secrets;

/// One `results[]` entry from the SAST adapter's JSON output (spec.md §6).
#[derive(Debug, Clone, Deserialize)]
pub struct SastRawResult {
    pub check_id: String,
    pub path: String,
    pub start_line: u32,
    #[serde(default)]
    pub end_line: Option<u32>,
    #[serde(default)]
    pub lines: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Option<String>,
}

/// Maps raw SAST results into `Finding`s, redacting secrets from evidence
/// before storage (spec.md §4.4).
pub fn normalize_sast(tool: &str, results: &[SastRawResult]) -> Vec<Finding> {
    results
        .iter()
        .map(|r| {
            let severity = r
                .severity
                .as_deref()
                .map(Severity::from_tool_str)
                .unwrap_or(Severity::Medium);

            let fingerprint = sast_fingerprint(tool, &r.check_id, &r.path, &r.lines);

            let evidence = json!({
                "code": redact_secrets(&r.lines),
                "message": redact_secrets(&r.message),
                "end_line": r.end_line,
            });

            Finding {
                category: Category::Sast,
                tool: tool.to_string(),
                rule_id: r.check_id.clone(),
                title: r.message.clone(),
                severity,
                confidence: Confidence::Medium,
                file: r.path.clone(),
                line: Some(r.start_line),
                fingerprint,
                occurrences: 1,
                evidence,
            }
        })
        .collect()
}
