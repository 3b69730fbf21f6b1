//! Nuclei-like DAST adapter (spec.md §4.3, §6).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use scan_core::orchestrator::DastAdapter;
use scan_core::normalize::DastRawRecord;
use serde::Deserialize;
use tokio::process::Command;

use crate::subprocess::run_with_timeout;

#[derive(Debug, Deserialize, Default)]
struct NucleiInfo {
    #[serde(default)]
    name: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    reference: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct NucleiResponse {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    headers: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct NucleiRecord {
    #[serde(rename = "template-id")]
    template_id: String,
    #[serde(default)]
    info: NucleiInfo,
    #[serde(rename = "matched-at")]
    matched_at: String,
    #[serde(rename = "type", default)]
    record_type: String,
    #[serde(default)]
    response: NucleiResponse,
}

/// CI profile uses medium+ severities; deep profile also enables CVE
/// templates (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DastProfile {
    Ci,
    Deep,
}

impl DastProfile {
    fn severities(self) -> &'static str {
        match self {
            DastProfile::Ci => "medium,high,critical",
            DastProfile::Deep => "low,medium,high,critical",
        }
    }

    fn tags(self) -> &'static str {
        match self {
            DastProfile::Ci => "ci",
            DastProfile::Deep => "ci,cves",
        }
    }
}

/// Invokes `nuclei -u <url> -jsonl -o <tmp> -severity … -tags … -rate-limit
/// … -timeout … -disable-update-check [-H "k: v"]*`. A non-zero exit does
/// not prevent parsing the output file (spec.md §4.3).
pub struct NucleiAdapter {
    pub binary: String,
    pub profile: DastProfile,
    pub rate_limit: u32,
    pub request_timeout_seconds: u32,
    pub subprocess_timeout: Duration,
}

impl Default for NucleiAdapter {
    fn default() -> Self {
        NucleiAdapter {
            binary: "nuclei".to_string(),
            profile: DastProfile::Ci,
            rate_limit: 50,
            request_timeout_seconds: 10,
            subprocess_timeout: Duration::from_secs(300),
        }
    }
}

#[async_trait]
impl DastAdapter for NucleiAdapter {
    async fn run(
        &self,
        target_url: &str,
        headers: &HashMap<String, String>,
    ) -> anyhow::Result<Vec<DastRawRecord>> {
        let out_file = tempfile::Builder::new()
            .prefix("nuclei-")
            .suffix(".jsonl")
            .tempfile()?;
        let out_path = out_file.path().to_path_buf();

        let mut command = Command::new(&self.binary);
        command
            .arg("-u")
            .arg(target_url)
            .arg("-jsonl")
            .arg("-o")
            .arg(&out_path)
            .arg("-severity")
            .arg(self.profile.severities())
            .arg("-tags")
            .arg(self.profile.tags())
            .arg("-rate-limit")
            .arg(self.rate_limit.to_string())
            .arg("-timeout")
            .arg(self.request_timeout_seconds.to_string())
            .arg("-disable-update-check");

        for (key, value) in headers {
            command.arg("-H").arg(format!("{key}: {value}"));
        }

        let output = run_with_timeout(command, self.subprocess_timeout).await?;
        if output.timed_out {
            anyhow::bail!("nuclei timed out: {}", output.stderr);
        }

        let raw = match tokio::fs::read_to_string(&out_path).await {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };

        Ok(parse_jsonl(&raw))
    }
}

fn parse_jsonl(raw: &str) -> Vec<DastRawRecord> {
    let mut records = Vec::new();
    for line in raw.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<NucleiRecord>(line) else {
            continue;
        };
        let content_type = record
            .response
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.clone());

        records.push(DastRawRecord {
            template_id: record.template_id,
            name: record.info.name,
            severity: record.info.severity,
            description: record.info.description,
            reference: record.info.reference,
            matched_at: record.matched_at,
            record_type: record.record_type,
            status: record.response.status,
            content_type,
            parameter: None,
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_record_per_line() {
        let raw = concat!(
            r#"{"template-id": "reflected-xss", "info": {"name": "XSS", "severity": "high"}, "#,
            r#""matched-at": "http://host/login", "type": "http", "response": {"status": 200, "headers": {"Content-Type": "text/html"}}}"#,
            "\n",
        );
        let records = parse_jsonl(raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].template_id, "reflected-xss");
        assert_eq!(records[0].content_type.as_deref(), Some("text/html"));
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        let raw = "\nnot json\n";
        assert!(parse_jsonl(raw).is_empty());
    }

    #[test]
    fn profile_severities_and_tags_differ() {
        assert_ne!(DastProfile::Ci.severities(), DastProfile::Deep.severities());
        assert_ne!(DastProfile::Ci.tags(), DastProfile::Deep.tags());
    }
}
