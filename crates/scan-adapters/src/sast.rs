//! Semgrep-like SAST adapter (spec.md §4.3, §6).

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use scan_core::orchestrator::SastAdapter;
use scan_core::normalize::SastRawResult as NormalizedSastResult;
use serde::Deserialize;
use tokio::process::Command;

use crate::subprocess::run_with_timeout;

#[derive(Debug, Deserialize)]
struct SemgrepStart {
    line: u32,
}

#[derive(Debug, Deserialize)]
struct SemgrepEnd {
    line: u32,
}

#[derive(Debug, Deserialize, Default)]
struct SemgrepExtra {
    #[serde(default)]
    lines: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    severity: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SemgrepResult {
    check_id: String,
    path: String,
    start: SemgrepStart,
    #[serde(default)]
    end: Option<SemgrepEnd>,
    #[serde(default)]
    extra: SemgrepExtra,
}

#[derive(Debug, Deserialize, Default)]
struct SemgrepOutput {
    #[serde(default)]
    results: Vec<SemgrepResult>,
}

/// Invokes `semgrep scan --config=p/<lang> --json --output <tmp>` once per
/// detected language and merges the results (spec.md §4.3).
pub struct SemgrepAdapter {
    pub binary: String,
    pub timeout: Duration,
}

impl Default for SemgrepAdapter {
    fn default() -> Self {
        SemgrepAdapter {
            binary: "semgrep".to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

impl SemgrepAdapter {
    async fn run_one_language(
        &self,
        repo_path: &Path,
        language: &str,
    ) -> anyhow::Result<Vec<NormalizedSastResult>> {
        let out_file = tempfile::Builder::new()
            .prefix("semgrep-")
            .suffix(".json")
            .tempfile()?;
        let out_path = out_file.path().to_path_buf();

        let mut command = Command::new(&self.binary);
        command
            .arg("scan")
            .arg(format!("--config=p/{language}"))
            .arg("--json")
            .arg("--output")
            .arg(&out_path)
            .current_dir(repo_path);

        let output = run_with_timeout(command, self.timeout).await?;

        // Exit 0 = no findings, exit 1 = findings present (not an error),
        // >=2 = failure (spec.md §4.3).
        if let Some(code) = output.exit_code {
            if code >= 2 {
                anyhow::bail!("semgrep exited with code {code}: {}", output.stderr);
            }
        } else if output.timed_out {
            anyhow::bail!("semgrep timed out: {}", output.stderr);
        }

        let raw = match tokio::fs::read_to_string(&out_path).await {
            Ok(contents) if !contents.trim().is_empty() => contents,
            _ => return Ok(Vec::new()),
        };

        Ok(parse_semgrep_json(&raw))
    }
}

/// Parses semgrep's `--json` output into normalized results. Empty or
/// invalid JSON is treated as "no findings" (spec.md §4.3, defensive).
fn parse_semgrep_json(raw: &str) -> Vec<NormalizedSastResult> {
    let parsed: SemgrepOutput = serde_json::from_str(raw).unwrap_or_default();
    parsed
        .results
        .into_iter()
        .map(|r| NormalizedSastResult {
            check_id: r.check_id,
            path: r.path,
            start_line: r.start.line,
            end_line: r.end.map(|e| e.line),
            lines: r.extra.lines,
            message: r.extra.message,
            severity: r.extra.severity,
        })
        .collect()
}


#[async_trait]
impl SastAdapter for SemgrepAdapter {
    async fn run(
        &self,
        repo_path: &Path,
        languages: &[String],
    ) -> anyhow::Result<Vec<NormalizedSastResult>> {
        let mut all = Vec::new();
        for language in languages {
            all.extend(self.run_one_language(repo_path, language).await?);
        }
        Ok(all)
    }
}
