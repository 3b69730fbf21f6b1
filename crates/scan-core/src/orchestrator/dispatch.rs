use serde_json::json;

use crate::errors::PipelineError;
use crate::gatekeeper::enforce_plan;
use crate::model::{
    AgentContext, Category, Confidence, Finding, ScanRequest, ScanResult, ScanStatus, ScopePolicy,
    Severity,
};
use crate::normalize::{normalize_config, normalize_dast, normalize_sast, normalize_sca};
use crate::planner::baseline_plan;
use crate::scope::{validate_repo_scope, validate_target_url};

use super::ports::{AnalyzerAdapters, ResultSink};
use super::workspace::resolve_workspace;

fn system_finding(rule_id: &str, title: &str, detail: String) -> Finding {
    Finding::system(rule_id, title, json!({ "detail": detail }))
}

/// A `watch<bool>` cancel flag checked between stages (spec.md §5). Kept
/// dependency-light rather than pulling in `tokio-util` for a single
/// `CancellationToken`.
pub type CancelSignal = tokio::sync::watch::Receiver<bool>;

fn cancelled(signal: Option<&CancelSignal>) -> bool {
    signal.map(|s| *s.borrow()).unwrap_or(false)
}

/// Runs the full orchestrator algorithm (spec.md §4.5). `adapters` supplies
/// whichever of the five analyzer ports are wired up; a plan flag that is
/// set with no corresponding adapter is treated as a tool-execution error,
/// not a panic. `sink`, if present, is called once on completion
/// (spec.md §6, "Callback"). `cancel`, if present, is polled between
/// stages; once set it short-circuits any remaining analyzer stages and
/// returns a `Failed` result without skipping dedup or the callback.
pub async fn orchestrate(
    request: ScanRequest,
    adapters: &AnalyzerAdapters,
    sink: Option<&dyn ResultSink>,
) -> Result<ScanResult, PipelineError> {
    orchestrate_with_cancel(request, adapters, sink, None).await
}

/// As [`orchestrate`], but accepts a cancel flag (spec.md §5).
pub async fn orchestrate_with_cancel(
    request: ScanRequest,
    adapters: &AnalyzerAdapters,
    sink: Option<&dyn ResultSink>,
    cancel: Option<&CancelSignal>,
) -> Result<ScanResult, PipelineError> {
    if request.run_id.is_empty() {
        return Err(PipelineError::InvalidInput("run_id"));
    }
    if request.repo_path.is_none() && request.dast.is_none() {
        return Err(PipelineError::InvalidInput("repo_path or dast.target_url"));
    }

    let scope = request.scope.clone().unwrap_or_else(ScopePolicy::local_default);

    let plan = match &request.plan {
        Some(plan) => plan.clone(),
        None => {
            let ctx = AgentContext {
                repo_id: request.repo_path.clone().unwrap_or_default(),
                languages: request.languages.clone(),
                frameworks: request.frameworks.clone(),
                dependencies: request.dependencies.clone(),
                is_pr: request.is_pr,
                changed_files: request.changed_files.clone(),
                has_public_endpoint: request.dast.is_some(),
            };
            baseline_plan(&ctx)
        }
    };

    let plan = match enforce_plan(plan, &scope) {
        Ok(plan) => plan,
        Err(rejected) => {
            let result = ScanResult {
                run_id: request.run_id.clone(),
                status: ScanStatus::Blocked,
                tools: Vec::new(),
                findings: vec![system_finding(
                    "dast-scope-violation",
                    &rejected.0,
                    rejected.0.clone(),
                )],
            };
            notify(sink, &result).await;
            return Ok(result);
        }
    };

    if let Some(repo_path) = &request.repo_path {
        if let Err(violation) = validate_repo_scope(repo_path, &scope) {
            let result = ScanResult {
                run_id: request.run_id.clone(),
                status: ScanStatus::Blocked,
                tools: Vec::new(),
                findings: vec![system_finding(
                    "repo-scope-violation",
                    &violation.0,
                    violation.0.clone(),
                )],
            };
            notify(sink, &result).await;
            return Ok(result);
        }
    }

    let workspace = match &request.repo_path {
        Some(repo_path) => match resolve_workspace(repo_path).await {
            Ok(ws) => Some(ws),
            Err(err) => {
                let result = ScanResult {
                    run_id: request.run_id.clone(),
                    status: ScanStatus::Failed,
                    tools: Vec::new(),
                    findings: vec![system_finding("workspace-unavailable", &err, err.clone())],
                };
                notify(sink, &result).await;
                return Ok(result);
            }
        },
        None => None,
    };

    let mut tools: Vec<String> = Vec::new();
    let mut findings: Vec<Finding> = Vec::new();
    let mut status = ScanStatus::Completed;

    if cancelled(cancel) {
        status = ScanStatus::Failed;
        findings.push(system_finding(
            "run-cancelled",
            "scan cancelled before analyzers ran",
            "cancel signal observed before the first analyzer stage".to_string(),
        ));
    }

    if status == ScanStatus::Completed && plan.run_sast {
        if let Some(ws) = &workspace {
            match &adapters.sast {
                Some(adapter) => match adapter.run(ws.path(), &request.languages).await {
                    Ok(raw) => {
                        findings.extend(normalize_sast("semgrep", &raw));
                        tools.push("semgrep".to_string());
                    }
                    Err(err) => push_tool_error(&mut findings, &mut tools, "semgrep", &err),
                },
                None => push_tool_error(
                    &mut findings,
                    &mut tools,
                    "semgrep",
                    &anyhow::anyhow!("no SAST adapter configured"),
                ),
            }
        }
    }

    if status == ScanStatus::Completed && cancelled(cancel) {
        status = ScanStatus::Failed;
        findings.push(system_finding(
            "run-cancelled",
            "scan cancelled between analyzer stages",
            "cancel signal observed before the SCA stage".to_string(),
        ));
    }

    if status == ScanStatus::Completed && plan.run_sca {
        if let Some(ws) = &workspace {
            match run_sca_stage(ws.path(), adapters).await {
                Ok(raw) => {
                    findings.extend(normalize_sca("sca", &raw));
                    tools.push("sca".to_string());
                }
                Err(err) => push_tool_error(&mut findings, &mut tools, "sca", &err),
            }
        }
    }

    if status == ScanStatus::Completed && cancelled(cancel) {
        status = ScanStatus::Failed;
        findings.push(system_finding(
            "run-cancelled",
            "scan cancelled between analyzer stages",
            "cancel signal observed before the DAST/config stage".to_string(),
        ));
    }

    if status == ScanStatus::Completed && plan.run_dast {
        if let Some(dast) = &request.dast {
            match validate_target_url(&dast.target_url, &scope) {
                Ok(()) => {
                    match &adapters.dast {
                        Some(adapter) => match adapter.run(&dast.target_url, &dast.headers).await {
                            Ok(raw) => {
                                findings.extend(normalize_dast("nuclei", &raw));
                                tools.push("nuclei".to_string());
                            }
                            Err(err) => push_tool_error(&mut findings, &mut tools, "nuclei", &err),
                        },
                        None => push_tool_error(
                            &mut findings,
                            &mut tools,
                            "nuclei",
                            &anyhow::anyhow!("no DAST adapter configured"),
                        ),
                    }

                    match &adapters.config {
                        Some(adapter) => match adapter.probe(&dast.target_url).await {
                            Ok(probe) => {
                                findings.extend(normalize_config(&probe));
                                tools.push("config-checker".to_string());
                            }
                            Err(err) => {
                                push_tool_error(&mut findings, &mut tools, "config-checker", &err)
                            }
                        },
                        None => push_tool_error(
                            &mut findings,
                            &mut tools,
                            "config-checker",
                            &anyhow::anyhow!("no config adapter configured"),
                        ),
                    }
                }
                Err(violation) => {
                    status = ScanStatus::Blocked;
                    findings.push(system_finding(
                        "dast-scope-violation",
                        &violation.0,
                        violation.0.clone(),
                    ));
                }
            }
        }
    }

    let findings = crate::dedup::dedup(findings);

    let result = ScanResult {
        run_id: request.run_id,
        status,
        tools,
        findings,
    };

    notify(sink, &result).await;
    Ok(result)
}

async fn run_sca_stage(
    repo_path: &std::path::Path,
    adapters: &AnalyzerAdapters,
) -> anyhow::Result<Vec<crate::normalize::ScaMatch>> {
    let sbom = adapters
        .sbom
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no SBOM adapter configured"))?;
    let sca = adapters
        .sca
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no SCA adapter configured"))?;

    let sbom_path = sbom.generate(repo_path).await?;
    sca.run(&sbom_path).await
}

/// Appends a `SYSTEM` finding and `"<tool>-error"` tool marker without
/// aborting the remaining stages (spec.md §4.5 step 6, §7).
fn push_tool_error(findings: &mut Vec<Finding>, tools: &mut Vec<String>, tool: &str, err: &anyhow::Error) {
    tracing::warn!(tool, error = %err, "analyzer execution failed");
    findings.push(Finding {
        category: Category::System,
        tool: tool.to_string(),
        rule_id: format!("{tool}-execution-error"),
        title: format!("{tool} execution failed"),
        severity: Severity::Low,
        confidence: Confidence::High,
        file: String::new(),
        line: None,
        fingerprint: format!("system:{tool}-execution-error"),
        occurrences: 1,
        evidence: json!({ "error": err.to_string() }),
    });
    tools.push(format!("{tool}-error"));
}

async fn notify(sink: Option<&dyn ResultSink>, result: &ScanResult) {
    if let Some(sink) = sink {
        if let Err(err) = sink.send(result).await {
            tracing::warn!(error = %err, "callback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_run_id_is_a_programmer_error() {
        let request = ScanRequest {
            run_id: String::new(),
            repo_path: Some("/tmp/repo".to_string()),
            languages: Vec::new(),
            frameworks: Vec::new(),
            dependencies: Vec::new(),
            is_pr: false,
            changed_files: Vec::new(),
            dast: None,
            callback_url: None,
            plan: None,
            scope: None,
        };
        let adapters = AnalyzerAdapters::default();
        let result = orchestrate(request, &adapters, None).await;
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn repo_outside_scope_blocks_with_single_system_finding() {
        let request = ScanRequest {
            run_id: "r1".to_string(),
            repo_path: Some("https://evil.example/repo.git".to_string()),
            languages: vec!["python".to_string()],
            frameworks: Vec::new(),
            dependencies: Vec::new(),
            is_pr: false,
            changed_files: Vec::new(),
            dast: None,
            callback_url: None,
            plan: None,
            scope: Some(ScopePolicy {
                allowed_repo_prefixes: vec!["https://github.com/acme/".to_string()],
                allowed_domains: Vec::new(),
                allowed_schemes: vec!["https".to_string()],
                max_requests: 200,
                max_runtime_seconds: 300,
                safe_mode: true,
            }),
        };
        let adapters = AnalyzerAdapters::default();
        let result = orchestrate(request, &adapters, None).await.unwrap();
        assert_eq!(result.status, ScanStatus::Blocked);
        assert_eq!(result.findings.len(), 1);
        assert!(result.tools.is_empty());
    }

    #[tokio::test]
    async fn a_pre_set_cancel_signal_short_circuits_analyzer_stages() {
        let request = ScanRequest {
            run_id: "r2".to_string(),
            repo_path: Some("/tmp/already-checked-out".to_string()),
            languages: vec!["python".to_string()],
            frameworks: Vec::new(),
            dependencies: Vec::new(),
            is_pr: false,
            changed_files: Vec::new(),
            dast: None,
            callback_url: None,
            plan: None,
            scope: Some(ScopePolicy::local_default()),
        };
        let (_tx, rx) = tokio::sync::watch::channel(true);
        let adapters = AnalyzerAdapters::default();
        let result = orchestrate_with_cancel(request, &adapters, None, Some(&rx))
            .await
            .unwrap();
        assert_eq!(result.status, ScanStatus::Failed);
        assert!(result.tools.is_empty());
        assert_eq!(result.findings[0].rule_id, "run-cancelled");
    }
}
