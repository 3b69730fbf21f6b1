//! Optional per-entity fix-suggestion request, gated behind explicit
//! opt-in (spec.md §1 Non-goals: "producing fixes without explicit
//! opt-in"; SPEC_FULL.md §4.10).

use crate::model::{AgentContext, FindingEntity};
use crate::planner::ModelProvider;

/// Must be explicitly turned on by the embedder; remediation never runs
/// as a side effect of scanning.
#[derive(Debug, Clone, Default)]
pub struct RemediationOptions {
    pub enabled: bool,
}

/// A suggested fix for one entity. Carries no source code beyond the
/// single representative snippet already present in the entity's
/// evidence — the prompt never includes secrets or the full source tree.
#[derive(Debug, Clone)]
pub struct RemediationSuggestion {
    pub entity_id: String,
    pub suggestion: String,
}

fn representative_snippet(entity: &FindingEntity) -> Option<String> {
    entity.signals.first().and_then(|f| {
        f.evidence
            .get("code")
            .or_else(|| f.evidence.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    })
}

fn build_prompt(entity: &FindingEntity, _ctx: &AgentContext) -> String {
    let signal = entity.signals.first();
    let tool = signal.map(|s| s.tool.as_str()).unwrap_or("unknown");
    let rule_id = signal.map(|s| s.rule_id.as_str()).unwrap_or("unknown");
    let file = signal.map(|s| s.file.as_str()).unwrap_or("unknown");
    let snippet = representative_snippet(entity).unwrap_or_default();

    format!(
        "Suggest a concise remediation for this finding.\n\
         title: {}\ntool: {tool}\nrule_id: {rule_id}\nfile: {file}\nsnippet: {snippet}",
        entity.title,
    )
}

/// Requests a fix suggestion for `entity`. A provider failure is logged
/// and surfaces as `None`, never as a pipeline error (spec.md §7,
/// "Callback/remediation failure → logged, never affects results").
pub async fn suggest_fix(
    entity: &FindingEntity,
    ctx: &AgentContext,
    provider: &dyn ModelProvider,
    options: &RemediationOptions,
) -> Option<RemediationSuggestion> {
    if !options.enabled {
        return None;
    }

    let prompt = build_prompt(entity, ctx);
    match provider.complete(&prompt).await {
        Ok(text) => Some(RemediationSuggestion {
            entity_id: entity.entity_id.clone(),
            suggestion: text,
        }),
        Err(err) => {
            tracing::warn!(entity_id = %entity.entity_id, error = %err, "remediation request failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Finding;
    use crate::planner::NullModelProvider;
    use serde_json::json;

    fn entity() -> FindingEntity {
        FindingEntity::from_first_signal(
            "e1".to_string(),
            Finding {
                category: crate::model::Category::Sast,
                tool: "semgrep".to_string(),
                rule_id: "python-xss".to_string(),
                title: "Reflected XSS".to_string(),
                severity: crate::model::Severity::High,
                confidence: crate::model::Confidence::Medium,
                file: "app/login.py".to_string(),
                line: Some(10),
                fingerprint: "fp".to_string(),
                occurrences: 1,
                evidence: json!({ "code": "render(request.GET['q'])" }),
            },
        )
    }

    #[tokio::test]
    async fn disabled_by_default_returns_none() {
        let result = suggest_fix(
            &entity(),
            &AgentContext::default(),
            &NullModelProvider,
            &RemediationOptions::default(),
        )
        .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn provider_failure_returns_none_not_error() {
        let result = suggest_fix(
            &entity(),
            &AgentContext::default(),
            &NullModelProvider,
            &RemediationOptions { enabled: true },
        )
        .await;
        assert!(result.is_none());
    }
}
