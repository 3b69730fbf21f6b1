use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::model::{AgentContext, ExecutionPlan, ScanLimits};

use super::baseline::baseline_plan;
use super::port::ModelProvider;

/// Options governing the model-backed planner's retry/timeout behavior.
#[derive(Debug, Clone)]
pub struct PlannerOptions {
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        PlannerOptions {
            max_retries: 2,
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLimits {
    #[serde(default)]
    max_runtime_seconds: Option<Value>,
    #[serde(default)]
    max_requests: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawPlan {
    #[serde(default)]
    run_sast: Option<Value>,
    #[serde(default)]
    run_sca: Option<Value>,
    #[serde(default)]
    run_dast: Option<Value>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    limits: Option<RawLimits>,
}

/// Truthiness coercion matching the original's defensive JSON handling:
/// any JSON value can stand in for a boolean (spec.md §4.1 step 3).
fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "false" && s != "0",
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Explicit integer coercion; non-numeric/negative values are rejected.
fn as_u32(v: &Value) -> Option<u32> {
    v.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// Extracts a JSON object from `text`: first from a fenced code block
/// (```` ```json ... ``` ```` or bare ``` ``` ```), else the first
/// `{ … }` region (spec.md §4.1 step 1; grounded on the judge client's
/// defensive brace-scanning extraction).
fn extract_json_object(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        let after_fence = after_fence.strip_prefix("json").unwrap_or(after_fence);
        if let Some(end) = after_fence.find("```") {
            let candidate = after_fence[..end].trim();
            if !candidate.is_empty() {
                return Some(candidate);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_raw_plan(text: &str) -> Option<RawPlan> {
    let candidate = extract_json_object(text)?;
    serde_json::from_str(candidate).ok()
}

/// Validates required fields and coerces types, returning `None` on any
/// structural problem (spec.md §4.1 step 2).
fn validate_and_coerce(raw: RawPlan) -> Option<(bool, bool, bool, String, ScanLimits)> {
    let run_sast = truthy(raw.run_sast.as_ref()?);
    let run_sca = truthy(raw.run_sca.as_ref()?);
    let run_dast = truthy(raw.run_dast.as_ref()?);
    let reason = raw.reason.unwrap_or_default();

    let limits = raw.limits?;
    let max_runtime_seconds = as_u32(limits.max_runtime_seconds.as_ref()?)?;
    let max_requests = as_u32(limits.max_requests.as_ref()?)?;

    Some((
        run_sast,
        run_sca,
        run_dast,
        reason,
        ScanLimits {
            max_runtime_seconds,
            max_requests,
        },
    ))
}

/// Merges a model-proposed plan into `base`: the model can only REDUCE
/// rights (spec.md §4.1). Every boolean is `base AND model`; limits are
/// the elementwise minimum; `is_pr`/`has_public_endpoint` invariants are
/// re-asserted regardless of what the model said.
fn merge_with_baseline(base: &ExecutionPlan, ctx: &AgentContext, model_text: &str) -> ExecutionPlan {
    let Some(raw) = parse_raw_plan(model_text) else {
        return base.clone();
    };
    let Some((m_sast, m_sca, m_dast, m_reason, m_limits)) = validate_and_coerce(raw) else {
        return base.clone();
    };

    let mut run_dast = base.run_dast && m_dast;
    if ctx.is_pr || !ctx.has_public_endpoint {
        run_dast = false;
    }

    ExecutionPlan {
        run_sast: base.run_sast && m_sast,
        run_sca: base.run_sca && m_sca,
        run_dast,
        reason: if m_reason.is_empty() {
            base.reason.clone()
        } else {
            m_reason
        },
        limits: base.limits.elementwise_min(m_limits),
    }
}

/// Queries `provider` for a plan, merges it with the baseline, and falls
/// back to the baseline unchanged on any exception, timeout or validation
/// failure after `max_retries + 1` attempts (spec.md §4.1).
pub async fn plan_with_model(
    ctx: &AgentContext,
    provider: &dyn ModelProvider,
    opts: &PlannerOptions,
) -> ExecutionPlan {
    let base = baseline_plan(ctx);
    let prompt = build_prompt(ctx);

    for attempt in 0..=opts.max_retries {
        let result = tokio::time::timeout(opts.timeout, provider.complete(&prompt)).await;
        match result {
            Ok(Ok(text)) => return merge_with_baseline(&base, ctx, &text),
            Ok(Err(err)) => {
                tracing::warn!(attempt, error = %err, "planner model call failed");
            }
            Err(_) => {
                tracing::warn!(attempt, "planner model call timed out");
            }
        }
    }

    base
}

fn build_prompt(ctx: &AgentContext) -> String {
    format!(
        "Given this repository context, return strict JSON with exactly \
         {{run_sast, run_sca, run_dast, reason, limits: {{max_runtime_seconds, max_requests}}}}.\n\
         languages={:?} dependencies={:?} is_pr={} has_public_endpoint={}",
        ctx.languages, ctx.dependencies, ctx.is_pr, ctx.has_public_endpoint
    )
}
