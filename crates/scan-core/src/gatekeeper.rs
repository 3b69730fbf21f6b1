//! Clamps a model-influenced [`ExecutionPlan`] against immutable
//! [`ScopePolicy`], never expanding rights (spec.md §4.2).

use crate::model::{ExecutionPlan, ScopePolicy};

/// The Gatekeeper refused the plan outright (as opposed to clamping a
/// field). The only such case today is DAST with no allowed domains.
#[derive(Debug, Clone, thiserror::Error)]
#[error("plan rejected: {0}")]
pub struct PlanRejected(pub String);

/// Clamps `plan` against `scope`. Never touches `run_sast`/`run_sca`, never
/// feeds back into the Planner (spec.md §9, "Cyclic intent").
pub fn enforce_plan(
    mut plan: ExecutionPlan,
    scope: &ScopePolicy,
) -> Result<ExecutionPlan, PlanRejected> {
    if plan.run_dast && scope.allowed_domains.is_empty() {
        return Err(PlanRejected(
            "DAST requested but no domains allowed".to_string(),
        ));
    }

    if plan.limits.max_requests > scope.max_requests {
        plan.limits.max_requests = scope.max_requests;
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScanLimits;

    fn plan(run_dast: bool, max_requests: u32) -> ExecutionPlan {
        ExecutionPlan {
            run_sast: true,
            run_sca: true,
            run_dast,
            reason: "test".to_string(),
            limits: ScanLimits {
                max_runtime_seconds: 300,
                max_requests,
            },
        }
    }

    fn scope(domains: &[&str], max_requests: u32) -> ScopePolicy {
        ScopePolicy {
            allowed_repo_prefixes: Vec::new(),
            allowed_domains: domains.iter().map(|s| s.to_string()).collect(),
            allowed_schemes: vec!["https".to_string()],
            max_requests,
            max_runtime_seconds: 900,
            safe_mode: false,
        }
    }

    #[test]
    fn dast_with_no_allowed_domains_is_rejected() {
        let result = enforce_plan(plan(true, 100), &scope(&[], 500));
        assert!(result.is_err());
    }

    #[test]
    fn max_requests_is_clamped_down_never_up() {
        let result = enforce_plan(plan(false, 9999), &scope(&["localhost"], 200)).unwrap();
        assert_eq!(result.limits.max_requests, 200);
        assert_eq!(result.limits.max_runtime_seconds, 300, "runtime is never clamped here");
    }

    #[test]
    fn max_requests_below_scope_is_untouched() {
        let result = enforce_plan(plan(false, 50), &scope(&["localhost"], 200)).unwrap();
        assert_eq!(result.limits.max_requests, 50);
    }
}
