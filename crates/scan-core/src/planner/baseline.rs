use crate::model::{AgentContext, ExecutionPlan, ScanLimits};

const PR_LIMITS: ScanLimits = ScanLimits {
    max_runtime_seconds: 300,
    max_requests: 200,
};

const NON_PR_LIMITS: ScanLimits = ScanLimits {
    max_runtime_seconds: 900,
    max_requests: 1000,
};

/// Languages the original pack recognizes as implying a package-manager
/// ecosystem, used by `run_sca`'s fallback condition even when no explicit
/// `dependencies` were reported (spec.md §4.1).
const ECOSYSTEM_LANGUAGES: &[&str] = &[
    "python", "javascript", "typescript", "java", "go", "rust", "ruby", "php",
];

/// Always available, always called first (spec.md §4.1).
pub fn baseline_plan(ctx: &AgentContext) -> ExecutionPlan {
    let run_sast = !ctx.languages.is_empty();
    let run_sca = !ctx.dependencies.is_empty()
        || ctx
            .languages
            .iter()
            .any(|lang| ECOSYSTEM_LANGUAGES.contains(&lang.to_ascii_lowercase().as_str()));
    let run_dast = ctx.has_public_endpoint && !ctx.is_pr;

    let limits = if ctx.is_pr { PR_LIMITS } else { NON_PR_LIMITS };

    ExecutionPlan {
        run_sast,
        run_sca,
        run_dast,
        reason: "fallback_planner_baseline".to_string(),
        limits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pr_with_public_endpoint_never_runs_dast() {
        let ctx = AgentContext {
            languages: vec!["python".to_string()],
            dependencies: vec!["flask".to_string()],
            is_pr: true,
            has_public_endpoint: true,
            ..Default::default()
        };
        let plan = baseline_plan(&ctx);
        assert!(!plan.run_dast);
        assert_eq!(plan.limits, PR_LIMITS);
    }

    #[test]
    fn non_pr_public_endpoint_runs_dast() {
        let ctx = AgentContext {
            languages: vec!["go".to_string()],
            is_pr: false,
            has_public_endpoint: true,
            ..Default::default()
        };
        let plan = baseline_plan(&ctx);
        assert!(plan.run_dast);
        assert_eq!(plan.limits, NON_PR_LIMITS);
    }

    #[test]
    fn no_languages_no_deps_skips_sast_and_sca() {
        let ctx = AgentContext::default();
        let plan = baseline_plan(&ctx);
        assert!(!plan.run_sast);
        assert!(!plan.run_sca);
    }

    #[test]
    fn ecosystem_language_without_explicit_deps_still_runs_sca() {
        let ctx = AgentContext {
            languages: vec!["Python".to_string()],
            ..Default::default()
        };
        assert!(baseline_plan(&ctx).run_sca);
    }
}
