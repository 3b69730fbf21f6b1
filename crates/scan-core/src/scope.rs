//! Immutable allowlist enforcement (spec.md §4.5 step 4, §8 invariant 8).

use url::Url;

use crate::model::ScopePolicy;

/// A repo URL / target URL fell outside the [`ScopePolicy`] that governs a
/// run. Carries a human-readable reason used to build the `SYSTEM` finding.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct ScopeViolation(pub String);

/// Checks `repo_path` against `scope.allowed_repo_prefixes`. A local
/// filesystem path (not starting with a scheme) is always in scope —
/// only remote clone URLs are allowlisted.
pub fn validate_repo_scope(repo_path: &str, scope: &ScopePolicy) -> Result<(), ScopeViolation> {
    if !repo_path.contains("://") {
        return Ok(());
    }
    if scope
        .allowed_repo_prefixes
        .iter()
        .any(|prefix| repo_path.starts_with(prefix.as_str()))
    {
        Ok(())
    } else {
        Err(ScopeViolation(format!(
            "repo_path '{repo_path}' is not under an allowed prefix"
        )))
    }
}

/// Checks a DAST target URL's scheme and hostname against `scope`
/// (spec.md §8 invariant 8): the hostname must equal or be a suffix match
/// of some allowed domain, and the scheme must be in `allowed_schemes`.
pub fn validate_target_url(target_url: &str, scope: &ScopePolicy) -> Result<(), ScopeViolation> {
    let url = Url::parse(target_url)
        .map_err(|e| ScopeViolation(format!("invalid target_url '{target_url}': {e}")))?;

    let scheme = url.scheme();
    if !scope.allowed_schemes.iter().any(|s| s == scheme) {
        return Err(ScopeViolation(format!("scheme '{scheme}' is not allowed")));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ScopeViolation(format!("target_url '{target_url}' has no host")))?;

    let allowed = scope.allowed_domains.iter().any(|domain| {
        host == domain || host.ends_with(&format!(".{domain}"))
    });

    if allowed {
        Ok(())
    } else {
        Err(ScopeViolation(format!(
            "host '{host}' is not in the allowed domain list"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(domains: &[&str]) -> ScopePolicy {
        ScopePolicy {
            allowed_repo_prefixes: vec!["https://github.com/acme/".to_string()],
            allowed_domains: domains.iter().map(|s| s.to_string()).collect(),
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
            max_requests: 200,
            max_runtime_seconds: 300,
            safe_mode: true,
        }
    }

    #[test]
    fn local_paths_are_always_in_scope() {
        assert!(validate_repo_scope("/tmp/checkout", &scope(&["localhost"])).is_ok());
    }

    #[test]
    fn remote_repo_outside_prefix_is_rejected() {
        assert!(validate_repo_scope("https://evil.example/repo", &scope(&["localhost"])).is_err());
    }

    #[test]
    fn exact_domain_match_is_allowed() {
        assert!(validate_target_url("https://localhost/path", &scope(&["localhost"])).is_ok());
    }

    #[test]
    fn suffix_domain_match_is_allowed() {
        assert!(validate_target_url("https://api.example.com/x", &scope(&["example.com"])).is_ok());
    }

    #[test]
    fn unrelated_domain_is_rejected() {
        let err = validate_target_url("http://evil.example", &scope(&["localhost"]));
        assert!(err.is_err());
    }

    #[test]
    fn disallowed_scheme_is_rejected() {
        assert!(validate_target_url("ftp://localhost", &scope(&["localhost"])).is_err());
    }
}
