//! Stable content-addressed identity for findings and entities (spec.md §3).

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the given bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Collapses whitespace runs to a single space and trims, matching the
/// SAST fingerprint's `normalized_code` input (spec.md §3).
pub fn normalize_code(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `tool | rule_id | file_path | normalized_code`.
pub fn sast_fingerprint(tool: &str, rule_id: &str, file_path: &str, code: &str) -> String {
    let normalized = normalize_code(code);
    let joined = format!("{tool}|{rule_id}|{file_path}|{normalized}");
    sha256_hex(joined.as_bytes())
}

/// `tool | template_id | host | path | parameter_or_empty`.
pub fn dast_fingerprint(
    tool: &str,
    template_id: &str,
    host: &str,
    path: &str,
    parameter: Option<&str>,
) -> String {
    let joined = format!(
        "{tool}|{template_id}|{host}|{path}|{}",
        parameter.unwrap_or("")
    );
    sha256_hex(joined.as_bytes())
}

/// `tool | cve_id | package | installed_version`.
///
/// Open Question (b) (spec.md §9) requires fingerprints to match on
/// `(cve_id, package, installed_version)` *regardless of backend*, which
/// is in tension with the literal `tool | …` rule if two SCA backends
/// (Grype vs OSV/pip-audit) name themselves differently. We resolve this
/// by hashing a canonical `"sca"` literal in the tool slot instead of the
/// backend's own name — the backend name is still preserved on the
/// `Finding.tool` field itself, only the fingerprint input is canonicalized.
pub fn sca_fingerprint(cve_id: &str, package: &str, installed_version: &str) -> String {
    let joined = format!("sca|{cve_id}|{package}|{installed_version}");
    sha256_hex(joined.as_bytes())
}

/// `SHA256(category|tool|rule_id|file)`, the Entity Builder's grouping key
/// (spec.md §4.7).
pub fn entity_signature(category: &str, tool: &str, rule_id: &str, file: &str) -> String {
    let joined = format!("{category}|{tool}|{rule_id}|{file}");
    sha256_hex(joined.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_code_collapses_whitespace() {
        assert_eq!(normalize_code("  foo   bar\n\tbaz  "), "foo bar baz");
    }

    #[test]
    fn sast_fingerprint_is_deterministic() {
        let a = sast_fingerprint("semgrep", "python-xss", "app/login.py", "x = input()");
        let b = sast_fingerprint("semgrep", "python-xss", "app/login.py", "x  =   input()  ");
        assert_eq!(a, b, "whitespace differences must not change the fingerprint");
    }

    #[test]
    fn sca_fingerprint_ignores_backend_name() {
        let grype = sca_fingerprint("CVE-2021-1234", "requests", "2.0.0");
        let osv = sca_fingerprint("CVE-2021-1234", "requests", "2.0.0");
        assert_eq!(grype, osv);
    }

    #[test]
    fn different_inputs_yield_different_fingerprints() {
        let a = sast_fingerprint("semgrep", "python-xss", "app/login.py", "code");
        let b = sast_fingerprint("semgrep", "python-xss", "app/other.py", "code");
        assert_ne!(a, b);
    }
}
