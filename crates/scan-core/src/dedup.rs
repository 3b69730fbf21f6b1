//! Three deterministic dedup tiers applied in order (spec.md §4.6).

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::model::{Category, Confidence, Finding};

/// Family tokens used for cross-tool correlation (spec.md §4.6). Distinct
/// from (slightly larger than) the semantic-merge token set in §4.7.
const FAMILY_TOKENS: &[&str] = &[
    "sql",
    "xss",
    "auth",
    "csrf",
    "ssrf",
    "rce",
    "command",
    "deserialization",
    "tls",
    "cipher",
    "crypto",
];

fn family_tokens_of(finding: &Finding) -> Vec<&'static str> {
    let haystack = format!("{} {}", finding.rule_id, finding.title).to_ascii_lowercase();
    FAMILY_TOKENS
        .iter()
        .copied()
        .filter(|tok| haystack.contains(tok))
        .collect()
}

fn shares_family(a: &Finding, b: &Finding) -> bool {
    if a.rule_id == b.rule_id {
        return true;
    }
    let a_tokens = family_tokens_of(a);
    let b_tokens = family_tokens_of(b);
    a_tokens.iter().any(|t| b_tokens.contains(t))
}

/// Basename (or URL path's last segment) without extension, lowercased.
/// Empty, length ≤ 2, or the literal `"index"` never match (spec.md §4.6).
fn stem(file: &str) -> Option<String> {
    let last_segment = file.rsplit('/').next().unwrap_or(file);
    let without_ext = match last_segment.rsplit_once('.') {
        Some((base, _ext)) if !base.is_empty() => base,
        _ => last_segment,
    };
    let lowered = without_ext.to_ascii_lowercase();
    if lowered.is_empty() || lowered.len() <= 2 || lowered == "index" {
        None
    } else {
        Some(lowered)
    }
}

fn shares_surface(a: &Finding, b: &Finding) -> bool {
    match (stem(&a.file), stem(&b.file)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Wraps `canonical`'s evidence as `{"signals": [...]}` (idempotently) and
/// appends `other`'s evidence, then bumps `occurrences` (spec.md §4.6).
fn merge_into(canonical: &mut Finding, other: Finding) {
    canonical.occurrences += other.occurrences;

    let other_evidence = other.evidence;
    match canonical.evidence {
        Value::Object(ref mut obj) if obj.contains_key("signals") => {
            if let Some(arr) = obj.get_mut("signals").and_then(Value::as_array_mut) {
                arr.push(other_evidence);
            }
        }
        _ => {
            let prior = canonical.evidence.clone();
            canonical.evidence = json!({ "signals": [prior, other_evidence] });
        }
    }
}

fn is_sast_or_dast(category: Category) -> bool {
    matches!(category, Category::Sast | Category::Dast)
}

/// Tier 1 + tier 2: group by an exact key, first occurrence canonical,
/// later occurrences merged in (spec.md §4.6).
fn merge_by_key<K: Eq + std::hash::Hash>(
    findings: Vec<Finding>,
    key_of: impl Fn(&Finding) -> K,
) -> Vec<Finding> {
    let mut order: Vec<Finding> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for finding in findings {
        let key = key_of(&finding);
        if let Some(&pos) = index.get(&key) {
            merge_into(&mut order[pos], finding);
        } else {
            index.insert(key, order.len());
            order.push(finding);
        }
    }

    order
}

/// Tier 3: cross-tool correlation between SAST and DAST only. Each
/// candidate is compared only against the *already-finalized* output list
/// (never against another pending item), forbidding three-way merges in a
/// single pass (spec.md §9 Open Question (a)).
fn correlate_cross_tool(findings: Vec<Finding>) -> Vec<Finding> {
    let mut finalized: Vec<Finding> = Vec::new();

    'outer: for finding in findings {
        if is_sast_or_dast(finding.category) {
            for existing in finalized.iter_mut() {
                if existing.category == finding.category || !is_sast_or_dast(existing.category) {
                    continue;
                }
                if shares_family(existing, &finding) && shares_surface(existing, &finding) {
                    merge_into(existing, finding);
                    existing.confidence = Confidence::High;
                    continue 'outer;
                }
            }
        }
        finalized.push(finding);
    }

    finalized
}

/// Applies all three tiers in order. Total, order-insensitive across tier
/// boundaries, stable within a tier (spec.md §4.6, §8 invariants 4/5).
pub fn dedup(findings: Vec<Finding>) -> Vec<Finding> {
    let tier1 = merge_by_key(findings, |f| f.fingerprint.clone());
    let tier2 = merge_by_key(tier1, |f| (f.category, f.tool.clone(), f.rule_id.clone()));
    correlate_cross_tool(tier2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn finding(category: Category, tool: &str, rule_id: &str, file: &str, fp: &str) -> Finding {
        Finding {
            category,
            tool: tool.to_string(),
            rule_id: rule_id.to_string(),
            title: rule_id.to_string(),
            severity: Severity::High,
            confidence: Confidence::Medium,
            file: file.to_string(),
            line: None,
            fingerprint: fp.to_string(),
            occurrences: 1,
            evidence: json!({}),
        }
    }

    #[test]
    fn exact_fingerprint_collisions_merge() {
        let findings = vec![
            finding(Category::Sast, "semgrep", "r1", "a.py", "fp1"),
            finding(Category::Sast, "semgrep", "r1", "a.py", "fp1"),
        ];
        let result = dedup(findings);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].occurrences, 2);
    }

    #[test]
    fn sast_dast_correlate_on_shared_family_and_stem() {
        let findings = vec![
            finding(Category::Sast, "semgrep", "python-xss", "app/login.py", "fp1"),
            finding(Category::Dast, "nuclei", "reflected-xss", "http://host/login", "fp2"),
        ];
        let result = dedup(findings);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].occurrences, 2);
        assert_eq!(result[0].confidence, Confidence::High);
    }

    #[test]
    fn different_surfaces_do_not_correlate() {
        let findings = vec![
            finding(Category::Sast, "semgrep", "python-xss", "app/login.py", "fp1"),
            finding(Category::Dast, "nuclei", "reflected-xss", "http://host/other", "fp2"),
        ];
        assert_eq!(dedup(findings).len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let findings = vec![
            finding(Category::Sast, "semgrep", "r1", "a.py", "fp1"),
            finding(Category::Sast, "semgrep", "r1", "a.py", "fp1"),
            finding(Category::Sca, "grype", "r2", "b@1.0", "fp2"),
        ];
        let once = dedup(findings);
        let distinct_fingerprints_once: std::collections::HashSet<_> =
            once.iter().map(|f| f.fingerprint.clone()).collect();
        let twice = dedup(once.clone());
        let distinct_fingerprints_twice: std::collections::HashSet<_> =
            twice.iter().map(|f| f.fingerprint.clone()).collect();
        assert_eq!(distinct_fingerprints_once, distinct_fingerprints_twice);
        assert_eq!(once.len(), twice.len());
    }
}
