use std::collections::HashSet;

use crate::model::{Category, Confidence, FindingEntity};

/// TLS-family variants that all collapse to a single `"tls"` token
/// (spec.md §4.7, SPEC_FULL.md §4.7).
const TLS_VARIANTS: &[&str] = &["tls", "ssl", "cipher", "protocol", "weak-ssl", "weak-cipher"];

/// Remaining family tokens, passed through verbatim.
const OTHER_FAMILIES: &[&str] = &[
    "xss",
    "sql",
    "auth",
    "csrf",
    "ssrf",
    "rce",
    "deserialization",
    "crypto",
];

fn tokens_of(entity: &FindingEntity) -> HashSet<&'static str> {
    let mut tokens = HashSet::new();
    for signal in &entity.signals {
        let haystack = format!("{} {}", signal.rule_id, signal.title).to_ascii_lowercase();
        if TLS_VARIANTS.iter().any(|v| haystack.contains(v)) {
            tokens.insert("tls");
        }
        for family in OTHER_FAMILIES {
            if haystack.contains(family) {
                tokens.insert(*family);
            }
        }
    }
    tokens
}

fn shares_token(a: &HashSet<&'static str>, b: &HashSet<&'static str>) -> bool {
    a.intersection(b).next().is_some()
}

/// Pairwise merges entities that share a family token and differ in
/// category, promoting the merged entity to `Category::Multi` with
/// `Confidence::High` (spec.md §4.7, Layer 2).
pub fn semantic_merge(entities: Vec<FindingEntity>) -> Vec<FindingEntity> {
    let mut finalized: Vec<FindingEntity> = Vec::new();
    let mut finalized_tokens: Vec<HashSet<&'static str>> = Vec::new();

    'outer: for entity in entities {
        let entity_tokens = tokens_of(&entity);

        for (pos, existing) in finalized.iter_mut().enumerate() {
            if existing.category == entity.category {
                continue;
            }
            if shares_token(&finalized_tokens[pos], &entity_tokens) {
                existing.signals.extend(entity.signals);
                existing.category = Category::Multi;
                existing.confidence = Confidence::High;
                finalized_tokens[pos].extend(entity_tokens);
                continue 'outer;
            }
        }

        finalized_tokens.push(entity_tokens);
        finalized.push(entity);
    }

    finalized
}
