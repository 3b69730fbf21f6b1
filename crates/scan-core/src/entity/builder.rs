use crate::fingerprint::entity_signature;
use crate::model::{Finding, FindingEntity};

/// Groups findings by `entity_signature = SHA256(category|tool|rule_id|file)`;
/// one entity per bucket, inheriting the first signal's category, severity,
/// and confidence (spec.md §4.7, Builder). Insertion order is preserved.
pub fn build_entities(findings: Vec<Finding>) -> Vec<FindingEntity> {
    let mut entities: Vec<FindingEntity> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for finding in findings {
        let signature = entity_signature(
            &finding.category.to_string(),
            &finding.tool,
            &finding.rule_id,
            &finding.file,
        );

        if let Some(&pos) = index.get(&signature) {
            entities[pos].signals.push(finding);
        } else {
            index.insert(signature.clone(), entities.len());
            entities.push(FindingEntity::from_first_signal(signature, finding));
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Confidence, Severity};
    use serde_json::json;

    fn finding(rule_id: &str, file: &str) -> Finding {
        Finding {
            category: Category::Sast,
            tool: "semgrep".to_string(),
            rule_id: rule_id.to_string(),
            title: rule_id.to_string(),
            severity: Severity::High,
            confidence: Confidence::Medium,
            file: file.to_string(),
            line: None,
            fingerprint: "fp".to_string(),
            occurrences: 1,
            evidence: json!({}),
        }
    }

    #[test]
    fn matching_signatures_group_into_one_entity() {
        let entities = build_entities(vec![finding("r1", "a.py"), finding("r1", "a.py")]);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].signals.len(), 2);
    }

    #[test]
    fn distinct_signatures_stay_separate() {
        let entities = build_entities(vec![finding("r1", "a.py"), finding("r2", "b.py")]);
        assert_eq!(entities.len(), 2);
    }
}
