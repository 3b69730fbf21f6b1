//! Context enrichment, risk scoring, SLA, and the glue that runs the full
//! entity pipeline (spec.md §4.7, §4.8, §4.9).

use chrono::{DateTime, Utc};

use crate::entity::{build_entities, sca_collapse, semantic_merge};
use crate::lifecycle::LifecycleStore;
use crate::model::{Category, Finding, FindingEntity};

fn has_runtime_signal(entity: &FindingEntity) -> bool {
    entity.signals.iter().any(|s| s.category == Category::Dast)
}

fn has_internet_evidence(entity: &FindingEntity) -> bool {
    entity.signals.iter().any(|s| s.file.contains("http"))
}

/// `0.4 * runtime_signal_present + 0.3 * internet_evidence + 0.3 *
/// high_or_critical`, clamped to 1.0 (spec.md §4.9).
pub fn exploitability(entity: &FindingEntity) -> f64 {
    let runtime = if has_runtime_signal(entity) { 0.4 } else { 0.0 };
    let internet = if has_internet_evidence(entity) { 0.3 } else { 0.0 };
    let severity_bonus = if entity.severity.is_high_or_critical() {
        0.3
    } else {
        0.0
    };
    (runtime + internet + severity_bonus).min(1.0)
}

/// `round(severity_weight * confidence_weight * (1 + exploitability) * 10)`
/// (spec.md §4.9).
pub fn risk_score(entity: &FindingEntity) -> i64 {
    let severity_weight = entity.severity.weight() as f64;
    let confidence_weight = entity.confidence.weight() as f64;
    let score =
        severity_weight * confidence_weight * (1.0 + exploitability(entity)) * 10.0;
    score.round() as i64
}

/// `>=80 -> 7`, `>=60 -> 14`, `>=40 -> 30`, else `90` days (spec.md §4.9).
pub fn sla_days(risk: i64) -> u32 {
    if risk >= 80 {
        7
    } else if risk >= 60 {
        14
    } else if risk >= 40 {
        30
    } else {
        90
    }
}

/// Runs the full Entity Builder → Semantic Merge → SCA Collapse →
/// Lifecycle → Context → Scoring chain over already-deduplicated findings
/// (spec.md §4, dataflow).
pub fn build_and_score_entities(
    findings: Vec<Finding>,
    lifecycle: &dyn LifecycleStore,
    now: DateTime<Utc>,
) -> Vec<FindingEntity> {
    let entities = build_entities(findings);
    let entities = semantic_merge(entities);
    let mut entities = sca_collapse(entities);

    for entity in &mut entities {
        let record = lifecycle.update(&entity.entity_id, now);
        entity.first_seen = Some(record.first_seen);
        entity.last_seen = Some(record.last_seen);
        entity.times_seen = record.times_seen;
        entity.resurfaced = record.resurfaced;

        entity.exploitability = exploitability(entity);
        entity.risk_score = risk_score(entity);
        entity.sla_days = sla_days(entity.risk_score);
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::InMemoryLifecycleStore;
    use crate::model::{Confidence, Severity};
    use serde_json::json;

    fn finding(category: Category, file: &str, severity: Severity) -> Finding {
        Finding {
            category,
            tool: "tool".to_string(),
            rule_id: "r1".to_string(),
            title: "t".to_string(),
            severity,
            confidence: Confidence::Medium,
            file: file.to_string(),
            line: None,
            fingerprint: "fp".to_string(),
            occurrences: 1,
            evidence: json!({}),
        }
    }

    #[test]
    fn risk_sla_matches_worked_example() {
        // spec.md §8 scenario 5: HIGH severity, MEDIUM confidence, no
        // runtime signal, no internet evidence -> exploitability 0.3,
        // risk 78, SLA 14.
        let entity = FindingEntity::from_first_signal(
            "e1".to_string(),
            finding(Category::Sast, "app/file.py", Severity::High),
        );
        let mut entity = entity;
        entity.confidence = Confidence::Medium;
        let exploit = exploitability(&entity);
        assert!((exploit - 0.3).abs() < 1e-9);
        let risk = risk_score(&entity);
        assert_eq!(risk, 78);
        assert_eq!(sla_days(risk), 14);
    }

    #[test]
    fn full_pipeline_populates_lifecycle_and_scoring() {
        let store = InMemoryLifecycleStore::new();
        let now = Utc::now();
        let findings = vec![finding(Category::Sast, "app/file.py", Severity::Critical)];
        let entities = build_and_score_entities(findings, &store, now);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].times_seen, 1);
        assert!(!entities[0].resurfaced);
        assert!(entities[0].risk_score > 0);
    }
}
