use std::collections::HashMap;

use crate::model::{Category, Confidence, FindingEntity, Severity};

fn severity_rank(s: Severity) -> u32 {
    s.weight()
}

/// The dependency key an SCA entity collapses on: `evidence.package`,
/// falling back to the entity's representative `file` (spec.md §4.7,
/// SPEC_FULL.md §4.7).
fn dependency_key(entity: &FindingEntity) -> String {
    entity
        .signals
        .first()
        .and_then(|f| f.evidence.get("package"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| entity.signals.first().map(|f| f.file.clone()).unwrap_or_default())
}

/// Groups SCA entities by dependency; when more than one entity shares a
/// dependency, collapses them into the highest-severity entity, renamed
/// `"Outdated dependency: <dep>"`, with all signals merged in and
/// confidence left at MEDIUM (spec.md §4.7, SCA collapse).
pub fn sca_collapse(entities: Vec<FindingEntity>) -> Vec<FindingEntity> {
    let mut sca: Vec<FindingEntity> = Vec::new();
    let mut other: Vec<FindingEntity> = Vec::new();

    for entity in entities {
        if entity.category == Category::Sca {
            sca.push(entity);
        } else {
            other.push(entity);
        }
    }

    let mut groups: HashMap<String, Vec<FindingEntity>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for entity in sca {
        let key = dependency_key(&entity);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(entity);
    }

    for dep in order {
        let mut group = groups.remove(&dep).unwrap_or_default();
        if group.len() == 1 {
            other.push(group.pop().unwrap());
            continue;
        }

        let base_pos = group
            .iter()
            .enumerate()
            .max_by_key(|(_, e)| severity_rank(e.severity))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let mut base = group.remove(base_pos);
        base.title = format!("Outdated dependency: {dep}");
        base.confidence = Confidence::Medium;
        for remaining in group {
            base.signals.extend(remaining.signals);
        }
        other.push(base);
    }

    other
}
