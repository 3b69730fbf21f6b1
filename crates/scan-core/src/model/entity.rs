use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::finding::Finding;
use super::severity::{Category, Confidence, Severity};

/// A grouped view of one or more [`Finding`]s representing a single
/// security issue (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingEntity {
    /// `SHA256(category|tool|rule_id|file)`, stable across runs.
    pub entity_id: String,
    pub title: String,
    pub category: Category,
    pub severity: Severity,
    pub confidence: Confidence,
    pub signals: Vec<Finding>,

    #[serde(default)]
    pub exploitability: f64,
    #[serde(default)]
    pub risk_score: i64,
    #[serde(default)]
    pub sla_days: u32,

    #[serde(default)]
    pub first_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    pub times_seen: u32,
    #[serde(default)]
    pub resurfaced: bool,
}

impl FindingEntity {
    /// A fresh entity seeded from its first signal; inherits that signal's
    /// category/severity/confidence/title (spec.md §4.7, Builder).
    pub fn from_first_signal(entity_id: String, signal: Finding) -> Self {
        FindingEntity {
            entity_id,
            title: signal.title.clone(),
            category: signal.category,
            severity: signal.severity,
            confidence: signal.confidence,
            signals: vec![signal],
            exploitability: 0.0,
            risk_score: 0,
            sla_days: 0,
            first_seen: None,
            last_seen: None,
            times_seen: 0,
            resurfaced: false,
        }
    }
}
