use serde::{Deserialize, Serialize};

/// Finding severity, ordered low to critical for comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Weight used by risk scoring (spec.md §4.9): LOW=1 .. CRITICAL=4.
    pub fn weight(self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn is_high_or_critical(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }

    /// Parses a free-form tool severity string, defaulting to Medium for
    /// anything unrecognized (matches the DAST normalizer's documented
    /// "default MEDIUM if unknown" behavior).
    pub fn from_tool_str(raw: &str) -> Severity {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Severity::Low,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            "MEDIUM" => Severity::Medium,
            _ => Severity::Medium,
        }
    }
}

/// Confidence that a finding reflects a real issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Weight used by risk scoring (spec.md §4.9): LOW=1, MED=2, HIGH=3.
    pub fn weight(self) -> u32 {
        match self {
            Confidence::Low => 1,
            Confidence::Medium => 2,
            Confidence::High => 3,
        }
    }
}

/// Analyzer category a [`Finding`](super::Finding) or
/// [`FindingEntity`](super::FindingEntity) belongs to.
///
/// `Multi` is never produced by a Normalizer; it is the promoted category
/// an entity receives once it has absorbed signals from more than one
/// category (spec.md §4.7, Semantic merge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Sast,
    Sca,
    Dast,
    Config,
    Auth,
    System,
    Multi,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Sast => "SAST",
            Category::Sca => "SCA",
            Category::Dast => "DAST",
            Category::Config => "CONFIG",
            Category::Auth => "AUTH",
            Category::System => "SYSTEM",
            Category::Multi => "MULTI",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_matches_weight_order() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn unknown_tool_severity_defaults_to_medium() {
        assert_eq!(Severity::from_tool_str("weird"), Severity::Medium);
        assert_eq!(Severity::from_tool_str("high"), Severity::High);
    }
}
