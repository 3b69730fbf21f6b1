//! Best-effort secret redaction applied to normalizer evidence fields only
//! (spec.md §4.4, §9 Open Question (c)).

use regex::Regex;
use std::sync::OnceLock;

const REDACTED: &str = "[REDACTED_SECRET]";

fn key_value_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)(api_key|auth_token|access_token|secret|password)\s*[:=]\s*['"][A-Za-z0-9_-]{8,}['"]"#,
        )
        .expect("static regex is valid")
    })
}

fn aws_key_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(A3T[A-Z0-9]|AKIA|AGPA|AIDA|AROA|AIPA|ANPA|ANVA|ASIA)[A-Z0-9]{16}"#)
            .expect("static regex is valid")
    })
}

/// Replaces generic `key=value`-style secret assignments and AWS access-key
/// IDs with a fixed marker. Applied before a `Finding` is constructed, never
/// to the underlying source tree.
pub fn redact_secrets(text: &str) -> String {
    let once = key_value_pattern().replace_all(text, |caps: &regex::Captures| {
        format!("{}={}", &caps[1], REDACTED)
    });
    aws_key_pattern().replace_all(&once, REDACTED).into_owned()
}
