use std::collections::HashMap;

use serde_json::json;

use crate::fingerprint::sha256_hex;
use crate::model::{Category, Confidence, Finding, Severity};

/// The result of the Config runner's single HTTPS GET (spec.md §4.3/§6):
/// response headers and raw `Set-Cookie` values.
#[derive(Debug, Clone)]
pub struct ConfigProbeResult {
    pub host: String,
    pub headers: HashMap<String, String>,
    pub set_cookies: Vec<String>,
}

const REQUIRED_HEADERS: &[&str] = &[
    "Content-Security-Policy",
    "Strict-Transport-Security",
    "X-Frame-Options",
    "X-Content-Type-Options",
    "Referrer-Policy",
];

const COOKIE_FLAGS: &[&str] = &["Secure", "HttpOnly"];

fn slug(s: &str) -> String {
    s.to_ascii_lowercase()
}

fn has_header(headers: &HashMap<String, String>, name: &str) -> bool {
    headers.keys().any(|k| k.eq_ignore_ascii_case(name))
}

/// One finding per missing security header and per missing cookie flag
/// (spec.md §4.4, §6).
pub fn normalize_config(probe: &ConfigProbeResult) -> Vec<Finding> {
    let mut findings = Vec::new();

    for header in REQUIRED_HEADERS {
        if !has_header(&probe.headers, header) {
            let rule_id = format!("missing-header-{}", slug(header));
            let fingerprint = sha256_hex(format!("config|{}|{rule_id}", probe.host).as_bytes());
            findings.push(Finding {
                category: Category::Config,
                tool: "config-checker".to_string(),
                rule_id: rule_id.clone(),
                title: format!("Missing security header: {header}"),
                severity: Severity::Medium,
                confidence: Confidence::High,
                file: probe.host.clone(),
                line: None,
                fingerprint,
                occurrences: 1,
                evidence: json!({ "header": header }),
            });
        }
    }

    for cookie in &probe.set_cookies {
        let lower = cookie.to_ascii_lowercase();
        for flag in COOKIE_FLAGS {
            if !lower.contains(&flag.to_ascii_lowercase()) {
                let rule_id = format!("missing-cookie-flag-{}", slug(flag));
                let fingerprint =
                    sha256_hex(format!("config|{}|{rule_id}|{cookie}", probe.host).as_bytes());
                findings.push(Finding {
                    category: Category::Config,
                    tool: "config-checker".to_string(),
                    rule_id: rule_id.clone(),
                    title: format!("Cookie missing {flag} flag"),
                    severity: Severity::Medium,
                    confidence: Confidence::High,
                    file: probe.host.clone(),
                    line: None,
                    fingerprint,
                    occurrences: 1,
                    evidence: json!({ "set_cookie": cookie, "flag": flag }),
                });
            }
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_every_missing_header() {
        let probe = ConfigProbeResult {
            host: "example.com".to_string(),
            headers: HashMap::new(),
            set_cookies: Vec::new(),
        };
        let findings = normalize_config(&probe);
        assert_eq!(findings.len(), REQUIRED_HEADERS.len());
    }

    #[test]
    fn present_headers_are_not_flagged() {
        let mut headers = HashMap::new();
        for h in REQUIRED_HEADERS {
            headers.insert(h.to_string(), "present".to_string());
        }
        let probe = ConfigProbeResult {
            host: "example.com".to_string(),
            headers,
            set_cookies: Vec::new(),
        };
        assert!(normalize_config(&probe).is_empty());
    }

    #[test]
    fn insecure_cookie_flags_both_missing_attributes() {
        let mut headers = HashMap::new();
        for h in REQUIRED_HEADERS {
            headers.insert(h.to_string(), "present".to_string());
        }
        let probe = ConfigProbeResult {
            host: "example.com".to_string(),
            headers,
            set_cookies: vec!["session=abc; Path=/".to_string()],
        };
        let findings = normalize_config(&probe);
        assert_eq!(findings.len(), 2);
    }
}
