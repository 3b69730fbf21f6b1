//! Single-GET HTTP configuration inspector (spec.md §4.3, §6).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use scan_core::orchestrator::ConfigAdapter;
use scan_core::normalize::ConfigProbeResult;

const USER_AGENT: &str = "deplai-security-check";
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs exactly one HTTPS GET against `scheme://host` and collects the
/// response headers and raw `Set-Cookie` values (spec.md §4.3).
#[derive(Default)]
pub struct HttpConfigAdapter;

/// Splits `target_url` into a `(host, scheme://host)` pair for the probe
/// request, dropping path/query so only the origin is ever contacted.
fn probe_root(target_url: &str) -> anyhow::Result<(String, String)> {
    let parsed = url::Url::parse(target_url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("target_url has no host"))?
        .to_string();
    let root = format!("{}://{host}", parsed.scheme());
    Ok((host, root))
}

#[async_trait]
impl ConfigAdapter for HttpConfigAdapter {
    async fn probe(&self, target_url: &str) -> anyhow::Result<ConfigProbeResult> {
        let (host, root) = probe_root(target_url)?;

        let client = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        let response = client.get(&root).send().await?;

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let set_cookies = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();

        Ok(ConfigProbeResult {
            host,
            headers,
            set_cookies,
        })
    }
}
