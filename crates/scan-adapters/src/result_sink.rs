//! HTTP callback sink (spec.md §6, "Callback"). Failure is logged by the
//! orchestrator, never fatal — this adapter only needs to report errors
//! honestly.

use std::time::Duration;

use async_trait::async_trait;
use scan_core::model::ScanResult;
use scan_core::orchestrator::ResultSink;

const MIN_CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpResultSink {
    pub callback_url: String,
    pub client: reqwest::Client,
}

impl HttpResultSink {
    pub fn new(callback_url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(HttpResultSink {
            callback_url: callback_url.into(),
            client: reqwest::Client::builder()
                .timeout(MIN_CALLBACK_TIMEOUT)
                .build()?,
        })
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    async fn send(&self, result: &ScanResult) -> anyhow::Result<()> {
        self.client
            .post(&self.callback_url)
            .json(result)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::model::ScanStatus;

    #[test]
    fn sink_timeout_floor_matches_callback_minimum() {
        assert_eq!(MIN_CALLBACK_TIMEOUT, Duration::from_secs(10));
    }

    #[test]
    fn scan_result_round_trips_through_json() {
        let result = ScanResult {
            run_id: "run-1".to_string(),
            status: ScanStatus::Completed,
            tools: vec!["semgrep".to_string()],
            findings: Vec::new(),
        };
        let body = serde_json::to_value(&result).unwrap();
        assert_eq!(body["run_id"], "run-1");
        assert_eq!(body["status"], "COMPLETED");
    }
}
