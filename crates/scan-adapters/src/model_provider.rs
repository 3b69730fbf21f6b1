//! Vendor-agnostic HTTP text-completion port (spec.md §9, "Model-provider
//! IO"; SPEC_FULL.md §4.1). Deliberately knows nothing about any specific
//! vendor's wire format — it POSTs `{prompt}` and reads back `{text}`.

use std::time::Duration;

use async_trait::async_trait;
use scan_core::planner::ModelProvider;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
}

pub struct HttpModelProvider {
    pub endpoint: String,
    pub client: reqwest::Client,
}

impl HttpModelProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        HttpModelProvider {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(HttpModelProvider {
            endpoint: endpoint.into(),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl ModelProvider for HttpModelProvider {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CompletionRequest { prompt })
            .send()
            .await?
            .error_for_status()?
            .json::<CompletionResponse>()
            .await?;
        Ok(response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_as_bare_prompt_object() {
        let body = serde_json::to_value(CompletionRequest { prompt: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({"prompt": "hello"}));
    }

    #[test]
    fn response_deserializes_text_field() {
        let parsed: CompletionResponse = serde_json::from_str(r#"{"text": "plan: run sast"}"#).unwrap();
        assert_eq!(parsed.text, "plan: run sast");
    }
}
