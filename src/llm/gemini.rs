use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::provider::AgentProvider;
use super::role::AgentRole;
use crate::config::GeminiConfig;
use crate::errors::VulnexError;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_BODY_SNIPPET: usize = 200;

#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        model: Option<&str>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, VulnexError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url).map_err(|e| {
            VulnexError::ProviderUnavailable(format!("invalid Gemini base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(crate::config::types::DEFAULT_MODEL).to_string(),
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &GeminiConfig) -> Result<Self, VulnexError> {
        Self::new(
            config.api_key.as_deref().unwrap_or(""),
            Some(config.model()),
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }
}

#[async_trait]
impl AgentProvider for GeminiClient {
    async fn call(
        &self,
        role: AgentRole,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, VulnexError> {
        if self.api_key.trim().is_empty() {
            return Err(VulnexError::MissingApiKey(
                "set GEMINI_API_KEY or the gemini.api_key config field".into(),
            ));
        }
        if cancel.is_cancelled() {
            return Err(VulnexError::Cancelled(
                "extraction cancelled before the provider call started".into(),
            ));
        }

        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{
                    "text": format!("System: {}\n\n{}", role.system_instructions(), prompt)
                }]
            }],
            "generationConfig": {
                "maxOutputTokens": 16384,
                "temperature": 0.2,
            }
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(role = %role, model = %self.model, "Calling Gemini");

        let request = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.trim())
            .json(&body)
            .send();

        // Caller cancellation wins over the provider deadline; both are
        // distinguished from transport faults.
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(VulnexError::Cancelled(
                    "extraction cancelled during the provider call".into(),
                ));
            }
            outcome = tokio::time::timeout(self.timeout, request) => match outcome {
                Err(_) => {
                    return Err(VulnexError::Timeout(format!(
                        "Gemini call exceeded the {}s deadline",
                        self.timeout.as_secs()
                    )));
                }
                Ok(Err(e)) if e.is_timeout() => {
                    return Err(VulnexError::Timeout(format!("Gemini request timed out: {}", e)));
                }
                Ok(Err(e)) if e.is_connect() || e.is_request() => {
                    return Err(VulnexError::Transport(format!("Gemini request failed: {}", e)));
                }
                Ok(Err(e)) => {
                    return Err(VulnexError::Unexpected(format!("Gemini request failed: {}", e)));
                }
                Ok(Ok(response)) => response,
            },
        };

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| VulnexError::Transport(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(VulnexError::ProviderHttp(format!(
                "{} {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("unknown status"),
                snippet(&text)
            )));
        }

        extract_payload(&text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Pull the first non-empty text part out of the Gemini response envelope.
/// Syntax failures and shape failures both map to `ResponseParse`; the
/// message says which one happened.
fn extract_payload(body: &str) -> Result<String, VulnexError> {
    let data: Value = serde_json::from_str(body).map_err(|e| {
        VulnexError::ResponseParse(format!("response body is not valid JSON: {}", e))
    })?;

    if let Some(error) = data.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown provider error");
        return Err(VulnexError::ProviderHttp(message.to_string()));
    }

    let candidates = data
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            VulnexError::ResponseParse("response envelope has no candidates array".into())
        })?;
    if candidates.is_empty() {
        return Err(VulnexError::ResponseParse(
            "response envelope has an empty candidates array".into(),
        ));
    }

    for candidate in candidates {
        let parts = candidate
            .pointer("/content/parts")
            .and_then(Value::as_array);
        let Some(parts) = parts else { continue };
        for part in parts {
            if let Some(text) = part.get("text").and_then(Value::as_str) {
                if !text.trim().is_empty() {
                    return Ok(text.to_string());
                }
            }
        }
    }

    Err(VulnexError::ResponseParse(
        "no candidate carried a non-empty text part".into(),
    ))
}

fn snippet(body: &str) -> String {
    body.trim().chars().take(MAX_BODY_SNIPPET).collect()
}
