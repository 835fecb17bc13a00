//! Ollama HTTP backend
//!
//! Non-streaming `POST {base_url}/api/generate`. The gateway keys its circuit
//! breakers by [`GenerationBackend::endpoint`], which is the server base URL:
//! one unhealthy server trips one breaker for every model it hosts.

use async_trait::async_trait;
use foresight_application::ports::generation_backend::{BackendError, GenerationBackend};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Backend talking to an Ollama (or Ollama-compatible) server.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

/// Map a non-success HTTP status to a backend error.
///
/// Throttling and server-side errors are worth retrying; anything else the
/// server rejected (unknown model, malformed request, auth) will not improve.
fn status_error(status: StatusCode, body: &str) -> BackendError {
    let snippet: String = body.chars().take(200).collect();
    let reason = format!("HTTP {}: {}", status.as_u16(), snippet.trim());
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        BackendError::transient(reason)
    } else {
        BackendError::permanent(reason)
    }
}

fn transport_error(e: &reqwest::Error) -> BackendError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        BackendError::transient(e.to_string())
    } else {
        BackendError::permanent(e.to_string())
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn endpoint(&self, _model_id: &str) -> String {
        self.base_url.clone()
    }

    async fn generate(
        &self,
        model_id: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, BackendError> {
        let mut builder = self
            .client
            .post(self.generate_url())
            .timeout(timeout)
            .json(&GenerateRequest {
                model: model_id,
                prompt,
                stream: false,
            });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendError::permanent(format!("malformed response: {e}")))?;
        debug!(model = model_id, bytes = body.response.len(), "Ollama reply");
        Ok(body.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = OllamaBackend::new("http://host:11434/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url(), "http://host:11434");
        assert_eq!(backend.generate_url(), "http://host:11434/api/generate");
        assert_eq!(backend.endpoint("gemma:2b"), backend.endpoint("llama3"));
    }

    #[test]
    fn test_status_classification() {
        assert!(status_error(StatusCode::SERVICE_UNAVAILABLE, "").is_transient());
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(status_error(StatusCode::REQUEST_TIMEOUT, "").is_transient());
        assert!(!status_error(StatusCode::NOT_FOUND, "model not found").is_transient());
        assert!(!status_error(StatusCode::BAD_REQUEST, "").is_transient());
        assert!(!status_error(StatusCode::UNAUTHORIZED, "").is_transient());
    }

    #[test]
    fn test_status_reason_is_truncated() {
        let err = status_error(StatusCode::NOT_FOUND, &"x".repeat(1000));
        assert!(err.reason.starts_with("HTTP 404: "));
        assert!(err.reason.len() < 220);
    }

    #[test]
    fn test_blank_api_key_ignored() {
        let backend = OllamaBackend::new(DEFAULT_BASE_URL, Duration::from_secs(1))
            .unwrap()
            .with_api_key(Some("  ".to_string()));
        assert!(backend.api_key.is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateRequest {
            model: "gemma:2b",
            prompt: "hi",
            stream: false,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"model": "gemma:2b", "prompt": "hi", "stream": false}));
    }

    #[test]
    fn test_missing_response_field_defaults_empty() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.response.is_empty());
    }
}
