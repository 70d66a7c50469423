use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::core::error::{ConfigError, ProviderError};
use crate::core::types::{HttpRequestSpec, ProviderId};

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Parsed upstream reply. Non-2xx replies with a JSON body are returned here
/// so the adapter can inspect the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status_code: u16,
    pub request_id: Option<String>,
    pub body: Value,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Single-shot JSON transport. Never retries; the router owns fallback.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), timeout_ms)
    }

    pub fn with_client(client: reqwest::Client, timeout_ms: u64) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }

        Ok(Self { client, timeout_ms })
    }

    pub async fn execute(
        &self,
        provider: &ProviderId,
        model: &str,
        spec: &HttpRequestSpec,
    ) -> Result<HttpReply, ProviderError> {
        let headers = build_headers(provider, model, spec)?;
        let payload = serde_json::to_vec(&spec.body).map_err(|error| {
            ProviderError::Serialization {
                provider: provider.clone(),
                model: model.to_string(),
                message: error.to_string(),
            }
        })?;

        debug!(%provider, model, url = %spec.url, "sending provider request");

        let response = self
            .client
            .request(spec.method.clone(), &spec.url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .headers(headers)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await
            .map_err(|error| ProviderError::Transport {
                provider: provider.clone(),
                model: model.to_string(),
                message: error.to_string(),
            })?;

        let status_code = response.status().as_u16();
        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let raw_body = response
            .text()
            .await
            .map_err(|error| ProviderError::Transport {
                provider: provider.clone(),
                model: model.to_string(),
                message: format!("failed to read response body: {error}"),
            })?;

        match serde_json::from_str::<Value>(&raw_body) {
            Ok(body) => Ok(HttpReply {
                status_code,
                request_id,
                body,
            }),
            Err(error) if (200..300).contains(&status_code) => {
                Err(ProviderError::Serialization {
                    provider: provider.clone(),
                    model: model.to_string(),
                    message: format!("response body is not JSON: {error}"),
                })
            }
            Err(_) => Err(ProviderError::Status {
                provider: provider.clone(),
                model: model.to_string(),
                status_code,
                request_id,
                message: summarize_body(&raw_body, status_code),
            }),
        }
    }
}

fn build_headers(
    provider: &ProviderId,
    model: &str,
    spec: &HttpRequestSpec,
) -> Result<HeaderMap, ProviderError> {
    let mut headers = HeaderMap::new();

    for (name, value) in &spec.headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|error| ProviderError::Transport {
                provider: provider.clone(),
                model: model.to_string(),
                message: format!("invalid header name {name}: {error}"),
            })?;
        // Header values may carry credentials and stay out of the message.
        let header_value = HeaderValue::from_str(value).map_err(|_| ProviderError::Transport {
            provider: provider.clone(),
            model: model.to_string(),
            message: format!("invalid header value for {name}"),
        })?;
        headers.insert(header_name, header_value);
    }

    Ok(headers)
}

fn summarize_body(raw_body: &str, status_code: u16) -> String {
    let trimmed = raw_body.trim();
    if trimmed.is_empty() {
        return format!("http status {status_code}");
    }

    let mut summary: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        summary.push_str("...");
    }
    summary
}
