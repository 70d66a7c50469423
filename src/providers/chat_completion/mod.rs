use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::config::Credentials;
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{Candidate, HttpRequestSpec, PromptMessages, RequestShape};
use crate::providers::{bearer_header, normalize_sentence, resolve_bearer};
use crate::transport::http::HttpTransport;

const DEFAULT_TRANSPORT_TIMEOUT_MS: u64 = 30_000;

const HEADER_HTTP_REFERER: &str = "HTTP-Referer";
const HEADER_X_TITLE: &str = "X-Title";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatCompletionOptions {
    pub http_referer: Option<String>,
    pub x_title: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Adapter for `{model, messages}` -> `choices[0].message.content` APIs
/// (OpenRouter, OpenAI, and compatible gateways).
pub struct ChatCompletionAdapter {
    transport: HttpTransport,
    credentials: Credentials,
    options: ChatCompletionOptions,
}

impl ChatCompletionAdapter {
    pub fn new(credentials: Credentials) -> Result<Self, ConfigError> {
        Self::with_options(credentials, ChatCompletionOptions::default())
    }

    pub fn with_options(
        credentials: Credentials,
        options: ChatCompletionOptions,
    ) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(DEFAULT_TRANSPORT_TIMEOUT_MS)?;
        Ok(Self::with_transport(credentials, options, transport))
    }

    pub fn with_transport(
        credentials: Credentials,
        options: ChatCompletionOptions,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            credentials,
            options: sanitize_options(options),
        }
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionAdapter {
    fn shape(&self) -> RequestShape {
        RequestShape::ChatCompletion
    }

    fn build_request(&self, candidate: &Candidate, messages: &PromptMessages) -> HttpRequestSpec {
        let mut body = json!({
            "model": candidate.model,
            "messages": messages.to_chat_messages(),
        });
        if let Some(max_tokens) = self.options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        let mut spec = HttpRequestSpec::post(candidate.endpoint_url(), body);
        spec.headers
            .extend(bearer_header(&self.credentials, candidate));
        if let Some(http_referer) = &self.options.http_referer {
            spec.headers
                .push((HEADER_HTTP_REFERER.to_string(), http_referer.clone()));
        }
        if let Some(x_title) = &self.options.x_title {
            spec.headers
                .push((HEADER_X_TITLE.to_string(), x_title.clone()));
        }
        spec
    }

    fn extract_text(&self, body: &Value) -> Option<String> {
        let root = body.as_object()?;
        if root.get("error").is_some_and(|error| !error.is_null()) {
            return None;
        }

        let choice = root.get("choices")?.as_array()?.first()?.as_object()?;
        if choice.get("error").is_some_and(|error| !error.is_null()) {
            return None;
        }

        let message = choice.get("message")?.as_object()?;
        normalize_sentence(&message_text(message)?)
    }

    async fn run(
        &self,
        candidate: &Candidate,
        messages: &PromptMessages,
    ) -> Result<Option<String>, ProviderError> {
        resolve_bearer(&self.credentials, candidate)?;

        let spec = self.build_request(candidate, messages);
        let reply = self
            .transport
            .execute(&candidate.provider, &candidate.model, &spec)
            .await?;

        if !reply.is_success() {
            debug!(
                provider = %candidate.provider,
                model = %candidate.model,
                status_code = reply.status_code,
                "chat completion returned error status"
            );
        }

        Ok(self.extract_text(&reply.body))
    }
}

fn message_text(message: &Map<String, Value>) -> Option<String> {
    match message.get("content")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => {
            let joined = parts
                .iter()
                .filter_map(|part| {
                    let part = part.as_object()?;
                    if part.get("type").and_then(Value::as_str) != Some("text") {
                        return None;
                    }
                    part.get("text").and_then(Value::as_str)
                })
                .collect::<Vec<_>>()
                .join("");
            Some(joined)
        }
        _ => None,
    }
}

fn sanitize_options(options: ChatCompletionOptions) -> ChatCompletionOptions {
    let non_blank = |value: Option<String>| {
        value.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    };

    ChatCompletionOptions {
        http_referer: non_blank(options.http_referer),
        x_title: non_blank(options.x_title),
        max_tokens: options.max_tokens.filter(|max_tokens| *max_tokens > 0),
    }
}

#[cfg(test)]
mod tests;
