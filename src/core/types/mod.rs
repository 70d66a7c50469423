use std::fmt;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::core::error::ProviderError;

/// Translation direction accepted by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "to_genz")]
    ToInformal,
    #[serde(rename = "to_normal")]
    ToFormal,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToInformal => "to_genz",
            Self::ToFormal => "to_normal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "to_genz" => Some(Self::ToInformal),
            "to_normal" => Some(Self::ToFormal),
            _ => None,
        }
    }
}

/// Validated inbound request. Constructed only through [`TranslationRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub direction: Direction,
    pub selected_candidate: Option<String>,
}

impl TranslationRequest {
    /// Returns `None` when `text` is blank. `"auto"` and blank selections mean
    /// no explicit candidate.
    pub fn new(
        text: impl Into<String>,
        direction: Direction,
        selected_candidate: Option<String>,
    ) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }

        let selected_candidate = selected_candidate.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(AUTO_SELECTION) {
                None
            } else {
                Some(trimmed.to_string())
            }
        });

        Some(Self {
            text,
            direction,
            selected_candidate,
        })
    }
}

pub const AUTO_SELECTION: &str = "auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

/// System + user pair produced by a prompt builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub system: String,
    pub user: String,
}

impl PromptMessages {
    pub fn to_chat_messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: MessageRole::System,
                content: self.system.clone(),
            },
            ChatMessage {
                role: MessageRole::User,
                content: self.user.clone(),
            },
        ]
    }

    /// Single-string rendering for providers without a message array.
    pub fn to_raw_prompt(&self) -> String {
        format!("{}\n\n{}\n", self.system, self.user)
    }
}

/// Serialized as its plain name; names outside the known set map to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderId {
    Openrouter,
    Openai,
    Huggingface,
    Other(String),
}

impl ProviderId {
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "openrouter" => Self::Openrouter,
            "openai" => Self::Openai,
            "huggingface" => Self::Huggingface,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Openrouter => "openrouter",
            Self::Openai => "openai",
            Self::Huggingface => "huggingface",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<String> for ProviderId {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ProviderId> for String {
    fn from(provider: ProviderId) -> Self {
        match provider {
            ProviderId::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire family a candidate speaks; selects the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestShape {
    ChatCompletion,
    RawPrompt,
}

impl fmt::Display for RequestShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChatCompletion => f.write_str("chat_completion"),
            Self::RawPrompt => f.write_str("raw_prompt"),
        }
    }
}

pub const MODEL_PLACEHOLDER: &str = "{model}";

/// One (provider, model) pair eligible for an attempt. Read-only after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Candidate {
    /// Selection key; defaults to `model` when omitted in configuration.
    #[serde(default)]
    pub id: String,
    pub provider: ProviderId,
    pub model: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_key_ref: Option<String>,
    pub request_shape: RequestShape,
}

impl Candidate {
    pub fn new(
        provider: ProviderId,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        auth_key_ref: Option<&str>,
        request_shape: RequestShape,
    ) -> Self {
        let model = model.into();
        Self {
            id: model.clone(),
            provider,
            model,
            endpoint: endpoint.into(),
            auth_key_ref: auth_key_ref.map(str::to_string),
            request_shape,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn endpoint_url(&self) -> String {
        self.endpoint.replace(MODEL_PLACEHOLDER, &self.model)
    }
}

/// Result of one bounded attempt against one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success {
        text: String,
        candidate: Arc<Candidate>,
    },
    NoContent {
        candidate: Arc<Candidate>,
    },
    TransportError {
        candidate: Arc<Candidate>,
        cause: ProviderError,
    },
    Timeout {
        candidate: Arc<Candidate>,
    },
}

impl AttemptOutcome {
    pub fn candidate(&self) -> &Arc<Candidate> {
        match self {
            Self::Success { candidate, .. }
            | Self::NoContent { candidate }
            | Self::TransportError { candidate, .. }
            | Self::Timeout { candidate } => candidate,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NoContent { .. } => "no_content",
            Self::TransportError { .. } => "transport_error",
            Self::Timeout { .. } => "timeout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
    pub provider: ProviderId,
    pub model: String,
}

/// Concrete outbound request built by an adapter.
#[derive(Clone, PartialEq)]
pub struct HttpRequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl HttpRequestSpec {
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequestSpec")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}
