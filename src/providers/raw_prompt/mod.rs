use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::Credentials;
use crate::core::error::{ConfigError, ProviderError};
use crate::core::traits::ProviderAdapter;
use crate::core::types::{Candidate, HttpRequestSpec, PromptMessages, RequestShape};
use crate::providers::{bearer_header, normalize_sentence, resolve_bearer};
use crate::transport::http::HttpTransport;

const DEFAULT_TRANSPORT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_MAX_NEW_TOKENS: u32 = 60;
/// Closes every raw prompt; text after its last occurrence is the continuation.
const RESPONSE_CUE: &str = "Translation:";

/// Adapter for `{inputs, options}` -> `[{generated_text}]` inference APIs.
pub struct RawPromptAdapter {
    transport: HttpTransport,
    credentials: Credentials,
    max_new_tokens: u32,
}

impl RawPromptAdapter {
    pub fn new(credentials: Credentials) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(DEFAULT_TRANSPORT_TIMEOUT_MS)?;
        Ok(Self::with_transport(credentials, transport))
    }

    pub fn with_transport(credentials: Credentials, transport: HttpTransport) -> Self {
        Self {
            transport,
            credentials,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens.max(1);
        self
    }
}

#[async_trait]
impl ProviderAdapter for RawPromptAdapter {
    fn shape(&self) -> RequestShape {
        RequestShape::RawPrompt
    }

    fn build_request(&self, candidate: &Candidate, messages: &PromptMessages) -> HttpRequestSpec {
        let body = json!({
            "inputs": format!("{}{RESPONSE_CUE}", messages.to_raw_prompt()),
            "parameters": {
                "max_new_tokens": self.max_new_tokens,
                "return_full_text": false,
            },
            "options": {
                "wait_for_model": true,
                "use_cache": false,
            },
        });

        let mut spec = HttpRequestSpec::post(candidate.endpoint_url(), body);
        spec.headers
            .extend(bearer_header(&self.credentials, candidate));
        spec
    }

    /// Accepts both continuation-only and echoed generations.
    fn extract_text(&self, body: &Value) -> Option<String> {
        let generated = generated_text(body)?;
        let continuation = generated
            .rsplit_once(RESPONSE_CUE)
            .map_or(generated.as_str(), |(_, after)| after);
        first_line(continuation)
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
                "raw prompt inference returned error status"
            );
        }

        Ok(self.extract_text(&reply.body))
    }
}

fn generated_text(body: &Value) -> Option<String> {
    let generation = match body {
        Value::Array(items) => items.first()?,
        Value::Object(root) if root.get("error").is_some_and(|error| !error.is_null()) => {
            return None;
        }
        Value::Object(_) => body,
        _ => return None,
    };

    generation
        .get("generated_text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Raw generations tend to run on; keep the first non-blank line.
fn first_line(text: &str) -> Option<String> {
    text.lines().find_map(normalize_sentence)
}
