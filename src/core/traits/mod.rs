use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::types::{Candidate, HttpRequestSpec, PromptMessages, RequestShape};

/// Backend-family adapter contract.
///
/// One implementation exists per [`RequestShape`]. Adapters hold their
/// credentials and transport; the router only sees `run`.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Wire family served by this adapter.
    fn shape(&self) -> RequestShape;

    /// Builds the concrete outbound request for a candidate.
    fn build_request(&self, candidate: &Candidate, messages: &PromptMessages) -> HttpRequestSpec;

    /// Pulls a usable sentence out of a provider response body.
    ///
    /// Unexpected shapes, empty payloads, and error envelopes all yield `None`.
    fn extract_text(&self, body: &Value) -> Option<String>;

    /// Executes one attempt. `Ok(None)` means the provider answered without
    /// usable content.
    async fn run(
        &self,
        candidate: &Candidate,
        messages: &PromptMessages,
    ) -> Result<Option<String>, ProviderError>;
}
