use crate::core::types::{ProviderId, RequestShape};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("candidate list must not be empty")]
    EmptyCandidateList,
    #[error("duplicate candidate id: {candidate}")]
    DuplicateCandidate { candidate: String },
    #[error("invalid candidate {candidate}: {reason}")]
    InvalidCandidate { candidate: String, reason: String },
    #[error("no adapter registered for {shape} (candidate {candidate})")]
    MissingAdapter {
        candidate: String,
        shape: RequestShape,
    },
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid bind address {value}: {reason}")]
    InvalidBindAddress { value: String, reason: String },
    #[error("invalid candidate file {path}: {reason}")]
    CandidateFile { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("unknown model: {candidate}")]
    UnknownCandidate { candidate: String },
}

/// Failure of a single attempt. Always recovered by the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error(
        "provider credential missing{context}: {auth_key_ref} is not configured",
        context = format_context(Some(.provider), Some(.model.as_str()), None, None)
    )]
    CredentialMissing {
        provider: ProviderId,
        model: String,
        auth_key_ref: String,
    },
    #[error(
        "provider transport error{context}: {message}",
        context = format_context(Some(.provider), Some(.model.as_str()), None, None)
    )]
    Transport {
        provider: ProviderId,
        model: String,
        message: String,
    },
    #[error(
        "provider status error{context}: {message}",
        context = format_context(
            Some(.provider),
            Some(.model.as_str()),
            .request_id.as_deref(),
            Some(*.status_code)
        )
    )]
    Status {
        provider: ProviderId,
        model: String,
        status_code: u16,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider serialization error{context}: {message}",
        context = format_context(Some(.provider), Some(.model.as_str()), None, None)
    )]
    Serialization {
        provider: ProviderId,
        model: String,
        message: String,
    },
}

/// Request-level failure surfaced by the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("invalid input")]
    InvalidInput,
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error("all {attempts} candidate attempts failed")]
    Exhausted { attempts: usize },
}

fn format_context(
    provider: Option<&ProviderId>,
    model: Option<&str>,
    request_id: Option<&str>,
    status_code: Option<u16>,
) -> String {
    let mut context = Vec::new();

    if let Some(provider) = provider {
        context.push(format!("provider={provider}"));
    }
    if let Some(model) = model {
        context.push(format!("model={model}"));
    }
    if let Some(request_id) = request_id {
        context.push(format!("request_id={request_id}"));
    }
    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    if context.is_empty() {
        String::new()
    } else {
        format!(" [{}]", context.join(", "))
    }
}

#[cfg(test)]
mod tests;
