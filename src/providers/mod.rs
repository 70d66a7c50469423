pub mod chat_completion;
pub mod raw_prompt;

use crate::config::Credentials;
use crate::core::error::ProviderError;
use crate::core::types::Candidate;

const QUOTE_PAIRS: [(char, char); 3] = [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')];

/// Resolves the bearer secret for a candidate.
///
/// Candidates without an `auth_key_ref` need no credential; a reference with
/// no configured secret fails the attempt before any network call.
pub(crate) fn resolve_bearer<'a>(
    credentials: &'a Credentials,
    candidate: &Candidate,
) -> Result<Option<&'a str>, ProviderError> {
    let Some(auth_key_ref) = candidate.auth_key_ref.as_deref() else {
        return Ok(None);
    };

    credentials
        .resolve(auth_key_ref)
        .map(Some)
        .ok_or_else(|| ProviderError::CredentialMissing {
            provider: candidate.provider.clone(),
            model: candidate.model.clone(),
            auth_key_ref: auth_key_ref.to_string(),
        })
}

pub(crate) fn bearer_header(
    credentials: &Credentials,
    candidate: &Candidate,
) -> Option<(String, String)> {
    let auth_key_ref = candidate.auth_key_ref.as_deref()?;
    let secret = credentials.resolve(auth_key_ref)?;
    Some(("Authorization".to_string(), format!("Bearer {secret}")))
}

/// Trims whitespace and one pair of wrapping quotes. Blank output is `None`.
pub(crate) fn normalize_sentence(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
            && !inner.contains(open)
            && !inner.contains(close)
        {
            text = inner.trim();
            break;
        }
    }

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
