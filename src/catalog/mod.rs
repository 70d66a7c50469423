use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::{HUGGINGFACE_API_KEY_ENV, OPENAI_API_KEY_ENV, OPENROUTER_API_KEY_ENV};
use crate::core::error::ConfigError;
use crate::core::types::{Candidate, ProviderId, RequestShape};

pub const OPENROUTER_CHAT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const HUGGINGFACE_INFERENCE_URL: &str = "https://api-inference.huggingface.co/models/{model}";

/// Ordered candidate set. Declaration order is the attempt order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateList {
    entries: IndexMap<String, Arc<Candidate>>,
}

impl CandidateList {
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, ConfigError> {
        if candidates.is_empty() {
            return Err(ConfigError::EmptyCandidateList);
        }

        let mut entries = IndexMap::with_capacity(candidates.len());
        for mut candidate in candidates {
            if candidate.id.trim().is_empty() {
                candidate.id = candidate.model.clone();
            }
            validate_candidate(&candidate)?;

            if entries.contains_key(&candidate.id) {
                return Err(ConfigError::DuplicateCandidate {
                    candidate: candidate.id,
                });
            }
            entries.insert(candidate.id.clone(), Arc::new(candidate));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Candidate>> {
        self.entries.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn resolve(&self, id: &str) -> Option<&Arc<Candidate>> {
        self.entries.get(id.trim())
    }
}

pub fn builtin_candidates() -> CandidateList {
    let candidates = [
        Candidate::new(
            ProviderId::Openrouter,
            "mistralai/mistral-7b-instruct:free",
            OPENROUTER_CHAT_COMPLETIONS_URL,
            Some(OPENROUTER_API_KEY_ENV),
            RequestShape::ChatCompletion,
        ),
        Candidate::new(
            ProviderId::Openrouter,
            "meta-llama/llama-3.3-70b-instruct:free",
            OPENROUTER_CHAT_COMPLETIONS_URL,
            Some(OPENROUTER_API_KEY_ENV),
            RequestShape::ChatCompletion,
        ),
        Candidate::new(
            ProviderId::Openrouter,
            "google/gemma-2-9b-it:free",
            OPENROUTER_CHAT_COMPLETIONS_URL,
            Some(OPENROUTER_API_KEY_ENV),
            RequestShape::ChatCompletion,
        ),
        Candidate::new(
            ProviderId::Openai,
            "gpt-4o-mini",
            OPENAI_CHAT_COMPLETIONS_URL,
            Some(OPENAI_API_KEY_ENV),
            RequestShape::ChatCompletion,
        ),
        Candidate::new(
            ProviderId::Huggingface,
            "HuggingFaceH4/zephyr-7b-beta",
            HUGGINGFACE_INFERENCE_URL,
            Some(HUGGINGFACE_API_KEY_ENV),
            RequestShape::RawPrompt,
        ),
    ];

    CandidateList {
        entries: candidates
            .into_iter()
            .map(|candidate| (candidate.id.clone(), Arc::new(candidate)))
            .collect(),
    }
}

/// Parses a JSON array of candidates.
pub fn parse_candidates_json(raw: &str) -> Result<CandidateList, ConfigError> {
    let candidates: Vec<Candidate> =
        serde_json::from_str(raw).map_err(|error| ConfigError::CandidateFile {
            path: "<inline>".to_string(),
            reason: error.to_string(),
        })?;
    CandidateList::new(candidates)
}

pub fn load_candidates_file(path: &Path) -> Result<CandidateList, ConfigError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|error| ConfigError::CandidateFile {
        path: display.clone(),
        reason: error.to_string(),
    })?;

    parse_candidates_json(&raw).map_err(|error| match error {
        ConfigError::CandidateFile { reason, .. } => ConfigError::CandidateFile {
            path: display,
            reason,
        },
        other => other,
    })
}

fn validate_candidate(candidate: &Candidate) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidCandidate {
        candidate: candidate.id.clone(),
        reason: reason.to_string(),
    };

    if candidate.id.trim().is_empty() || candidate.model.trim().is_empty() {
        return Err(invalid("model must be non-empty"));
    }

    let endpoint = candidate.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(invalid("endpoint must be an http(s) URL"));
    }

    if let Some(auth_key_ref) = &candidate.auth_key_ref
        && auth_key_ref.trim().is_empty()
    {
        return Err(invalid("auth_key_ref must be non-empty when provided"));
    }

    Ok(())
}
