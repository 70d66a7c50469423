use super::*;
use crate::core::types::{ProviderId, RequestShape};

#[test]
fn test_provider_error_display_messages() {
    let missing = ProviderError::CredentialMissing {
        provider: ProviderId::Huggingface,
        model: "HuggingFaceH4/zephyr-7b-beta".to_string(),
        auth_key_ref: "HUGGINGFACE_API_KEY".to_string(),
    };
    assert_eq!(
        missing.to_string(),
        "provider credential missing [provider=huggingface, model=HuggingFaceH4/zephyr-7b-beta]: HUGGINGFACE_API_KEY is not configured"
    );

    let transport = ProviderError::Transport {
        provider: ProviderId::Openrouter,
        model: "google/gemma-2-9b-it:free".to_string(),
        message: "connection refused".to_string(),
    };
    assert_eq!(
        transport.to_string(),
        "provider transport error [provider=openrouter, model=google/gemma-2-9b-it:free]: connection refused"
    );

    let status = ProviderError::Status {
        provider: ProviderId::Openai,
        model: "gpt-4o-mini".to_string(),
        status_code: 502,
        request_id: Some("req_1".to_string()),
        message: "bad gateway".to_string(),
    };
    assert_eq!(
        status.to_string(),
        "provider status error [provider=openai, model=gpt-4o-mini, request_id=req_1, status_code=502]: bad gateway"
    );

    let custom = ProviderError::Serialization {
        provider: ProviderId::Other("groq".to_string()),
        model: "llama3-8b".to_string(),
        message: "body not json".to_string(),
    };
    assert_eq!(
        custom.to_string(),
        "provider serialization error [provider=groq, model=llama3-8b]: body not json"
    );
}

#[test]
fn test_config_and_routing_error_display_messages() {
    assert_eq!(
        ConfigError::MissingAdapter {
            candidate: "zephyr".to_string(),
            shape: RequestShape::RawPrompt,
        }
        .to_string(),
        "no adapter registered for raw_prompt (candidate zephyr)"
    );
    assert_eq!(
        ConfigError::InvalidTimeout { timeout_ms: 0 }.to_string(),
        "invalid timeout: 0 ms"
    );
    assert_eq!(
        RoutingError::UnknownCandidate {
            candidate: "gpt-9".to_string(),
        }
        .to_string(),
        "unknown model: gpt-9"
    );
}

#[test]
fn test_translate_error_wraps_routing_error() {
    let error: TranslateError = RoutingError::UnknownCandidate {
        candidate: "nope".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "unknown model: nope");

    assert_eq!(
        TranslateError::Exhausted { attempts: 4 }.to_string(),
        "all 4 candidate attempts failed"
    );
}
