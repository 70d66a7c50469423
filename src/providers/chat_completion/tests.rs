use serde_json::json;

use super::*;
use crate::core::types::ProviderId;

fn candidate() -> Candidate {
    Candidate::new(
        ProviderId::Openrouter,
        "meta-llama/llama-3.3-70b-instruct:free",
        "https://openrouter.ai/api/v1/chat/completions",
        Some("OPENROUTER_API_KEY"),
        RequestShape::ChatCompletion,
    )
}

fn messages() -> PromptMessages {
    PromptMessages {
        system: "You are a translator.".to_string(),
        user: "Translate:\n\n\"I am tired\"".to_string(),
    }
}

fn adapter(options: ChatCompletionOptions) -> ChatCompletionAdapter {
    ChatCompletionAdapter::with_options(
        Credentials::new().with_secret("OPENROUTER_API_KEY", "or-key"),
        options,
    )
    .expect("create adapter")
}

#[test]
fn test_build_request_encodes_chat_payload_and_headers() {
    let adapter = adapter(ChatCompletionOptions {
        http_referer: Some("https://genz-translator.xyz".to_string()),
        x_title: Some("  ".to_string()),
        max_tokens: Some(120),
    });

    let spec = adapter.build_request(&candidate(), &messages());

    assert_eq!(spec.method, reqwest::Method::POST);
    assert_eq!(spec.url, "https://openrouter.ai/api/v1/chat/completions");
    assert_eq!(
        spec.body,
        json!({
            "model": "meta-llama/llama-3.3-70b-instruct:free",
            "messages": [
                {"role": "system", "content": "You are a translator."},
                {"role": "user", "content": "Translate:\n\n\"I am tired\""}
            ],
            "max_tokens": 120
        })
    );
    assert_eq!(spec.header("authorization"), Some("Bearer or-key"));
    assert_eq!(spec.header("http-referer"), Some("https://genz-translator.xyz"));
    assert_eq!(spec.header("x-title"), None);
}

#[test]
fn test_build_request_omits_auth_without_credential() {
    let adapter = ChatCompletionAdapter::new(Credentials::new()).expect("create adapter");
    let spec = adapter.build_request(&candidate(), &messages());

    assert_eq!(spec.header("authorization"), None);
    assert!(spec.body.get("max_tokens").is_none());
}

#[test]
fn test_extract_text_reads_first_choice_content() {
    let adapter = adapter(ChatCompletionOptions::default());

    let body = json!({
        "id": "gen-1",
        "model": "meta-llama/llama-3.3-70b-instruct:free",
        "choices": [
            {"message": {"role": "assistant", "content": "  \"bro i'm beat\"  "}},
            {"message": {"role": "assistant", "content": "second choice"}}
        ]
    });
    assert_eq!(adapter.extract_text(&body), Some("bro i'm beat".to_string()));
}

#[test]
fn test_extract_text_joins_text_content_parts() {
    let adapter = adapter(ChatCompletionOptions::default());

    let body = json!({
        "choices": [{
            "message": {
                "content": [
                    {"type": "text", "text": "no cap, "},
                    {"type": "image_url", "image_url": {"url": "http://x"}},
                    {"type": "text", "text": "that slaps"}
                ]
            }
        }]
    });
    assert_eq!(
        adapter.extract_text(&body),
        Some("no cap, that slaps".to_string())
    );
}

#[test]
fn test_extract_text_returns_none_for_unusable_shapes() {
    let adapter = adapter(ChatCompletionOptions::default());

    let unusable = [
        json!({}),
        json!([]),
        json!("text"),
        json!({"choices": []}),
        json!({"choices": [{}]}),
        json!({"choices": [{"message": {"content": null}}]}),
        json!({"choices": [{"message": {"content": "   "}}]}),
        json!({"choices": [{"message": {"content": 42}}]}),
        json!({"choices": [{"message": {"content": [{"type": "image_url"}]}}]}),
        json!({"choices": [{"message": {"content": null, "refusal": "I can't help"}}]}),
        json!({"error": {"message": "Rate limit exceeded", "code": 429}}),
        json!({"choices": [{"error": {"code": 502}, "message": {"content": "partial"}}]}),
    ];

    for body in unusable {
        assert_eq!(adapter.extract_text(&body), None, "body: {body}");
    }
}

#[tokio::test]
async fn test_run_fails_fast_when_credential_missing() {
    let adapter = ChatCompletionAdapter::new(Credentials::new()).expect("create adapter");

    let mut unreachable = candidate();
    unreachable.endpoint = "http://127.0.0.1:9/never-called".to_string();

    let result = adapter.run(&unreachable, &messages()).await;
    assert_eq!(
        result,
        Err(ProviderError::CredentialMissing {
            provider: ProviderId::Openrouter,
            model: "meta-llama/llama-3.3-70b-instruct:free".to_string(),
            auth_key_ref: "OPENROUTER_API_KEY".to_string(),
        })
    );
}
