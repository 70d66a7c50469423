use std::collections::BTreeMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let values: BTreeMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key: &str| values.get(key).cloned()
}

#[test]
fn test_app_config_defaults() {
    let config = AppConfig::from_lookup(lookup_from(&[])).expect("default config");

    assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(config.attempt_timeout_ms, DEFAULT_ATTEMPT_TIMEOUT_MS);
    assert_eq!(config.candidates, catalog::builtin_candidates());
    assert_eq!(config.credentials.configured_keys().count(), 0);
    assert_eq!(config.http_referer, None);
    assert_eq!(config.app_title, None);
    assert_eq!(
        config.missing_credentials(),
        vec![
            HUGGINGFACE_API_KEY_ENV.to_string(),
            OPENAI_API_KEY_ENV.to_string(),
            OPENROUTER_API_KEY_ENV.to_string(),
        ]
    );
}

#[test]
fn test_app_config_reads_overrides_and_credentials() {
    let config = AppConfig::from_lookup(lookup_from(&[
        ("HOST", "127.0.0.1"),
        ("PORT", "8080"),
        ("TRANSLATOR_ATTEMPT_TIMEOUT_MS", "15000"),
        ("OPENROUTER_API_KEY", "  or-key  "),
        ("OPENAI_API_KEY", "   "),
        ("TRANSLATOR_HTTP_REFERER", "https://genz-translator.xyz"),
        ("TRANSLATOR_APP_TITLE", "GenZ Translator"),
    ]))
    .expect("config with overrides");

    assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(config.attempt_timeout_ms, 15_000);
    assert_eq!(config.credentials.resolve(OPENROUTER_API_KEY_ENV), Some("or-key"));
    assert_eq!(config.credentials.resolve(OPENAI_API_KEY_ENV), None);
    assert_eq!(
        config.http_referer.as_deref(),
        Some("https://genz-translator.xyz")
    );
    assert_eq!(config.app_title.as_deref(), Some("GenZ Translator"));
    assert_eq!(
        config.missing_credentials(),
        vec![
            HUGGINGFACE_API_KEY_ENV.to_string(),
            OPENAI_API_KEY_ENV.to_string(),
        ]
    );
}

#[test]
fn test_app_config_rejects_invalid_values() {
    assert!(matches!(
        AppConfig::from_lookup(lookup_from(&[("HOST", "not-an-ip")])),
        Err(ConfigError::InvalidBindAddress { .. })
    ));
    assert!(matches!(
        AppConfig::from_lookup(lookup_from(&[("PORT", "99999")])),
        Err(ConfigError::InvalidBindAddress { .. })
    ));
    assert_eq!(
        AppConfig::from_lookup(lookup_from(&[("TRANSLATOR_ATTEMPT_TIMEOUT_MS", "0")]))
            .map(|_| ()),
        Err(ConfigError::InvalidTimeout { timeout_ms: 0 })
    );
    assert!(matches!(
        AppConfig::from_lookup(lookup_from(&[(
            "TRANSLATOR_CANDIDATES_FILE",
            "/nonexistent/genz/candidates.json"
        )])),
        Err(ConfigError::CandidateFile { .. })
    ));
}

#[test]
fn test_app_config_loads_candidate_file() {
    let path = std::env::temp_dir().join(format!(
        "genz-config-candidates-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"[{"id":"fast","provider":"openrouter","model":"mistralai/mistral-7b-instruct:free","endpoint":"https://openrouter.ai/api/v1/chat/completions","auth_key_ref":"OPENROUTER_API_KEY","request_shape":"chat_completion"}]"#,
    )
    .expect("write candidate file");

    let path_text = path.display().to_string();
    let config = AppConfig::from_lookup(lookup_from(&[
        ("TRANSLATOR_CANDIDATES_FILE", path_text.as_str()),
        ("OPENROUTER_API_KEY", "or-key"),
    ]))
    .expect("config with candidate file");
    std::fs::remove_file(&path).expect("remove candidate file");

    assert_eq!(config.candidates.ids().collect::<Vec<_>>(), vec!["fast"]);
    assert!(config.missing_credentials().is_empty());
}

#[test]
fn test_app_config_reads_credentials_named_by_candidate_file() {
    let path = std::env::temp_dir().join(format!(
        "genz-config-custom-key-{}.json",
        std::process::id()
    ));
    std::fs::write(
        &path,
        r#"[{"provider":"together","model":"mistralai/Mixtral-8x7B-Instruct-v0.1","endpoint":"https://api.together.xyz/v1/chat/completions","auth_key_ref":"TOGETHER_API_KEY","request_shape":"chat_completion"}]"#,
    )
    .expect("write candidate file");

    let path_text = path.display().to_string();
    let config = AppConfig::from_lookup(lookup_from(&[
        ("TRANSLATOR_CANDIDATES_FILE", path_text.as_str()),
        ("TOGETHER_API_KEY", "together-secret"),
    ]))
    .expect("config with custom credential");
    std::fs::remove_file(&path).expect("remove candidate file");

    assert_eq!(
        config.credentials.resolve("TOGETHER_API_KEY"),
        Some("together-secret")
    );
    assert!(config.missing_credentials().is_empty());
    assert_eq!(
        config.candidates.iter().next().map(|candidate| candidate.provider.clone()),
        Some(crate::core::types::ProviderId::Other("together".to_string()))
    );
}

#[test]
fn test_transport_timeout_outlasts_attempt_timeout() {
    let default = AppConfig::from_lookup(lookup_from(&[])).expect("default config");
    assert!(default.transport_timeout_ms() > default.attempt_timeout_ms);

    let long = AppConfig::from_lookup(lookup_from(&[("TRANSLATOR_ATTEMPT_TIMEOUT_MS", "45000")]))
        .expect("config with long timeout");
    assert_eq!(long.attempt_timeout_ms, 45_000);
    assert!(long.transport_timeout_ms() > 45_000);
}

#[test]
fn test_credentials_debug_hides_secrets() {
    let credentials = Credentials::new()
        .with_secret("OPENAI_API_KEY", "sk-very-secret")
        .with_secret("EMPTY", "");

    let rendered = format!("{credentials:?}");
    assert!(rendered.contains("OPENAI_API_KEY"));
    assert!(!rendered.contains("sk-very-secret"));
    assert!(!credentials.contains("EMPTY"));
}
