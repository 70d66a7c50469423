use std::sync::Arc;

use anyhow::Context;
use genz_translator::FallbackRouter;
use genz_translator::config::AppConfig;
use genz_translator::prompt::SlangPromptBuilder;
use genz_translator::providers::chat_completion::{ChatCompletionAdapter, ChatCompletionOptions};
use genz_translator::providers::raw_prompt::RawPromptAdapter;
use genz_translator::server::{self, AppState, TRANSLATE_PATH};
use genz_translator::transport::http::HttpTransport;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genz_translator=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    for key in config.missing_credentials() {
        warn!(credential = %key, "credential not configured; candidates using it will be skipped");
    }

    let transport = HttpTransport::new(config.transport_timeout_ms())
        .context("failed to build http transport")?;
    let chat = ChatCompletionAdapter::with_transport(
        config.credentials.clone(),
        ChatCompletionOptions {
            http_referer: config.http_referer.clone(),
            x_title: config.app_title.clone(),
            max_tokens: None,
        },
        transport.clone(),
    );
    let raw = RawPromptAdapter::with_transport(config.credentials.clone(), transport);

    let router = FallbackRouter::builder()
        .with_adapter(Arc::new(chat))
        .with_adapter(Arc::new(raw))
        .with_candidates(config.candidates.clone())
        .with_attempt_timeout_ms(config.attempt_timeout_ms)
        .build()
        .context("invalid router configuration")?;

    info!(
        candidates = %router.candidates().ids().collect::<Vec<_>>().join(", "),
        attempt_timeout_ms = router.attempt_timeout().as_millis() as u64,
        "fallback router ready"
    );

    let app = server::app(AppState::new(router, SlangPromptBuilder));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!("translator listening on http://{}{}", config.bind_addr, TRANSLATE_PATH);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
