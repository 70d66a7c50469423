use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::post;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::core::error::{RoutingError, TranslateError};
use crate::core::types::{Direction, TranslationRequest, TranslationResult};
use crate::prompt::PromptBuilder;
use crate::router::FallbackRouter;

pub const TRANSLATE_PATH: &str = "/api/translate";

const INVALID_INPUT_MESSAGE: &str = "Invalid input.";
const EXHAUSTED_MESSAGE: &str = "All models failed. Try again later.";
const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<FallbackRouter>,
    pub prompt: Arc<dyn PromptBuilder>,
}

impl AppState {
    pub fn new(router: FallbackRouter, prompt: impl PromptBuilder + 'static) -> Self {
        Self {
            router: Arc::new(router),
            prompt: Arc::new(prompt),
        }
    }
}

/// Inbound body. Every field is optional so that shape errors map to
/// `Invalid input.` instead of axum's extractor rejection.
#[derive(Debug, Deserialize)]
struct TranslatePayload {
    text: Option<String>,
    direction: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranslatedBody {
    result: String,
    model: String,
    provider: String,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    result: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            TRANSLATE_PATH,
            post(translate).fallback(method_not_allowed),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /api/translate
async fn translate(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(request) = parse_request(&body) else {
        debug!("rejecting malformed translate request");
        return failure_response(&TranslateError::InvalidInput);
    };

    let messages = state.prompt.build(&request.text, request.direction);
    debug!(
        direction = request.direction.as_str(),
        prompt_version = state.prompt.version(),
        selected = request.selected_candidate.as_deref().unwrap_or("auto"),
        "translate request accepted"
    );

    match state
        .router
        .route(&messages, request.selected_candidate.as_deref())
        .await
    {
        Ok(result) => success_response(result),
        Err(error) => failure_response(&error),
    }
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: METHOD_NOT_ALLOWED_MESSAGE,
        }),
    )
        .into_response()
}

fn parse_request(body: &[u8]) -> Option<TranslationRequest> {
    let payload: TranslatePayload = serde_json::from_slice(body).ok()?;
    let direction = Direction::parse(&payload.direction?)?;
    TranslationRequest::new(payload.text?, direction, payload.model)
}

fn success_response(result: TranslationResult) -> Response {
    (
        StatusCode::OK,
        Json(TranslatedBody {
            result: result.text,
            model: result.model,
            provider: result.provider.to_string(),
        }),
    )
        .into_response()
}

/// Per-candidate failure detail stays in the logs; callers only see a
/// generic message.
fn failure_response(error: &TranslateError) -> Response {
    let (status, message) = match error {
        TranslateError::InvalidInput => (StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE.to_string()),
        TranslateError::Routing(RoutingError::UnknownCandidate { candidate }) => {
            warn!(candidate = %candidate, "rejecting unknown model selection");
            (StatusCode::BAD_REQUEST, format!("Unknown model: {candidate}"))
        }
        TranslateError::Exhausted { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, EXHAUSTED_MESSAGE.to_string())
        }
    };

    (status, Json(MessageBody { result: message })).into_response()
}
