//! HTTP surface of togglenote.
//!
//! - `POST /add-to-toggle` — validate a note, acknowledge it, and process it in the background
//! - `GET /health` — liveness probe
//!
//! The note handler answers before any Notion call is made; the work it
//! triggers runs on its own tokio task and reports only through tracing.

pub mod request;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use togglenote_core::{ChatClassifier, run_job};
use togglenote_shared::{AppConfig, TogglenoteError};

use crate::request::parse_note_request;

/// Body of the acknowledgement sent for every accepted note.
pub const ACCEPTED_MESSAGE: &str = "Notes are being processed in the background";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Process-wide state. Holds no caller credentials.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub classifier: Arc<ChatClassifier>,
}

impl AppState {
    /// Build state from config, reading the classifier key from its env var.
    pub fn new(config: AppConfig) -> togglenote_shared::Result<Self> {
        let classifier = ChatClassifier::from_config(&config.classifier)?;
        Ok(Self::with_classifier(config, classifier))
    }

    pub fn with_classifier(config: AppConfig, classifier: ChatClassifier) -> Self {
        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/add-to-toggle", post(add_to_toggle))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn add_to_toggle(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), ApiError> {
    let note = parse_note_request(&headers, &body)?;

    info!(
        fragments = note.job.fragments.len(),
        "note accepted, processing in background"
    );

    // Detached: the response below never waits on this task.
    tokio::spawn(async move {
        run_job(
            &note.api_key,
            &state.config.notion,
            state.classifier.as_ref(),
            note.job,
        )
        .await;
    });

    Ok((StatusCode::OK, ACCEPTED_MESSAGE))
}

// ---------------------------------------------------------------------------
// Error Handling
// ---------------------------------------------------------------------------

/// Error returned synchronously by a handler.
#[derive(Debug)]
pub struct ApiError(TogglenoteError);

impl From<TogglenoteError> for ApiError {
    fn from(err: TogglenoteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            TogglenoteError::Validation { message } => {
                warn!(reason = %message, "rejected request");
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            other => {
                warn!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}
