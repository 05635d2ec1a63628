//! HTTP front end.
//!
//! Delivers `(requester_id, query)` pairs to the discovery pipeline and
//! hands the rendered text back to whichever messaging surface fronts the
//! service. The pipeline's contract holds here too: every reachable
//! failure is a text message, never a raw fault.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/search` | Run a discovery query, returns the rendered text |
//! | `GET`  | `/help` | Static welcome/usage text |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser-based
//! front ends can call the API directly.

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::models::RequesterId;
use crate::search::{search, SearchError};
use crate::transport::ArchiveTransport;

/// Welcome text served on `GET /help`.
pub const WELCOME_TEXT: &str = "🎬 Welcome to Media Scout! 🎬\n\n\
I can search for releases across all connected channels.\n\n\
Simply send the title you're looking for, and I'll find it for you!\n\n\
Example: Avengers Endgame";

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    transport: Arc<dyn ArchiveTransport>,
}

/// Starts the HTTP front end.
///
/// Binds to the address configured in `[server].bind` and serves until the
/// process is terminated.
pub async fn run_server(
    config: &Config,
    transport: Arc<dyn ArchiveTransport>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        transport,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/search", post(handle_search))
        .route("/help", get(handle_help))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    info!(%bind_addr, channels = config.sources.channels.len(), "listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

// ============ POST /search ============

/// JSON request body for `POST /search`.
#[derive(Deserialize)]
struct SearchBody {
    requester_id: i64,
    query: String,
}

/// JSON response carrying rendered, user-facing text.
#[derive(Serialize)]
struct TextResponse {
    text: String,
}

/// Handler for `POST /search`.
///
/// Runs the full discovery pipeline for the given requester. Gate denials
/// and empty result sets are successful responses carrying their rendered
/// message; only an unusable query is a client error.
async fn handle_search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<TextResponse>, AppError> {
    let outcome = search(
        state.transport.as_ref(),
        &state.config,
        RequesterId(body.requester_id),
        &body.query,
    )
    .await
    .map_err(|err| match err {
        SearchError::InvalidQuery => bad_request(err.to_string()),
    })?;

    Ok(Json(TextResponse {
        text: outcome.render(body.query.trim()),
    }))
}

// ============ GET /help ============

/// Handler for `GET /help`. Returns the static welcome text.
async fn handle_help() -> Json<TextResponse> {
    Json(TextResponse {
        text: WELCOME_TEXT.to_string(),
    })
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
