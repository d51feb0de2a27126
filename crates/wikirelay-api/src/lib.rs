//! # wikirelay-api
//!
//! HTTP surface for wikirelay: REST endpoints over the content gateway
//! plus the natural-language search pipeline.
//!
//! The router is built here (rather than in `main.rs`) so integration
//! tests can drive it with `tower::ServiceExt::oneshot` against mocked
//! upstreams.

pub mod handlers;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use wikirelay_core::Error;
use wikirelay_gateway::ContentClient;
use wikirelay_inference::{QuerySynthesizer, ResultRanker};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation when tracing a request through its outbound calls.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
///
/// Read-only after construction: the composition root builds it once from
/// environment configuration and the router clones it per request.
#[derive(Clone)]
pub struct AppState {
    /// Gateway to the content platform.
    pub content: Arc<ContentClient>,
    /// Natural-language → CQL synthesis.
    pub synthesizer: Arc<QuerySynthesizer>,
    /// AI re-ranking of search results.
    pub ranker: Arc<ResultRanker>,
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the full wikirelay router.
pub fn router(state: AppState) -> Router {
    use handlers::{labels, pages, search};

    Router::new()
        // Pages
        .route("/api/pages", get(pages::get_all_pages).post(pages::create_page))
        .route(
            "/api/pages/:page_id",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/api/pages/:page_id/children", get(pages::get_child_pages))
        .route("/api/pages/:page_id/attachments", get(pages::get_attachments))
        .route("/api/pages/:page_id/copy", post(pages::copy_page))
        .route("/api/pages/spaces/:space_key", get(pages::get_space_pages))
        // Search
        .route("/api/search", get(search::raw_search))
        .route("/api/search/intelligent", post(search::intelligent_search))
        // Labels
        .route(
            "/api/labels/:page_id",
            get(labels::get_labels).post(labels::add_labels),
        )
        // System
        .route("/health", get(health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// HTTP boundary error.
///
/// Validation failures become 400; upstream platform failures echo the
/// upstream status when it is a valid HTTP code. AI-pipeline failures
/// never reach this type — synthesis and ranking absorb them.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream { status: u16, message: String },
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Upstream {
                status,
                status_text,
                details,
            } => {
                // Prefer the upstream's own message when the body carries one.
                let message = details
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| format!("Upstream API error {status} {status_text}"));
                ApiError::Upstream { status, message }
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream { status, message } => {
                // Echo the upstream status only when it is itself an error
                // code; a failure wrapped around a 2xx (delete returning a
                // body instead of 204) must not look like success.
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, message)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
