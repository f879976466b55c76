//! Axum request handlers for all viewer endpoints.

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{ErrorResponse, HealthResponse},
    resolve, LinkParams,
};
use tracing::{info, warn};

use super::state::AppState;

/// `GET /message?id=…&k=…` — resolve a share link to something to display.
///
/// Always `200 OK`: every failure along the way degrades to a generic or
/// greeting display. The body may carry a decrypted message, so it is marked
/// uncacheable.
pub async fn message(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let params = LinkParams::from_query(query.as_deref().unwrap_or_default());
    let mut resolution = resolve(&params, state.source.as_ref()).await;
    if state.collapse_fallbacks {
        resolution = resolution.collapsed();
    }
    info!(kind = ?resolution.kind(), "link resolved");

    let body = resolution.to_display(&state.generic_message);
    (
        StatusCode::OK,
        [(header::CACHE_CONTROL, "no-store")],
        Json(body),
    )
        .into_response()
}

/// `GET /messages-encrypted.json` — the record store as the source returns it.
///
/// Returns `503 Service Unavailable` if the store cannot be fetched.
pub async fn record_store(State(state): State<AppState>) -> Response {
    match state.source.fetch().await {
        Ok(store) => (StatusCode::OK, Json(store)).into_response(),
        Err(e) => {
            warn!(error = %e, "record store unavailable");
            let err = ErrorResponse::new("service_unavailable", "record store unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, Json(err)).into_response()
        }
    }
}

/// `GET /health` — liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        source: state.source.describe(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}
