//! Route table.

use crate::handlers::{inbound, metrics, outbound};
use crate::middleware::request_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Largest inbound body accepted by [`build_router`] (200 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 200 * 1024 * 1024;

/// Build the gateway router with the default body limit.
///
/// Routes:
/// - `POST /inbound`
/// - `GET /outbound`
/// - `GET /metrics`
///
/// Other methods on these paths get 405, other paths 404. Every request is
/// traced and tagged with an `x-request-id`.
pub fn build_router(state: AppState) -> Router {
    build_router_with_body_limit(state, DEFAULT_MAX_BODY_BYTES)
}

/// Build the gateway router, accepting request bodies up to `max_body_bytes`.
///
/// Bodies over the limit are refused with 413 before the gateway sees them.
pub fn build_router_with_body_limit(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/inbound", post(inbound::ingest))
        .route("/outbound", get(outbound::report))
        .route("/metrics", get(metrics::scrape))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
