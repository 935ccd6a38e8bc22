//! `GET /metrics`: Prometheus scrape endpoint.

use crate::state::AppState;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

/// Prometheus text exposition content type.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Render all recorded metrics.
#[allow(clippy::unused_async)]
pub async fn scrape(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}
