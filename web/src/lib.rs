//! HTTP surface of the EDI gateway.
//!
//! Thin Axum shell over [`Gateway`](edi_gateway_core::gateway::Gateway):
//! handlers decode the request, call the gateway, and map the result to a
//! plain-text response.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives, gets a request id and a tracing span
//! 2. **Count** it on the route's request counter
//! 3. **Call** the gateway (`ingest_json` or `report`)
//! 4. **Map** the result or [`AppError`] to a response
//!
//! # Example
//!
//! ```no_run
//! use edi_gateway_web::{AppState, build_router, metrics::GatewayMetrics};
//! # use edi_gateway_core::gateway::Gateway;
//!
//! # async fn example(gateway: Gateway) -> Result<(), Box<dyn std::error::Error>> {
//! let app = build_router(AppState::new(gateway, GatewayMetrics::install()?));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8086").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use metrics::GatewayMetrics;
pub use middleware::{REQUEST_ID_HEADER, RequestId, request_id_layer};
pub use router::{DEFAULT_MAX_BODY_BYTES, build_router, build_router_with_body_limit};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
