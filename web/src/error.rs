//! Error types for web handlers.
//!
//! This module bridges gateway errors and HTTP responses. Error bodies are
//! short plain-text messages; the underlying cause is logged, never sent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use edi_gateway_core::gateway::GatewayError;
use std::fmt;

/// Body sent when an inbound request does not decode.
pub const INVALID_JSON: &str = "Invalid JSON";
/// Body sent when an inbound transaction could not be written.
pub const SAVE_FAILED: &str = "Failed to save transaction";
/// Body sent when a stored transaction could not be published.
pub const PUBLISH_FAILED: &str = "Failed to publish transaction";
/// Body sent when the outbound report could not be read.
pub const FETCH_FAILED: &str = "Failed to fetch transactions";

/// Application error type for web handlers.
///
/// Implements Axum's `IntoResponse`, so handlers can return
/// `Result<_, AppError>` and use `?`.
///
/// # Examples
///
/// ```ignore
/// async fn handler(State(state): State<AppState>) -> Result<String, AppError> {
///     let lines = state.gateway.report().await.map_err(AppError::report_failed)?;
///     Ok(lines.join("\n"))
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for logs)
    code: String,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: String) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Create a new error with a source error.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            message.into(),
            "BAD_REQUEST".to_string(),
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR".to_string(),
        )
    }

    /// Map a failed ingest to its HTTP outcome.
    #[must_use]
    pub fn ingest_failed(err: GatewayError) -> Self {
        let base = match &err {
            GatewayError::MalformedInput(_) => Self::bad_request(INVALID_JSON),
            GatewayError::Storage(_) => Self::internal(SAVE_FAILED),
            GatewayError::Publish { .. } => Self::internal(PUBLISH_FAILED),
        };
        base.with_source(err.into())
    }

    /// Map a failed report to its HTTP outcome.
    #[must_use]
    pub fn report_failed(err: GatewayError) -> Self {
        Self::internal(FETCH_FAILED).with_source(err.into())
    }

    /// HTTP status this error renders as.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    message = %self.message,
                    "Internal server error"
                );
            }
        } else if let Some(source) = &self.source {
            tracing::debug!(status = %self.status, error = %source, "Rejected request");
        }

        (self.status, self.message).into_response()
    }
}
