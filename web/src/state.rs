//! Application state for Axum handlers.

use crate::metrics::GatewayMetrics;
use edi_gateway_core::gateway::Gateway;

/// Application state shared across all HTTP handlers.
///
/// Both fields are cheap to clone; clones share the underlying
/// collaborators and counters.
#[derive(Clone)]
pub struct AppState {
    /// Ingest and report service.
    pub gateway: Gateway,
    /// Request counters and the Prometheus renderer.
    pub metrics: GatewayMetrics,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(gateway: Gateway, metrics: GatewayMetrics) -> Self {
        Self { gateway, metrics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Axum requires Clone state
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
