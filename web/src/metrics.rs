//! Prometheus request counters.
//!
//! [`GatewayMetrics`] owns a Prometheus recorder and the two request
//! counters served on `/metrics`:
//!
//! - `inbound_requests_total`: every `POST /inbound`, successful or not
//! - `outbound_requests_total`: every `GET /outbound`, successful or not
//!
//! # Example
//!
//! ```
//! use edi_gateway_web::metrics::GatewayMetrics;
//!
//! let metrics = GatewayMetrics::detached();
//! metrics.record_inbound();
//! assert!(metrics.render().contains("inbound_requests_total 1"));
//! ```

use metrics::{Counter, counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use thiserror::Error;

/// Name of the inbound request counter.
pub const INBOUND_REQUESTS: &str = "inbound_requests_total";
/// Name of the outbound request counter.
pub const OUTBOUND_REQUESTS: &str = "outbound_requests_total";

/// Errors that can occur during metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Another global recorder is already installed.
    #[error("Failed to install metrics recorder: a global recorder is already set")]
    AlreadyInstalled,
}

/// Request counters and their Prometheus renderer.
///
/// Counter handles are resolved once at construction, so recording is a
/// single atomic add.
#[derive(Clone)]
pub struct GatewayMetrics {
    handle: PrometheusHandle,
    inbound: Counter,
    outbound: Counter,
}

impl GatewayMetrics {
    /// Build counters on a private recorder.
    ///
    /// Only the two request counters are visible through [`render`](Self::render).
    /// Used in tests so each router gets independent counts.
    #[must_use]
    pub fn detached() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        Self::register(&recorder)
    }

    /// Build counters and install the recorder process-wide.
    ///
    /// Metrics emitted by other crates through the `metrics` macros (store
    /// and publish outcomes) then show up on `/metrics` too.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::AlreadyInstalled`] if a global recorder is
    /// already set.
    pub fn install() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new().build_recorder();
        let metrics = Self::register(&recorder);

        metrics::set_global_recorder(recorder).map_err(|_| MetricsError::AlreadyInstalled)?;
        describe_library_metrics();

        tracing::info!("Prometheus recorder installed");
        Ok(metrics)
    }

    fn register(recorder: &PrometheusRecorder) -> Self {
        let handle = recorder.handle();
        let (inbound, outbound) = metrics::with_local_recorder(recorder, || {
            describe_counter!(INBOUND_REQUESTS, "Total number of inbound requests");
            describe_counter!(OUTBOUND_REQUESTS, "Total number of outbound requests");
            (counter!(INBOUND_REQUESTS), counter!(OUTBOUND_REQUESTS))
        });

        Self {
            handle,
            inbound,
            outbound,
        }
    }

    /// Count one `POST /inbound`.
    pub fn record_inbound(&self) {
        self.inbound.increment(1);
    }

    /// Count one `GET /outbound`.
    pub fn record_outbound(&self) {
        self.outbound.increment(1);
    }

    /// Render every metric in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

fn describe_library_metrics() {
    describe_counter!(
        "edi_gateway_store_inserts_total",
        "Transaction inserts by outcome"
    );
    describe_counter!(
        "edi_gateway_store_scans_total",
        "Full transaction scans by outcome"
    );
    describe_counter!(
        "edi_gateway_publish_total",
        "Transaction events published by outcome"
    );
}
