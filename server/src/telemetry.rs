//! Tracing subscriber setup.

use crate::config::DEFAULT_LOG_FILTER;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `fmt` subscriber filtered by `directives`.
///
/// Invalid directives fall back to [`DEFAULT_LOG_FILTER`].
pub fn init(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
