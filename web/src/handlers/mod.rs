//! HTTP request handlers.
//!
//! One module per route.

pub mod inbound;
pub mod metrics;
pub mod outbound;
