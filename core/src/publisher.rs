//! Event stream abstraction for announcing new transactions.
//!
//! Every transaction that ingest persists is published once, as its JSON
//! payload, to a single configured topic. Publishing happens after the
//! storage write and is not transactional with it.
//!
//! # Implementations
//!
//! - `RedpandaPublisher` (in `edi-gateway-redpanda`): Kafka-compatible production client
//! - `RecordingPublisher` (in `edi-gateway-testing`): captures events in memory

use crate::transaction::Transaction;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur while publishing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The client could not be created.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The event could not be serialized.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// The broker did not accept the message.
    #[error("Publish failed for topic '{topic}': {reason}")]
    PublishFailed {
        /// The topic that failed
        topic: String,
        /// The reason for failure
        reason: String,
    },
}

/// Publisher for transaction events.
///
/// # Thread Safety
///
/// Implementations are shared by all request handlers and must be
/// `Send + Sync`.
pub trait EventPublisher: Send + Sync {
    /// Publish a persisted transaction and wait for the broker to accept it.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] if serialization or delivery fails. No retry
    /// is attempted.
    fn publish(
        &self,
        transaction: &Transaction,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + '_>>;

    /// Name of the topic events are sent to.
    fn topic(&self) -> &str;
}
