//! Redpanda publisher for the EDI gateway.
//!
//! Provides [`RedpandaPublisher`], a Kafka-compatible implementation of the
//! [`EventPublisher`] trait from `edi-gateway-core`, built on rdkafka's
//! `FutureProducer`. Works with both Redpanda and Apache Kafka.
//!
//! # Message Format
//!
//! Each transaction is sent as one message to the configured topic:
//! - **Key**: none (the broker picks the partition)
//! - **Payload**: the transaction serialized as JSON
//!
//! # Delivery Semantics
//!
//! `publish` waits for the broker acknowledgement configured by `acks`. There
//! is no retry beyond what the client library does within the message
//! timeout; the caller decides what a failed publish means.
//!
//! # Example
//!
//! ```no_run
//! use edi_gateway_redpanda::RedpandaPublisher;
//! use edi_gateway_core::publisher::EventPublisher;
//! use edi_gateway_core::transaction::NewTransaction;
//! use chrono::Utc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let publisher = RedpandaPublisher::new("localhost:9092", "edi_topic")?;
//!
//! let tx = NewTransaction::new("Acme", "[]").into_transaction("tx-1".into(), Utc::now());
//! publisher.publish(&tx).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use edi_gateway_core::publisher::{EventPublisher, PublishError};
use edi_gateway_core::transaction::Transaction;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Default topic for transaction events.
pub const DEFAULT_TOPIC: &str = "edi_topic";

/// Default producer batch size in bytes (200 MiB).
pub const DEFAULT_BATCH_BYTES: u64 = 200 * 1024 * 1024;

/// Default upper bound on a single produced message (batch size plus 1 MiB).
///
/// Leaves room for the id, date and status wrapped around a document that
/// fills a whole batch.
pub const DEFAULT_MAX_MESSAGE_BYTES: u64 = DEFAULT_BATCH_BYTES + 1024 * 1024;

/// Default delivery timeout.
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Redpanda-backed [`EventPublisher`].
///
/// The underlying producer is thread-safe and shared by every request.
pub struct RedpandaPublisher {
    producer: FutureProducer,
    brokers: String,
    topic: String,
    timeout: Duration,
}

impl RedpandaPublisher {
    /// Create a publisher with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::ConnectionFailed`] if the producer cannot be
    /// created.
    pub fn new(brokers: &str, topic: &str) -> Result<Self, PublishError> {
        Self::builder().brokers(brokers).topic(topic).build()
    }

    /// Create a builder for custom configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use edi_gateway_redpanda::RedpandaPublisher;
    /// use std::time::Duration;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let publisher = RedpandaPublisher::builder()
    ///     .brokers("localhost:9092")
    ///     .topic("edi_topic")
    ///     .producer_acks("all")
    ///     .timeout(Duration::from_secs(10))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn builder() -> RedpandaPublisherBuilder {
        RedpandaPublisherBuilder::default()
    }

    /// Get the configured broker addresses.
    #[must_use]
    pub fn brokers(&self) -> &str {
        &self.brokers
    }
}

/// Builder for [`RedpandaPublisher`].
#[derive(Default, Debug)]
pub struct RedpandaPublisherBuilder {
    brokers: Option<String>,
    topic: Option<String>,
    producer_acks: Option<String>,
    batch_bytes: Option<u64>,
    max_message_bytes: Option<u64>,
    timeout: Option<Duration>,
}

impl RedpandaPublisherBuilder {
    /// Set the broker addresses.
    ///
    /// # Parameters
    ///
    /// - `brokers`: Comma-separated list of broker addresses (e.g., "localhost:9092")
    #[must_use]
    pub fn brokers(mut self, brokers: impl Into<String>) -> Self {
        self.brokers = Some(brokers.into());
        self
    }

    /// Set the destination topic.
    ///
    /// Default: [`DEFAULT_TOPIC`]
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Set the producer acknowledgment mode.
    ///
    /// # Parameters
    ///
    /// - `acks`: "0" (no acks), "1" (leader ack), "all" (all replicas ack)
    ///
    /// Default: "1"
    #[must_use]
    pub fn producer_acks(mut self, acks: impl Into<String>) -> Self {
        self.producer_acks = Some(acks.into());
        self
    }

    /// Set the maximum producer batch size in bytes.
    ///
    /// Default: [`DEFAULT_BATCH_BYTES`]
    #[must_use]
    pub const fn batch_bytes(mut self, bytes: u64) -> Self {
        self.batch_bytes = Some(bytes);
        self
    }

    /// Set the largest message the producer accepts, in bytes.
    ///
    /// Maps to `message.max.bytes`. The broker's topic `max.message.bytes`
    /// must be at least as large for big documents to be accepted.
    ///
    /// Default: [`DEFAULT_MAX_MESSAGE_BYTES`]
    #[must_use]
    pub const fn max_message_bytes(mut self, bytes: u64) -> Self {
        self.max_message_bytes = Some(bytes);
        self
    }

    /// Set the delivery timeout.
    ///
    /// Default: [`DEFAULT_MESSAGE_TIMEOUT`]
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::ConnectionFailed`] if:
    /// - Brokers not set
    /// - Cannot create producer
    /// - Invalid configuration
    pub fn build(self) -> Result<RedpandaPublisher, PublishError> {
        let brokers = self
            .brokers
            .ok_or_else(|| PublishError::ConnectionFailed("Brokers not configured".to_string()))?;
        let topic = self.topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string());
        let acks = self.producer_acks.unwrap_or_else(|| "1".to_string());
        let batch_bytes = self.batch_bytes.unwrap_or(DEFAULT_BATCH_BYTES);
        let max_message_bytes = self.max_message_bytes.unwrap_or(DEFAULT_MAX_MESSAGE_BYTES);
        let timeout = self.timeout.unwrap_or(DEFAULT_MESSAGE_TIMEOUT);

        let producer: FutureProducer =
            producer_config(&brokers, &acks, batch_bytes, max_message_bytes, timeout)
                .create()
                .map_err(|e| {
                    PublishError::ConnectionFailed(format!("Failed to create producer: {e}"))
                })?;

        tracing::info!(
            brokers = %brokers,
            topic = %topic,
            acks = %acks,
            batch_bytes,
            max_message_bytes,
            "RedpandaPublisher created"
        );

        Ok(RedpandaPublisher {
            producer,
            brokers,
            topic,
            timeout,
        })
    }
}

fn producer_config(
    brokers: &str,
    acks: &str,
    batch_bytes: u64,
    max_message_bytes: u64,
    timeout: Duration,
) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", brokers)
        .set("message.timeout.ms", timeout.as_millis().to_string())
        .set("acks", acks)
        .set("batch.size", batch_bytes.to_string())
        .set("message.max.bytes", max_message_bytes.to_string());
    config
}

impl EventPublisher for RedpandaPublisher {
    fn publish(
        &self,
        transaction: &Transaction,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + '_>> {
        let payload = transaction.to_event_payload();
        let id = transaction.id.clone();

        Box::pin(async move {
            let payload = payload.map_err(|e| PublishError::SerializationFailed(e.to_string()))?;

            let record = FutureRecord::<(), [u8]>::to(&self.topic).payload(&payload);

            match self.producer.send(record, Timeout::After(self.timeout)).await {
                Ok((partition, offset)) => {
                    metrics::counter!("edi_gateway_publish_total", "outcome" => "ok").increment(1);
                    tracing::debug!(
                        topic = %self.topic,
                        partition,
                        offset,
                        id = %id,
                        "Transaction published"
                    );
                    Ok(())
                }
                Err((kafka_error, _)) => {
                    metrics::counter!("edi_gateway_publish_total", "outcome" => "error")
                        .increment(1);
                    tracing::error!(
                        topic = %self.topic,
                        id = %id,
                        error = %kafka_error,
                        "Failed to publish transaction"
                    );
                    Err(PublishError::PublishFailed {
                        topic: self.topic.clone(),
                        reason: kafka_error.to_string(),
                    })
                }
            }
        })
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redpanda_publisher_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<RedpandaPublisher>();
        assert_sync::<RedpandaPublisher>();
    }

    #[test]
    fn builder_without_brokers_fails() {
        let result = RedpandaPublisher::builder().topic("edi_topic").build();
        assert!(matches!(result, Err(PublishError::ConnectionFailed(_))));
    }

    #[test]
    fn builder_applies_defaults() {
        // Producer creation does not contact the broker.
        let publisher = RedpandaPublisher::builder()
            .brokers("localhost:9092")
            .build()
            .unwrap();
        assert_eq!(publisher.topic(), DEFAULT_TOPIC);
        assert_eq!(publisher.brokers(), "localhost:9092");
        assert_eq!(publisher.timeout, DEFAULT_MESSAGE_TIMEOUT);
    }

    #[test]
    fn default_batch_matches_two_hundred_mebibytes() {
        assert_eq!(DEFAULT_BATCH_BYTES, 209_715_200);
    }

    #[test]
    fn producer_accepts_messages_as_large_as_a_batch() {
        let config = producer_config(
            "localhost:9092",
            "1",
            DEFAULT_BATCH_BYTES,
            DEFAULT_MAX_MESSAGE_BYTES,
            DEFAULT_MESSAGE_TIMEOUT,
        );

        assert_eq!(config.get("batch.size"), Some("209715200"));
        assert_eq!(config.get("message.max.bytes"), Some("210763776"));
    }

    #[test]
    fn builder_creates_producer_with_large_message_limit() {
        let publisher = RedpandaPublisher::builder()
            .brokers("localhost:9092")
            .max_message_bytes(DEFAULT_MAX_MESSAGE_BYTES)
            .build();
        assert!(publisher.is_ok());
    }
}
