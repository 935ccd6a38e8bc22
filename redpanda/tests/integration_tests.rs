//! Integration tests for [`RedpandaPublisher`] with a real Kafka instance.
//!
//! # Running These Tests
//!
//! These tests are marked as `#[ignore]` by default because they:
//! - Require Docker to be running (for testcontainers)
//! - Take 15-60 seconds per test to spin up Kafka
//!
//! To run explicitly:
//! ```bash
//! cargo test -p edi-gateway-redpanda --test integration_tests -- --ignored
//! ```

#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use chrono::{TimeZone, Utc};
use edi_gateway_core::publisher::{EventPublisher, PublishError};
use edi_gateway_core::transaction::{NewTransaction, Transaction};
use edi_gateway_redpanda::RedpandaPublisher;
use rdkafka::config::ClientConfig;
use rdkafka::Message;
use rdkafka::consumer::{Consumer, StreamConsumer};
use std::time::Duration;
use testcontainers::ContainerAsync;
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::kafka::{KAFKA_PORT, Kafka};

fn transaction(id: &str) -> Transaction {
    let date = Utc
        .with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
        .single()
        .expect("valid timestamp");
    NewTransaction::new("Acme", r#"[{"sku":"A1"}]"#).into_transaction(id.to_string(), date)
}

async fn start_kafka() -> (ContainerAsync<Kafka>, String) {
    let kafka = Kafka::default()
        .with_env_var("KAFKA_AUTO_CREATE_TOPICS_ENABLE", "true")
        .start()
        .await
        .expect("Failed to start Kafka container");

    let host = kafka.get_host().await.expect("Failed to get host");
    let port = kafka
        .get_host_port_ipv4(KAFKA_PORT)
        .await
        .expect("Failed to get port");
    (kafka, format!("{host}:{port}"))
}

/// Publish until the broker accepts, which also auto-creates the topic.
async fn publish_when_ready(publisher: &RedpandaPublisher, tx: &Transaction) {
    let max_attempts = 60;
    for attempt in 1..=max_attempts {
        if publisher.publish(tx).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(
            attempt != max_attempts,
            "Kafka failed to accept a message after {max_attempts} attempts"
        );
    }
}

#[tokio::test]
#[ignore]
async fn test_published_payload_is_transaction_json() {
    let (_kafka, brokers) = start_kafka().await;
    let publisher = RedpandaPublisher::builder()
        .brokers(&brokers)
        .topic("edi_topic_it")
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create publisher");

    let tx = transaction("tx-it-1");
    publish_when_ready(&publisher, &tx).await;

    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", "edi-gateway-it")
        .set("auto.offset.reset", "earliest")
        .create()
        .expect("Failed to create consumer");
    consumer
        .subscribe(&["edi_topic_it"])
        .expect("Failed to subscribe");

    let message = tokio::time::timeout(Duration::from_secs(30), consumer.recv())
        .await
        .expect("Timeout waiting for message")
        .expect("Failed to receive message");

    assert!(message.key().is_none());
    let payload = message.payload().expect("message has a payload");
    let received = Transaction::from_event_payload(payload).expect("payload decodes");
    assert_eq!(received, tx);
}

#[tokio::test]
#[ignore]
async fn test_unreachable_broker_fails_within_timeout() {
    let publisher = RedpandaPublisher::builder()
        .brokers("127.0.0.1:1")
        .timeout(Duration::from_millis(500))
        .build()
        .expect("Producer creation does not contact the broker");

    let err = publisher
        .publish(&transaction("tx-lost"))
        .await
        .expect_err("publish should time out");

    match err {
        PublishError::PublishFailed { topic, .. } => assert_eq!(topic, "edi_topic"),
        other => panic!("unexpected error: {other:?}"),
    }
}
