//! Behavioural tests for [`Gateway`] against in-memory collaborators.

#![allow(clippy::unwrap_used, clippy::panic)] // Test code uses unwrap/panic for brevity

use chrono::{TimeZone, Utc};
use edi_gateway_core::environment::{Clock, UuidGenerator};
use edi_gateway_core::gateway::{Gateway, GatewayError};
use edi_gateway_core::publisher::PublishError;
use edi_gateway_core::transaction::{NewTransaction, TransactionStatus};
use edi_gateway_testing::{
    FixedClock, InMemoryTransactionStore, RecordingPublisher, SequentialIdGenerator, test_clock,
};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

struct Harness {
    gateway: Gateway,
    store: InMemoryTransactionStore,
    publisher: RecordingPublisher,
}

fn harness() -> Harness {
    let store = InMemoryTransactionStore::new();
    let publisher = RecordingPublisher::new("edi_topic");
    let gateway = Gateway::new(
        Arc::new(store.clone()),
        Arc::new(publisher.clone()),
        Arc::new(test_clock()),
        Arc::new(UuidGenerator),
    );
    Harness {
        gateway,
        store,
        publisher,
    }
}

#[tokio::test]
async fn ingest_stores_then_publishes() {
    let h = harness();
    let items = r#"[{"sku":"A1"}]"#;

    let stored = h.gateway.ingest(NewTransaction::new("Acme", items)).await.unwrap();

    assert!(!stored.id.is_empty());
    assert_eq!(stored.ship_to, "Acme");
    assert_eq!(stored.item_list, items);
    assert_eq!(stored.status, TransactionStatus::Processed);
    assert_eq!(stored.date, test_clock().now());
    assert_eq!(h.store.rows(), vec![stored.clone()]);
    assert_eq!(h.publisher.published(), vec![stored]);
}

#[tokio::test]
async fn client_supplied_identity_is_overwritten() {
    let h = harness();
    let body = br#"{"id":"mine","date":"1999-01-01T00:00:00Z","status":"Pending","ship_to":"Acme","item_list":"[]"}"#;

    let stored = h.gateway.ingest_json(body).await.unwrap();

    assert_ne!(stored.id, "mine");
    assert_ne!(stored.date, Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(stored.status, TransactionStatus::Processed);
}

#[tokio::test]
async fn malformed_body_touches_nothing() {
    let h = harness();

    let err = h.gateway.ingest_json(b"not-json").await.unwrap_err();

    assert!(matches!(err, GatewayError::MalformedInput(_)));
    assert_eq!(h.store.write_calls(), 0);
    assert_eq!(h.publisher.attempts(), 0);
}

#[tokio::test]
async fn storage_failure_skips_publish() {
    let h = harness();
    h.store.fail_writes(true);

    let err = h.gateway.ingest(NewTransaction::new("Acme", "[]")).await.unwrap_err();

    assert!(matches!(err, GatewayError::Storage(_)));
    assert_eq!(h.publisher.attempts(), 0);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn publish_failure_keeps_the_stored_record() {
    let h = harness();
    h.publisher.fail_publishes(true);

    let err = h.gateway.ingest(NewTransaction::new("Acme", "[]")).await.unwrap_err();

    let id = match err {
        GatewayError::Publish { id, source } => {
            assert!(matches!(source, PublishError::PublishFailed { .. }));
            id
        }
        other => panic!("expected publish failure, got {other:?}"),
    };

    let report = h.gateway.report().await.unwrap();
    assert_eq!(report.len(), 1);
    assert!(report[0].contains(&id));
}

#[tokio::test]
async fn same_body_twice_creates_two_records() {
    let h = harness();
    let a = h.gateway.ingest(NewTransaction::new("Acme", "[]")).await.unwrap();
    let b = h.gateway.ingest(NewTransaction::new("Acme", "[]")).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(h.store.len(), 2);
}

#[tokio::test]
async fn concurrent_ingests_both_succeed() {
    let h = harness();
    let (a, b) = tokio::join!(
        h.gateway.ingest(NewTransaction::new("Acme", "[]")),
        h.gateway.ingest(NewTransaction::new("Acme", "[]")),
    );

    let ids: HashSet<_> = [a.unwrap().id, b.unwrap().id].into_iter().collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(h.publisher.published().len(), 2);
}

#[tokio::test]
async fn report_renders_one_line_per_record_in_order() {
    let store = InMemoryTransactionStore::new();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 58).unwrap());
    let gateway = Gateway::new(
        Arc::new(store),
        Arc::new(RecordingPublisher::new("edi_topic")),
        Arc::new(clock),
        Arc::new(SequentialIdGenerator::new("tx")),
    );

    gateway.ingest(NewTransaction::new("Acme", "[1]")).await.unwrap();
    gateway.ingest(NewTransaction::new("Globex", "[2]")).await.unwrap();

    assert_eq!(
        gateway.report().await.unwrap(),
        vec![
            "EDI 856: Shipment tx-1 to Acme on 2024-06-30 23:59:58 with items: [1]",
            "EDI 856: Shipment tx-2 to Globex on 2024-06-30 23:59:58 with items: [2]",
        ]
    );
}

#[tokio::test]
async fn sub_microsecond_clock_yields_matching_copies() {
    let store = InMemoryTransactionStore::new();
    let publisher = RecordingPublisher::new("edi_topic");
    let clock = FixedClock::new(Utc.timestamp_opt(1_735_689_600, 123_456_789).unwrap());
    let gateway = Gateway::new(
        Arc::new(store.clone()),
        Arc::new(publisher.clone()),
        Arc::new(clock),
        Arc::new(SequentialIdGenerator::new("tx")),
    );

    let returned = gateway.ingest(NewTransaction::new("Acme", "[]")).await.unwrap();

    assert_eq!(returned.date.timestamp_subsec_nanos(), 123_456_000);
    assert_eq!(store.rows(), vec![returned.clone()]);
    assert_eq!(publisher.published(), vec![returned]);
}

#[tokio::test]
async fn report_on_empty_store_is_empty() {
    let h = harness();
    assert!(h.gateway.report().await.unwrap().is_empty());
}

#[tokio::test]
async fn report_surfaces_read_failures() {
    let h = harness();
    h.store.fail_reads(true);

    let err = h.gateway.report().await.unwrap_err();
    assert!(matches!(err, GatewayError::Storage(_)));
}

proptest! {
    #[test]
    fn ingest_always_assigns_server_fields(ship_to in ".*", item_list in ".*") {
        let h = harness();
        let stored = tokio_test::block_on(
            h.gateway.ingest(NewTransaction::new(ship_to.clone(), item_list.clone())),
        ).unwrap();

        prop_assert!(!stored.id.is_empty());
        prop_assert_eq!(stored.status, TransactionStatus::Processed);
        prop_assert_eq!(stored.date, test_clock().now());
        prop_assert_eq!(stored.ship_to, ship_to);
        prop_assert_eq!(stored.item_list, item_list);
    }

    #[test]
    fn ids_are_unique_across_calls(count in 1usize..20) {
        let h = harness();
        let ids: HashSet<String> = (0..count)
            .map(|_| {
                tokio_test::block_on(h.gateway.ingest(NewTransaction::new("Acme", "[]")))
                    .unwrap()
                    .id
            })
            .collect();

        prop_assert_eq!(ids.len(), count);
    }
}
