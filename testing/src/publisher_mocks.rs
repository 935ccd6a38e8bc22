//! Recording event publisher.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use edi_gateway_core::publisher::{EventPublisher, PublishError};
use edi_gateway_core::transaction::Transaction;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// [`EventPublisher`] that keeps every published payload in memory.
///
/// Payloads are recorded in their serialized JSON form, exactly as a real
/// broker would receive them. Publishing can be made to fail, and every
/// attempt is counted whether or not it succeeds.
///
/// Clones share the same recording.
#[derive(Clone, Debug)]
pub struct RecordingPublisher {
    topic: String,
    payloads: Arc<Mutex<Vec<Vec<u8>>>>,
    fail: Arc<AtomicBool>,
    attempts: Arc<AtomicUsize>,
}

impl RecordingPublisher {
    /// Create a publisher for the given topic.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            payloads: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(AtomicBool::new(false)),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn fail_publishes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Raw payloads accepted so far.
    #[must_use]
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }

    /// Accepted payloads decoded back into transactions.
    ///
    /// # Panics
    ///
    /// Panics if a recorded payload is not a transaction, which cannot
    /// happen for payloads produced by [`Transaction::to_event_payload`].
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn published(&self) -> Vec<Transaction> {
        self.payloads
            .lock()
            .unwrap()
            .iter()
            .map(|p| Transaction::from_event_payload(p).expect("recorded payload is a transaction"))
            .collect()
    }

    /// Number of publish calls, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(
        &self,
        transaction: &Transaction,
    ) -> Pin<Box<dyn Future<Output = Result<(), PublishError>> + Send + '_>> {
        let payload = transaction.to_event_payload();
        Box::pin(async move {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(PublishError::PublishFailed {
                    topic: self.topic.clone(),
                    reason: "injected publish failure".to_string(),
                });
            }

            let payload =
                payload.map_err(|e| PublishError::SerializationFailed(e.to_string()))?;
            self.payloads.lock().unwrap().push(payload);
            Ok(())
        })
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}
