//! # EDI Gateway Testing
//!
//! Testing utilities for the EDI gateway.
//!
//! This crate provides:
//! - [`InMemoryTransactionStore`]: `Vec`-backed store with failure injection
//! - [`RecordingPublisher`]: captures published events, can be told to fail
//! - [`FixedClock`] and [`SequentialIdGenerator`]: deterministic environment
//!
//! ## Example
//!
//! ```
//! use edi_gateway_core::gateway::Gateway;
//! use edi_gateway_core::transaction::NewTransaction;
//! use edi_gateway_testing::{
//!     InMemoryTransactionStore, RecordingPublisher, SequentialIdGenerator, test_clock,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryTransactionStore::new();
//! let publisher = RecordingPublisher::new("edi_topic");
//! let gateway = Gateway::new(
//!     Arc::new(store.clone()),
//!     Arc::new(publisher.clone()),
//!     Arc::new(test_clock()),
//!     Arc::new(SequentialIdGenerator::new("tx")),
//! );
//!
//! let stored = gateway.ingest(NewTransaction::new("Acme", "[]")).await.unwrap();
//! assert_eq!(stored.id, "tx-1");
//! assert_eq!(store.len(), 1);
//! assert_eq!(publisher.published().len(), 1);
//! # });
//! ```

pub mod publisher_mocks;
pub mod store_mocks;

/// Mock implementations of environment traits.
pub mod mocks {
    use chrono::{DateTime, Utc};
    use edi_gateway_core::environment::{Clock, IdGenerator};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use edi_gateway_testing::mocks::FixedClock;
    /// use edi_gateway_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable ids: `{prefix}-1`, `{prefix}-2`, ...
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start a new sequence at 1.
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed);
            format!("{}-{n}", self.prefix)
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock};
pub use publisher_mocks::RecordingPublisher;
pub use store_mocks::InMemoryTransactionStore;
