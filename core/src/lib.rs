//! # EDI Gateway Core
//!
//! Domain model and collaborator traits for the EDI gateway.
//!
//! The gateway accepts shipment transactions over HTTP, records them in a
//! relational store and republishes each one on an event stream. Recorded
//! transactions can be read back as flattened EDI 856 report lines.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  HTTP handler   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Gateway      │  assigns id, date, status
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ TransactionStore│◄─── Source of truth
//! └────────┬────────┘
//!          │ (write path only)
//!          ▼
//! ┌─────────────────┐
//! │ EventPublisher  │◄─── Distribution
//! └─────────────────┘
//! ```
//!
//! The store write and the publish are not atomic. A publish failure leaves a
//! durable record that was never announced on the stream.
//!
//! # Example
//!
//! ```no_run
//! use edi_gateway_core::environment::{SystemClock, UuidGenerator};
//! use edi_gateway_core::gateway::Gateway;
//! use edi_gateway_core::publisher::EventPublisher;
//! use edi_gateway_core::store::TransactionStore;
//! use edi_gateway_core::transaction::NewTransaction;
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     store: Arc<dyn TransactionStore>,
//! #     publisher: Arc<dyn EventPublisher>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = Gateway::new(store, publisher, Arc::new(SystemClock), Arc::new(UuidGenerator));
//!
//! let stored = gateway
//!     .ingest(NewTransaction::new("Acme", r#"[{"sku":"A1"}]"#))
//!     .await?;
//! println!("{stored}");
//!
//! for line in gateway.report().await? {
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod gateway;
pub mod publisher;
pub mod store;
pub mod transaction;

/// Environment traits for injected side effects.
///
/// Time and identity are the only non-deterministic inputs of the ingest
/// path. Both sit behind traits so tests can pin them.
pub mod environment {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of transaction identifiers.
    ///
    /// Implementations must never return the same id twice within a process.
    pub trait IdGenerator: Send + Sync {
        /// Produce a fresh, non-empty identifier.
        fn next_id(&self) -> String;
    }

    /// Random UUID v4 identifiers in hyphenated form.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UuidGenerator;

    impl IdGenerator for UuidGenerator {
        fn next_id(&self) -> String {
            Uuid::new_v4().to_string()
        }
    }
}
