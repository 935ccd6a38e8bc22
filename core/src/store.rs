//! Storage abstraction for transaction records.
//!
//! # Implementations
//!
//! - `PostgresTransactionStore` (in `edi-gateway-postgres`): production
//! - `InMemoryTransactionStore` (in `edi-gateway-testing`): fast, deterministic tests

use crate::transaction::Transaction;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Could not reach the database or acquire a connection.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Schema bootstrap failed.
    #[error("Schema creation failed: {0}")]
    SchemaFailed(String),

    /// The database rejected a statement.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A stored row could not be turned back into a transaction.
    #[error("Corrupt row for transaction {id}: {reason}")]
    CorruptRow {
        /// Id of the offending row.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Append-only store for transactions.
///
/// There is deliberately no update or delete operation: a transaction is
/// immutable once written.
///
/// # Dyn Compatibility
///
/// Methods return `Pin<Box<dyn Future>>` rather than using `async fn` so the
/// store can be shared as `Arc<dyn TransactionStore>`.
pub trait TransactionStore: Send + Sync {
    /// Persist a new transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write is rejected. The record must then
    /// be treated as not committed.
    fn insert(
        &self,
        transaction: &Transaction,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Load every stored transaction, oldest first.
    ///
    /// The scan is unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    fn list_all(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Transaction>, StoreError>> + Send + '_>>;
}
