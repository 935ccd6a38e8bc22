//! In-memory transaction store.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity

use edi_gateway_core::store::{StoreError, TransactionStore};
use edi_gateway_core::transaction::Transaction;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// `Vec`-backed [`TransactionStore`] for fast, deterministic tests.
///
/// Keeps insertion order. Writes and reads can be made to fail to exercise
/// the storage-failure paths, and every call is counted.
///
/// Clones share the same underlying data.
///
/// # Example
///
/// ```
/// use edi_gateway_testing::InMemoryTransactionStore;
/// use edi_gateway_core::store::TransactionStore;
///
/// # tokio_test::block_on(async {
/// let store = InMemoryTransactionStore::new();
/// store.fail_writes(true);
/// assert!(store.list_all().await.unwrap().is_empty());
/// assert_eq!(store.read_calls(), 1);
/// # });
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryTransactionStore {
    rows: Arc<RwLock<Vec<Transaction>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    write_calls: Arc<AtomicUsize>,
    read_calls: Arc<AtomicUsize>,
}

impl InMemoryTransactionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent inserts fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of stored rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> Vec<Transaction> {
        self.rows.read().unwrap().clone()
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().unwrap().is_empty()
    }

    /// Number of `insert` calls, failed ones included.
    #[must_use]
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Number of `list_all` calls, failed ones included.
    #[must_use]
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn insert(
        &self,
        transaction: &Transaction,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        let transaction = transaction.clone();
        Box::pin(async move {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::DatabaseError(
                    "injected write failure".to_string(),
                ));
            }

            let mut rows = self.rows.write().unwrap();
            if rows.iter().any(|row| row.id == transaction.id) {
                return Err(StoreError::DatabaseError(format!(
                    "duplicate key value violates unique constraint: id={}",
                    transaction.id
                )));
            }
            rows.push(transaction);
            Ok(())
        })
    }

    fn list_all(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Transaction>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            self.read_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::DatabaseError(
                    "injected read failure".to_string(),
                ));
            }
            Ok(self.rows())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_clock;
    use edi_gateway_core::environment::Clock;
    use edi_gateway_core::transaction::NewTransaction;

    fn tx(id: &str) -> Transaction {
        NewTransaction::new("Acme", "[]").into_transaction(id.to_string(), test_clock().now())
    }

    #[tokio::test]
    async fn keeps_insertion_order() {
        let store = InMemoryTransactionStore::new();
        store.insert(&tx("b")).await.unwrap();
        store.insert(&tx("a")).await.unwrap();

        let ids: Vec<_> = store.list_all().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn rejects_duplicate_ids() {
        let store = InMemoryTransactionStore::new();
        store.insert(&tx("a")).await.unwrap();
        assert!(store.insert(&tx("a")).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn injected_failures_leave_rows_untouched() {
        let store = InMemoryTransactionStore::new();
        store.insert(&tx("a")).await.unwrap();

        store.fail_writes(true);
        store.fail_reads(true);
        assert!(store.insert(&tx("b")).await.is_err());
        assert!(store.list_all().await.is_err());

        store.fail_reads(false);
        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert_eq!(store.write_calls(), 2);
        assert_eq!(store.read_calls(), 2);
    }
}
