//! Ingest and report operations.
//!
//! [`Gateway`] wires the collaborators together. It holds no state of its
//! own and is cheap to clone.

use crate::environment::{Clock, IdGenerator};
use crate::publisher::{EventPublisher, PublishError};
use crate::store::{StoreError, TransactionStore};
use crate::transaction::{NewTransaction, Transaction};
use std::sync::Arc;
use thiserror::Error;

/// Failure of a gateway operation.
///
/// Each variant maps to one HTTP outcome: malformed input is a client error,
/// storage and publish failures are server errors.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request body did not decode into the transaction shape.
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// The store rejected a write or a read.
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    /// The stream rejected the event. The transaction is already stored.
    #[error("Publish failure for transaction {id}: {source}")]
    Publish {
        /// Id of the stored but unpublished transaction.
        id: String,
        /// The underlying publish error.
        source: PublishError,
    },
}

/// Transaction ingest and report service.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn TransactionStore>,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Gateway {
    /// Create a gateway over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn TransactionStore>,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            publisher,
            clock,
            ids,
        }
    }

    /// Decode a raw request body and ingest it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedInput`] before touching any
    /// collaborator if the body does not decode, otherwise whatever
    /// [`Gateway::ingest`] returns.
    pub async fn ingest_json(&self, body: &[u8]) -> Result<Transaction, GatewayError> {
        let request = NewTransaction::from_json(body)?;
        self.ingest(request).await
    }

    /// Stamp, persist and publish a transaction.
    ///
    /// The id, date and status are always server-assigned. The store write
    /// happens first; the publish is only attempted once it succeeded.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Storage`] if the write fails. Nothing is published.
    /// - [`GatewayError::Publish`] if the publish fails. The write is kept.
    pub async fn ingest(&self, request: NewTransaction) -> Result<Transaction, GatewayError> {
        let transaction = request.into_transaction(self.ids.next_id(), self.clock.now());

        self.store.insert(&transaction).await.inspect_err(|e| {
            tracing::error!(id = %transaction.id, error = %e, "Failed to save transaction");
        })?;

        if let Err(source) = self.publisher.publish(&transaction).await {
            tracing::error!(
                id = %transaction.id,
                topic = self.publisher.topic(),
                error = %source,
                "Transaction stored but not published"
            );
            return Err(GatewayError::Publish {
                id: transaction.id,
                source,
            });
        }

        tracing::info!(
            id = %transaction.id,
            ship_to = %transaction.ship_to,
            "Inbound transaction processed"
        );

        Ok(transaction)
    }

    /// Render every stored transaction as an EDI 856 line.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Storage`] if the read fails.
    pub async fn report(&self) -> Result<Vec<String>, GatewayError> {
        let transactions = self
            .store
            .list_all()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch transactions"))?;

        tracing::debug!(count = transactions.len(), "Rendering outbound report");

        Ok(transactions.iter().map(Transaction::edi_856_line).collect())
    }
}
