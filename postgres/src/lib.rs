//! `PostgreSQL` transaction store for the EDI gateway.
//!
//! This crate provides [`PostgresTransactionStore`], the production
//! implementation of [`TransactionStore`] from `edi-gateway-core`. It uses a
//! sqlx connection pool and owns a single table:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS transactions (
//!     id TEXT PRIMARY KEY,
//!     date TIMESTAMPTZ NOT NULL,
//!     ship_to TEXT NOT NULL,
//!     item_list TEXT NOT NULL,
//!     status TEXT NOT NULL
//! );
//! ```
//!
//! # Example
//!
//! ```ignore
//! use edi_gateway_postgres::PostgresTransactionStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresTransactionStore::connect("postgres://localhost/edi_gateway").await?;
//!     store.ensure_schema().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use edi_gateway_core::store::{StoreError, TransactionStore};
use edi_gateway_core::transaction::{Transaction, TransactionStatus};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const CREATE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS transactions (
        id TEXT PRIMARY KEY,
        date TIMESTAMPTZ NOT NULL,
        ship_to TEXT NOT NULL,
        item_list TEXT NOT NULL,
        status TEXT NOT NULL
    )
";

const CREATE_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date, id)";

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// How long to wait for a free connection (and for the first connect).
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// `PostgreSQL`-backed [`TransactionStore`].
///
/// Cloning is cheap; clones share the pool.
#[derive(Clone, Debug)]
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    /// Connect with default [`PoolSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionFailed`] if the database cannot be
    /// reached.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        Self::connect_with(database_url, &PoolSettings::default()).await
    }

    /// Connect with explicit pool settings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionFailed`] if the database cannot be
    /// reached.
    pub async fn connect_with(
        database_url: &str,
        settings: &PoolSettings,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        tracing::info!(
            max_connections = settings.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `transactions` table and its index if they are missing.
    ///
    /// Safe to run on every start.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SchemaFailed`] if either statement fails.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in [CREATE_TABLE, CREATE_DATE_INDEX] {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::SchemaFailed(e.to_string()))?;
        }

        tracing::info!("Transaction schema ready");
        Ok(())
    }

    fn row_to_transaction(row: &PgRow) -> Result<Transaction, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        let corrupt = |reason: String| StoreError::CorruptRow {
            id: id.clone(),
            reason,
        };

        let date: DateTime<Utc> = row.try_get("date").map_err(|e| corrupt(e.to_string()))?;
        let ship_to: String = row.try_get("ship_to").map_err(|e| corrupt(e.to_string()))?;
        let item_list: String = row
            .try_get("item_list")
            .map_err(|e| corrupt(e.to_string()))?;
        let status: String = row.try_get("status").map_err(|e| corrupt(e.to_string()))?;
        let status = TransactionStatus::parse(&status).map_err(|e| corrupt(e.to_string()))?;

        Ok(Transaction {
            id,
            date,
            ship_to,
            item_list,
            status,
        })
    }
}

impl TransactionStore for PostgresTransactionStore {
    fn insert(
        &self,
        transaction: &Transaction,
    ) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        let transaction = transaction.clone();
        Box::pin(async move {
            let result = sqlx::query(
                r"
                INSERT INTO transactions (id, date, ship_to, item_list, status)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(&transaction.id)
            .bind(transaction.date)
            .bind(&transaction.ship_to)
            .bind(&transaction.item_list)
            .bind(transaction.status.as_str())
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => {
                    metrics::counter!("edi_gateway_store_inserts_total", "outcome" => "ok")
                        .increment(1);
                    tracing::debug!(id = %transaction.id, "Transaction row inserted");
                    Ok(())
                }
                Err(e) => {
                    metrics::counter!("edi_gateway_store_inserts_total", "outcome" => "error")
                        .increment(1);
                    Err(StoreError::DatabaseError(e.to_string()))
                }
            }
        })
    }

    fn list_all(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Transaction>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let rows = sqlx::query(
                r"
                SELECT id, date, ship_to, item_list, status
                FROM transactions
                ORDER BY date ASC, id ASC
                ",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                metrics::counter!("edi_gateway_store_scans_total", "outcome" => "error")
                    .increment(1);
                StoreError::DatabaseError(e.to_string())
            })?;

            metrics::counter!("edi_gateway_store_scans_total", "outcome" => "ok").increment(1);
            tracing::debug!(count = rows.len(), "Transaction rows loaded");

            rows.iter().map(Self::row_to_transaction).collect()
        })
    }
}
