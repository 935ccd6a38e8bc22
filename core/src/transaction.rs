//! The transaction record and its inbound request shape.
//!
//! A [`Transaction`] is the only entity the gateway knows about. It is created
//! once by ingest, never updated, and read back by the report.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Timestamp layout used in EDI 856 report lines.
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle status of a transaction.
///
/// Ingest sets [`TransactionStatus::Processed`] and nothing ever changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Stored and handed to the event stream.
    Processed,
}

impl TransactionStatus {
    /// Database/wire string for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "Processed",
        }
    }

    /// Parse a status from its database string.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStatus`] if the string is not a known status.
    pub fn parse(s: &str) -> Result<Self, UnknownStatus> {
        match s {
            "Processed" => Ok(Self::Processed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that does not name a [`TransactionStatus`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transaction status: {0}")]
pub struct UnknownStatus(pub String);

/// The caller-supplied part of a transaction.
///
/// Only `ship_to` and `item_list` are read from the request body. `id`,
/// `date` and `status` are server-assigned, so any values for them are
/// ignored regardless of their JSON type. Missing fields decode as empty
/// strings. `items` is accepted as a legacy spelling of `item_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewTransaction {
    /// Free-text shipment destination.
    #[serde(default)]
    pub ship_to: String,

    /// Opaque serialized item data, stored verbatim.
    #[serde(default, alias = "items")]
    pub item_list: String,
}

impl NewTransaction {
    /// Build a request from its two meaningful fields.
    #[must_use]
    pub fn new(ship_to: impl Into<String>, item_list: impl Into<String>) -> Self {
        Self {
            ship_to: ship_to.into(),
            item_list: item_list.into(),
        }
    }

    /// Decode a request body.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the body does not decode into the
    /// transaction shape.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Stamp the request with server-assigned identity, time and status.
    ///
    /// The date is cut to microseconds, the finest precision the store keeps,
    /// so the confirmation and the event match every later read.
    #[must_use]
    pub fn into_transaction(self, id: String, date: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            date: date.trunc_subsecs(6),
            ship_to: self.ship_to,
            item_list: self.item_list,
            status: TransactionStatus::Processed,
        }
    }
}

/// A recorded shipment transaction.
///
/// The serialized form is both the event payload published to the stream and
/// the shape of a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Server-generated unique identifier.
    pub id: String,

    /// Server time at ingest.
    pub date: DateTime<Utc>,

    /// Free-text shipment destination.
    pub ship_to: String,

    /// Opaque serialized item data.
    #[serde(alias = "items")]
    pub item_list: String,

    /// Always [`TransactionStatus::Processed`].
    pub status: TransactionStatus,
}

impl Transaction {
    /// Serialize as the JSON event payload.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if serialization fails.
    pub fn to_event_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a JSON event payload.
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the payload is not a transaction.
    pub fn from_event_payload(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Render as a single EDI 856 report line (without trailing newline).
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use edi_gateway_core::transaction::NewTransaction;
    ///
    /// let date = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    /// let tx = NewTransaction::new("Acme", "[]").into_transaction("t-1".into(), date);
    /// assert_eq!(
    ///     tx.edi_856_line(),
    ///     "EDI 856: Shipment t-1 to Acme on 2025-01-02 03:04:05 with items: []"
    /// );
    /// ```
    #[must_use]
    pub fn edi_856_line(&self) -> String {
        format!(
            "EDI 856: Shipment {} to {} on {} with items: {}",
            self.id,
            self.ship_to,
            self.date.format(REPORT_DATE_FORMAT),
            self.item_list
        )
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id={} date={} ship_to={} item_list={} status={}}}",
            self.id,
            self.date.to_rfc3339(),
            self.ship_to,
            self.item_list,
            self.status
        )
    }
}
