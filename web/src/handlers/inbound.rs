//! `POST /inbound`: ingest one transaction.

use crate::{WebResult, error::AppError};
use crate::state::AppState;
use axum::{body::Bytes, extract::State};

/// Prefix of the success body; the stored transaction follows it.
pub const CONFIRMATION_PREFIX: &str = "Inbound transaction processed: ";

/// Ingest a JSON transaction.
///
/// The body is read as raw bytes so the `Content-Type` header is not
/// inspected; anything that is not the transaction shape is a 400.
///
/// # Endpoint
///
/// ```text
/// POST /inbound
/// {"ship_to": "Acme", "item_list": "[{\"sku\":\"A1\"}]"}
/// ```
///
/// # Response
///
/// ```text
/// 200 OK
/// Inbound transaction processed: {id=... date=... ship_to=Acme item_list=[{"sku":"A1"}] status=Processed}
/// ```
///
/// # Errors
///
/// - 400 `Invalid JSON` for an undecodable body
/// - 500 `Failed to save transaction` if the write fails
/// - 500 `Failed to publish transaction` if the write succeeded but publishing did not
pub async fn ingest(State(state): State<AppState>, body: Bytes) -> WebResult<String> {
    state.metrics.record_inbound();

    let transaction = state
        .gateway
        .ingest_json(&body)
        .await
        .map_err(AppError::ingest_failed)?;

    Ok(format!("{CONFIRMATION_PREFIX}{transaction}"))
}
