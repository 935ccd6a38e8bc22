//! `GET /outbound`: EDI 856 report of every stored transaction.

use crate::{WebResult, error::AppError};
use crate::state::AppState;
use axum::extract::State;

/// Render the report, one newline-terminated line per transaction.
///
/// An empty store yields an empty 200 body.
///
/// # Errors
///
/// 500 `Failed to fetch transactions` if the store cannot be read.
pub async fn report(State(state): State<AppState>) -> WebResult<String> {
    state.metrics.record_outbound();

    let lines = state
        .gateway
        .report()
        .await
        .map_err(AppError::report_failed)?;

    let mut body = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        body.push_str(&line);
        body.push('\n');
    }
    Ok(body)
}
