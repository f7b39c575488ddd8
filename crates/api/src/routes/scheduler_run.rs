//! Scheduling trigger endpoint.
//!
//! Invoked on a fixed external cadence (a cron-like driver posting once per
//! minute), and callable on demand. The engine's own pass guard rejects
//! overlapping invocations with 409.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use scheduler::PassSummary;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::routes::secret_matches;
use crate::state::AppState;

/// Run one scheduling pass.
pub async fn run(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<PassSummary>> {
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if !secret_matches(state.cron_secret.as_deref(), presented) {
        return Err(ApiError::Unauthorized);
    }

    let summary = state.engine.run_pass().await?;
    info!(
        sent = summary.sent,
        errors = summary.errors.len(),
        skipped = summary.skipped.len(),
        "Scheduling pass triggered via API"
    );

    Ok(Json(summary))
}
