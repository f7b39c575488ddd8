//! Inbound message webhook.
//!
//! The local message poller POSTs each inbound `(from, body)` pair here,
//! at-least-once; the correlator tolerates duplicates.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use scheduler::InboundOutcome;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::routes::secret_matches;
use crate::state::AppState;

/// Inbound message payload.
#[derive(Debug, Deserialize)]
pub struct InboundRequest {
    /// Sender address as reported by the transport.
    pub from: String,
    /// Message body text.
    pub body: String,
}

/// Handle one inbound message.
pub async fn inbound(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<InboundRequest>,
) -> Result<Json<InboundOutcome>> {
    let presented = headers.get("x-poller-secret").and_then(|v| v.to_str().ok());
    if !secret_matches(state.poller_secret.as_deref(), presented) {
        return Err(ApiError::Unauthorized);
    }

    if req.from.trim().is_empty() || req.body.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing from or body".to_string()));
    }

    let outcome = state.correlator.handle_inbound(&req.from, &req.body).await?;
    Ok(Json(outcome))
}
