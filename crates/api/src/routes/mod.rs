//! Route handlers for the API.

pub mod health;
pub mod inbound;
pub mod scheduler_run;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/scheduler/run", post(scheduler_run::run))
        .route("/api/sms/inbound", post(inbound::inbound))
}

/// Check a presented secret against an optionally configured one.
///
/// An unset secret leaves the endpoint open (local development); when set,
/// the caller must present it exactly.
pub(crate) fn secret_matches(configured: Option<&str>, presented: Option<&str>) -> bool {
    match configured {
        None => true,
        Some(expected) => presented == Some(expected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_matches() {
        assert!(secret_matches(None, None));
        assert!(secret_matches(None, Some("anything")));
        assert!(secret_matches(Some("s3cret"), Some("s3cret")));
        assert!(!secret_matches(Some("s3cret"), Some("wrong")));
        assert!(!secret_matches(Some("s3cret"), None));
    }
}
