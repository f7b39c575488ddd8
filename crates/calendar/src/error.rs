//! Error types for the calendar client.

use thiserror::Error;

/// Errors that can occur when talking to the calendar provider.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token refresh was rejected (expired or revoked credential).
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// The events API returned a non-success status.
    #[error("Calendar API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
