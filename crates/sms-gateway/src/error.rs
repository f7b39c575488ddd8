//! Error types for sms-gateway.

use thiserror::Error;

/// Errors that can occur when interacting with the SMS gateway daemon.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Gateway health check failed.
    #[error("Health check failed")]
    HealthCheckFailed,

    /// Message sending failed.
    #[error("Send failed ({status}): {message}")]
    SendFailed { status: u16, message: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
