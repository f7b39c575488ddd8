//! Error types for gemini-brain.

use thiserror::Error;

/// Errors that can occur during prompt generation.
#[derive(Debug, Error)]
pub enum BrainError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Model returned no usable text.
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}
