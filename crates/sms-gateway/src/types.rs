//! Request and response types for the gateway HTTP API.

use serde::{Deserialize, Serialize};

/// Parameters for sending a message.
#[derive(Debug, Clone, Serialize)]
pub struct SendParams {
    /// Destination phone number (E.164).
    pub to: String,
    /// Message body text.
    pub body: String,
}

impl SendParams {
    /// Create send parameters for a text message.
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
        }
    }
}

/// Result of a send operation.
///
/// "Success" means the gateway accepted the message; no delivery receipt
/// is modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResult {
    /// Gateway-assigned message identifier, if provided.
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Error body returned by the gateway on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayErrorBody {
    /// Human-readable error message.
    pub error: String,
}
