//! HTTP client for the local SMS gateway daemon.
//!
//! The gateway exposes a small REST API: a health endpoint and a
//! fire-and-forget send endpoint. Success means "handed to the gateway";
//! no delivery receipt is modeled.
//!
//! # Example
//!
//! ```no_run
//! use sms_gateway::{GatewayConfig, SmsClient};
//!
//! # async fn example() -> Result<(), sms_gateway::GatewayError> {
//! let client = SmsClient::connect(GatewayConfig::default()).await?;
//! client.send_text("+15551234567", "How did the interview go today?").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::SmsClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use types::{SendParams, SendResult};
