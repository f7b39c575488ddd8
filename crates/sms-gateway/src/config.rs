//! Configuration types for sms-gateway.

/// Configuration for connecting to the SMS gateway daemon.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the gateway HTTP server (e.g., "http://localhost:8380").
    pub base_url: String,
    /// Optional API key sent as a bearer token.
    pub api_key: Option<String>,
}

impl GatewayConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Create configuration with an API key.
    pub fn with_api_key(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: Some(api_key.into()),
        }
    }

    /// Get the send endpoint URL.
    pub fn send_url(&self) -> String {
        format!("{}/api/v1/send", self.base_url)
    }

    /// Get the health check endpoint URL.
    pub fn health_url(&self) -> String {
        format!("{}/api/v1/health", self.base_url)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("http://localhost:8380")
    }
}
