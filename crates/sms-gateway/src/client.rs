//! SMS gateway daemon HTTP client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{GatewayErrorBody, SendParams, SendResult};

/// Request timeout for gateway calls. A hung gateway must never stall a
/// scheduling pass past this bound.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for communicating with the SMS gateway daemon.
#[derive(Clone)]
pub struct SmsClient {
    http: Client,
    config: GatewayConfig,
    connected: Arc<AtomicBool>,
}

impl SmsClient {
    /// Connect to the gateway daemon.
    ///
    /// Verifies reachability with a health check before returning.
    pub async fn connect(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GatewayError::Http)?;

        let client = Self {
            http,
            config,
            connected: Arc::new(AtomicBool::new(false)),
        };

        if client.health_check().await? {
            client.connected.store(true, Ordering::SeqCst);
            info!("Connected to SMS gateway at {}", client.config.base_url);
        } else {
            return Err(GatewayError::HealthCheckFailed);
        }

        Ok(client)
    }

    /// Check if currently connected to the gateway.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Perform a health check against the gateway.
    pub async fn health_check(&self) -> Result<bool, GatewayError> {
        let url = self.config.health_url();
        debug!("Health check: {}", url);

        match self.http.get(&url).send().await {
            Ok(resp) => {
                let ok = resp.status().is_success();
                self.connected.store(ok, Ordering::SeqCst);
                Ok(ok)
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(GatewayError::Http(e))
            }
        }
    }

    /// Send a text message to a recipient.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<SendResult, GatewayError> {
        self.send(SendParams::text(to, body)).await
    }

    /// Send a message using the full SendParams structure.
    pub async fn send(&self, params: SendParams) -> Result<SendResult, GatewayError> {
        let url = self.config.send_url();
        debug!(to = %params.to, "Sending message via gateway");

        let mut request = self.http.post(&url).json(&params);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let message = match resp.json::<GatewayErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown gateway error")
                    .to_string(),
            };
            return Err(GatewayError::SendFailed {
                status: status.as_u16(),
                message,
            });
        }

        let result = resp.json::<SendResult>().await?;
        Ok(result)
    }
}
