//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// SMS gateway URL.
    pub sms_gateway_url: String,
    /// Shared secret for the scheduling trigger. When set, callers must
    /// present it as a bearer token.
    pub cron_secret: Option<String>,
    /// Shared secret for the inbound webhook. When set, callers must
    /// present it in the `x-poller-secret` header.
    pub poller_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:jot.db?mode=rwc` |
    /// | `SMS_GATEWAY_URL` | SMS gateway URL | `http://127.0.0.1:8380` |
    /// | `CRON_SECRET` | Scheduling trigger secret | (unset: open) |
    /// | `POLLER_SECRET` | Inbound webhook secret | (unset: open) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:jot.db?mode=rwc".to_string());

        let sms_gateway_url =
            env::var("SMS_GATEWAY_URL").unwrap_or_else(|_| "http://127.0.0.1:8380".to_string());

        let cron_secret = env::var("CRON_SECRET").ok().filter(|s| !s.is_empty());
        let poller_secret = env::var("POLLER_SECRET").ok().filter(|s| !s.is_empty());

        Ok(Self {
            addr,
            database_url,
            sms_gateway_url,
            cron_secret,
            poller_secret,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,
}
