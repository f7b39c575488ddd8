//! Configuration for the calendar client.

use std::env;

use crate::error::CalendarError;

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default Calendar API base URL.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Configuration for the calendar client.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    /// OAuth client ID.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Token endpoint URL.
    pub token_url: String,
    /// Calendar API base URL.
    pub api_url: String,
}

impl CalendarConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `GOOGLE_CLIENT_ID` | OAuth client ID | (required) |
    /// | `GOOGLE_CLIENT_SECRET` | OAuth client secret | (required) |
    /// | `GOOGLE_TOKEN_URL` | Token endpoint override | Google's |
    /// | `GOOGLE_CALENDAR_API_URL` | API base URL override | Google's |
    pub fn from_env() -> Result<Self, CalendarError> {
        let client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| CalendarError::Config("GOOGLE_CLIENT_ID is required".to_string()))?;
        let client_secret = env::var("GOOGLE_CLIENT_SECRET")
            .map_err(|_| CalendarError::Config("GOOGLE_CLIENT_SECRET is required".to_string()))?;
        let token_url =
            env::var("GOOGLE_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string());
        let api_url =
            env::var("GOOGLE_CALENDAR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            client_id,
            client_secret,
            token_url,
            api_url,
        })
    }

    /// Whether calendar integration is configured in the environment.
    pub fn is_configured() -> bool {
        env::var("GOOGLE_CLIENT_ID").is_ok() && env::var("GOOGLE_CLIENT_SECRET").is_ok()
    }

    /// URL for listing primary-calendar events.
    pub fn events_url(&self) -> String {
        format!("{}/calendars/primary/events", self.api_url)
    }
}
