//! Calendar provider HTTP client.

use std::time::Duration;

use chrono::{NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use tracing::debug;

use crate::config::CalendarConfig;
use crate::error::CalendarError;
use crate::types::{CalendarEvent, EventsResponse, TokenErrorBody, TokenResponse};

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the calendar provider (OAuth token refresh + event listing).
#[derive(Clone)]
pub struct CalendarClient {
    http: Client,
    config: CalendarConfig,
}

impl CalendarClient {
    /// Create a new calendar client.
    pub fn new(config: CalendarConfig) -> Result<Self, CalendarError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(CalendarError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a calendar client from environment variables.
    pub fn from_env() -> Result<Self, CalendarError> {
        Self::new(CalendarConfig::from_env()?)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Exchange a refresh token for a short-lived access token.
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<String, CalendarError> {
        debug!("Refreshing calendar access token");

        let resp = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let message = match resp.json::<TokenErrorBody>().await {
                Ok(body) => body
                    .error_description
                    .unwrap_or(body.error),
                Err(_) => "token endpoint returned an error".to_string(),
            };
            return Err(CalendarError::TokenRefresh(message));
        }

        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }

    /// List today's events on the user's primary calendar.
    ///
    /// "Today" is the local calendar day in `tz`: midnight through
    /// 23:59:59.999, converted to RFC 3339 for the provider.
    pub async fn list_today_events(
        &self,
        refresh_token: &str,
        tz: Tz,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let access_token = self.refresh_access_token(refresh_token).await?;

        let day = Utc::now().with_timezone(&tz).date_naive();
        let start_naive = day.and_time(NaiveTime::MIN);
        let end_naive = start_naive + chrono::Duration::days(1) - chrono::Duration::milliseconds(1);

        // earliest()/latest() pick a side when midnight falls in a DST gap.
        let time_min = match tz.from_local_datetime(&start_naive).earliest() {
            Some(dt) => dt,
            None => tz.from_utc_datetime(&start_naive),
        };
        let time_max = match tz.from_local_datetime(&end_naive).latest() {
            Some(dt) => dt,
            None => tz.from_utc_datetime(&end_naive),
        };

        debug!(
            time_min = %time_min.to_rfc3339(),
            time_max = %time_max.to_rfc3339(),
            "Listing today's events"
        );

        let resp = self
            .http
            .get(self.config.events_url())
            .bearer_auth(&access_token)
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let events: EventsResponse = resp.json().await?;
        Ok(events.items)
    }
}
