//! Wire types for the Google OAuth and Calendar APIs.

use serde::Deserialize;

/// Response from the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Seconds until expiry.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Error body from the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorBody {
    /// Error code (e.g., "invalid_grant").
    pub error: String,
    /// Optional human-readable description.
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Events listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsResponse {
    /// Events within the requested window.
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

/// A calendar event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarEvent {
    /// Event name. May be absent for private events.
    #[serde(default)]
    pub summary: Option<String>,
    /// Event start. Absent for some event kinds.
    #[serde(default)]
    pub start: Option<EventTime>,
}

impl CalendarEvent {
    /// Convenience constructor for a named event.
    pub fn named(summary: impl Into<String>) -> Self {
        Self {
            summary: Some(summary.into()),
            start: None,
        }
    }
}

/// Start or end time of an event: timed events carry `dateTime`,
/// all-day events carry `date`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// RFC 3339 timestamp for timed events.
    #[serde(default)]
    pub date_time: Option<String>,
    /// Calendar date (YYYY-MM-DD) for all-day events.
    #[serde(default)]
    pub date: Option<String>,
}
