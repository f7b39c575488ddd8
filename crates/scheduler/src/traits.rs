//! Seams between the scheduling core and its external collaborators.
//!
//! The engine and chain are written against these traits so they can be
//! exercised in tests without a gateway, calendar provider, or model API.

use async_trait::async_trait;
use calendar::{CalendarClient, CalendarEvent};
use chrono_tz::Tz;
use gemini_brain::GeminiBrain;
use sms_gateway::SmsClient;

use crate::error::SchedulerError;

/// Outbound message transport.
///
/// Success means "handed to the transport"; no delivery receipt is modeled.
#[async_trait]
pub trait OutboundSms: Send + Sync {
    /// Send a text message to a destination address.
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SchedulerError>;
}

#[async_trait]
impl OutboundSms for SmsClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), SchedulerError> {
        SmsClient::send_text(self, to, body)
            .await
            .map(|_| ())
            .map_err(|e| SchedulerError::Transport(e.to_string()))
    }
}

/// A transport that discards all messages. Useful for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct NoOpSms;

#[async_trait]
impl OutboundSms for NoOpSms {
    async fn send_text(&self, _to: &str, _body: &str) -> Result<(), SchedulerError> {
        Ok(())
    }
}

/// Read-only source of a user's calendar events for their local day.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// List today's events using the given credential and timezone.
    async fn today_events(
        &self,
        refresh_token: &str,
        tz: Tz,
    ) -> Result<Vec<CalendarEvent>, SchedulerError>;
}

#[async_trait]
impl EventSource for CalendarClient {
    async fn today_events(
        &self,
        refresh_token: &str,
        tz: Tz,
    ) -> Result<Vec<CalendarEvent>, SchedulerError> {
        self.list_today_events(refresh_token, tz)
            .await
            .map_err(|e| SchedulerError::Calendar(e.to_string()))
    }
}

/// Text generator turning an event list into raw prompt output.
#[async_trait]
pub trait PromptGenerator: Send + Sync {
    /// Generate raw output for the given events.
    async fn generate_raw(&self, events: &[CalendarEvent]) -> Result<String, SchedulerError>;
}

#[async_trait]
impl PromptGenerator for GeminiBrain {
    async fn generate_raw(&self, events: &[CalendarEvent]) -> Result<String, SchedulerError> {
        self.generate_prompt(events)
            .await
            .map_err(|e| SchedulerError::Generation(e.to_string()))
    }
}
