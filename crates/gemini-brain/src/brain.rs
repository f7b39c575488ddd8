//! GeminiBrain implementation using the Gemini REST API.

use std::time::Duration;

use calendar::CalendarEvent;
use chrono::DateTime;
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};
use crate::config::GeminiConfig;
use crate::error::BrainError;

/// Request timeout; the chain treats anything slower as a failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// System instruction for turning a day's events into one reflective question.
const SYSTEM_INSTRUCTION: &str = "You are a warm, thoughtful journaling coach. A user shares \
their calendar events for the day and you write them a single reflective journal prompt to \
help them process and remember their day.

Rules:
- The prompt is one sentence only, ending with a question mark
- Be specific - reference actual events from their calendar, not generic platitudes
- Be emotionally resonant and open-ended, not just \"How was X?\"
- Vary your style: sometimes ask about feelings, sometimes about surprises, lessons, \
connections between events, or what they'd do differently
- Keep it conversational, like a friend asking - not a therapist or a corporate survey
- Also write a short title for the day: 3 to 5 words summarizing it
- Respond with only a JSON object of the form {\"prompt\": \"...\", \"title\": \"...\"} and \
nothing else";

/// A prompt author backed by the Gemini API.
///
/// Produces the raw model output for a day's event list; parsing the output
/// into the prompt/title shape is the caller's concern.
pub struct GeminiBrain {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBrain {
    /// Create a new GeminiBrain with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, BrainError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                BrainError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("GeminiBrain initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiBrain from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for the variables involved.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Generate a reflective prompt from today's events.
    ///
    /// Returns the raw model text (expected to be the JSON shape requested
    /// by the system instruction, but not guaranteed to be).
    pub async fn generate_prompt(&self, events: &[CalendarEvent]) -> Result<String, BrainError> {
        let event_list = format_event_list(events);
        debug!(event_count = events.len(), "Requesting prompt from Gemini");

        let request = GenerateContentRequest {
            contents: vec![Content::user(format!(
                "Here are my calendar events for today:\n{}",
                event_list
            ))],
            system_instruction: Content::system(SYSTEM_INSTRUCTION),
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        };

        let resp = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => "request failed".to_string(),
            };
            return Err(BrainError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = resp.json().await?;
        let text = body
            .first_text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(BrainError::EmptyResponse)?;

        Ok(text.to_string())
    }
}

/// Format events as a bulleted list, with start times where known.
fn format_event_list(events: &[CalendarEvent]) -> String {
    events
        .iter()
        .filter_map(|e| {
            let summary = e.summary.as_deref()?;
            let time = e
                .start
                .as_ref()
                .and_then(|s| s.date_time.as_deref())
                .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok())
                .map(|dt| dt.format("%H:%M").to_string());
            Some(match time {
                Some(t) => format!("- {} ({})", summary, t),
                None => format!("- {}", summary),
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use calendar::EventTime;

    #[test]
    fn test_format_event_list_skips_unnamed_events() {
        let events = vec![
            CalendarEvent::named("Standup"),
            CalendarEvent::default(),
            CalendarEvent::named("Dinner with Sam"),
        ];
        let list = format_event_list(&events);
        assert_eq!(list, "- Standup\n- Dinner with Sam");
    }

    #[test]
    fn test_format_event_list_includes_start_times() {
        let events = vec![CalendarEvent {
            summary: Some("Interview".to_string()),
            start: Some(EventTime {
                date_time: Some("2026-08-29T14:30:00-04:00".to_string()),
                date: None,
            }),
        }];
        let list = format_event_list(&events);
        assert_eq!(list, "- Interview (14:30)");
    }

    #[test]
    fn test_from_env_requires_api_key() {
        std::env::remove_var("GEMINI_API_KEY");
        assert!(matches!(
            GeminiBrain::from_env(),
            Err(BrainError::Configuration(_))
        ));
    }
}
