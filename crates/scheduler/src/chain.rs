//! Prompt Source Chain.
//!
//! Produces the daily prompt text and title for a user by trying an ordered
//! list of fallible tiers. Every tier failure is logged and falls through;
//! the final tier cannot fail, so `generate` never returns an error:
//!
//! 1. Calendar fetch (needs a stored refresh token): today's events in the
//!    user's local day.
//! 2. Generator (needs a configured model + non-empty events): one
//!    reflective question plus a short title.
//! 3. Template from the first event's name.
//! 4. Random row from the static prompt pool, or a fixed literal if the
//!    pool is empty.

use calendar::CalendarEvent;
use chrono_tz::Tz;
use database::{prompt_pool, Database, User};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SchedulerError;
use crate::traits::{EventSource, PromptGenerator};

/// Fixed fallback when even the prompt pool is empty.
pub const DEFAULT_PROMPT: &str = "What's one thing from today that's still on your mind?";

/// Maximum words taken from a prompt text when deriving its title.
const TITLE_MAX_WORDS: usize = 6;

/// A generated prompt: the message body and a short title for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPrompt {
    /// The reflective question sent to the user.
    pub text: String,
    /// Short title summarizing the day or the prompt.
    pub title: String,
}

/// The fallback chain of prompt sources.
pub struct PromptChain<E, G> {
    db: Database,
    calendar: Option<E>,
    generator: Option<G>,
}

impl<E: EventSource, G: PromptGenerator> PromptChain<E, G> {
    /// Create a chain. `calendar` and `generator` are optional capabilities;
    /// absent ones simply skip their tiers.
    pub fn new(db: Database, calendar: Option<E>, generator: Option<G>) -> Self {
        Self {
            db,
            calendar,
            generator,
        }
    }

    /// Generate a prompt for the user. Never fails; internal errors degrade
    /// to the next tier.
    pub async fn generate(&self, user: &User) -> GeneratedPrompt {
        if let Some(events) = self.fetch_today_events(user).await {
            match self.from_generator(&events).await {
                Some(Ok(prompt)) => return prompt,
                Some(Err(e)) => warn!(user_id = %user.id, "Generator tier failed: {}", e),
                None => debug!(user_id = %user.id, "No generator configured"),
            }
            if let Some(prompt) = from_first_event(&events) {
                return prompt;
            }
            debug!(user_id = %user.id, "First event unnamed, falling back to pool");
        }

        self.from_pool().await
    }

    /// Tier 1: today's events, if the user has calendar personalization.
    /// Returns `None` on any failure or when there is nothing to work with.
    async fn fetch_today_events(&self, user: &User) -> Option<Vec<CalendarEvent>> {
        let source = self.calendar.as_ref()?;
        let token = user.google_refresh_token.as_deref()?;

        let tz: Tz = match user.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => {
                warn!(user_id = %user.id, timezone = %user.timezone, "Invalid timezone, skipping calendar");
                return None;
            }
        };

        match source.today_events(token, tz).await {
            Ok(events) if events.is_empty() => {
                debug!(user_id = %user.id, "Calendar returned no events");
                None
            }
            Ok(events) => Some(events),
            Err(e) => {
                warn!(user_id = %user.id, "Calendar fetch failed: {}", e);
                None
            }
        }
    }

    /// Tier 2: model-written prompt from the event list. `None` when no
    /// generator is configured; an absent capability is not a failure.
    async fn from_generator(
        &self,
        events: &[CalendarEvent],
    ) -> Option<Result<GeneratedPrompt, SchedulerError>> {
        let generator = self.generator.as_ref()?;
        Some(
            generator
                .generate_raw(events)
                .await
                .map(|raw| parse_generator_output(&raw, events)),
        )
    }

    /// Tier 4: random pool prompt. Infallible: pool errors and an empty
    /// pool both degrade to the fixed literal.
    async fn from_pool(&self) -> GeneratedPrompt {
        let prompts = match prompt_pool::list_prompts(self.db.pool()).await {
            Ok(prompts) => prompts,
            Err(e) => {
                warn!("Prompt pool unavailable: {}", e);
                Vec::new()
            }
        };

        let text = if prompts.is_empty() {
            DEFAULT_PROMPT.to_string()
        } else {
            let idx = rand::thread_rng().gen_range(0..prompts.len());
            prompts[idx].prompt_text.clone()
        };

        let title = title_from_text(&text);
        GeneratedPrompt { text, title }
    }
}

/// Tier 3: deterministic template from the first event's name.
fn from_first_event(events: &[CalendarEvent]) -> Option<GeneratedPrompt> {
    let name = events.first()?.summary.as_deref()?.trim();
    if name.is_empty() {
        return None;
    }

    Some(GeneratedPrompt {
        text: format!("How did {} go today?", name),
        title: name.to_string(),
    })
}

/// Derive a title from prompt text: first six whitespace-delimited words,
/// trailing punctuation stripped.
pub fn title_from_text(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_MAX_WORDS).collect();
    words
        .join(" ")
        .trim_end_matches(['?', '!', '.'])
        .to_string()
}

/// Derive a title from the first two named events, or "Today".
fn title_from_events(events: &[CalendarEvent]) -> String {
    let names: Vec<&str> = events
        .iter()
        .filter_map(|e| e.summary.as_deref())
        .filter(|s| !s.trim().is_empty())
        .take(2)
        .collect();

    if names.is_empty() {
        "Today".to_string()
    } else {
        names.join(", ")
    }
}

/// The JSON shape the generator is asked to produce.
#[derive(Debug, Deserialize)]
struct GeneratorDraft {
    prompt: String,
    title: String,
}

/// Parse raw generator output into a prompt. Unparseable output becomes the
/// text wholesale, with a title derived from the event names.
fn parse_generator_output(raw: &str, events: &[CalendarEvent]) -> GeneratedPrompt {
    let candidate = strip_code_fence(raw);
    if let Ok(draft) = serde_json::from_str::<GeneratorDraft>(candidate) {
        let text = draft.prompt.trim();
        let title = draft.title.trim();
        if !text.is_empty() && !title.is_empty() {
            return GeneratedPrompt {
                text: text.to_string(),
                title: title.to_string(),
            };
        }
    }

    GeneratedPrompt {
        text: raw.trim().to_string(),
        title: title_from_events(events),
    }
}

/// Strip a surrounding markdown code fence, if present. Models often wrap
/// JSON output in ```json fences despite instructions.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
