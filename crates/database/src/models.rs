//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A subscriber receiving daily prompts.
///
/// The delivery-state fields (`last_prompt_sent_at`, `last_prompt_text`,
/// `last_prompt_title`) are mutated only through [`crate::user::mark_prompt_sent`]
/// and [`crate::journal::save_reply`]. `last_prompt_sent_at` is non-NULL
/// exactly while a prompt is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Opaque user id (UUID string assigned by the account system).
    pub id: String,
    /// Phone number in E.164 form (e.g., "+15551234567").
    pub phone: String,
    /// IANA timezone name (e.g., "America/New_York").
    pub timezone: String,
    /// Local send time as "HH:MM".
    pub daily_send_time: String,
    /// "on" for exact-time delivery, "around" for a randomized band.
    pub send_time_type: String,
    /// Whether the phone number is verified; gates scheduling eligibility.
    pub verified: bool,
    /// Google Calendar refresh token; absent means no calendar personalization.
    pub google_refresh_token: Option<String>,
    /// RFC 3339 UTC timestamp of the outstanding prompt, if any.
    pub last_prompt_sent_at: Option<String>,
    /// Text of the most recently sent prompt.
    pub last_prompt_text: Option<String>,
    /// Short title of the most recently sent prompt.
    pub last_prompt_title: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A captured journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user.
    pub user_id: String,
    /// Entry body (the user's reply, trimmed).
    pub content: String,
    /// Capture channel (currently always "sms").
    pub source: String,
    /// Prompt text that elicited this entry, if any.
    pub prompt_text: Option<String>,
    /// Prompt title that elicited this entry, if any.
    pub prompt_title: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// A row in the static fallback prompt pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PoolPrompt {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Prompt text.
    pub prompt_text: String,
}
