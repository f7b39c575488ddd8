//! Reply Correlator.
//!
//! Matches an inbound message back to the outstanding prompt it answers.
//! There is no conversation identifier on the wire; correlation is sender
//! address plus the 12-hour outstanding-prompt window. Expected non-save
//! outcomes (unknown sender, opt-out, no pending prompt) are results, not
//! errors.

use chrono::{DateTime, Duration, Utc};
use database::{journal, user, validation, Database};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;

/// How long a sent prompt stays open for replies. The boundary is
/// inclusive: a reply at exactly 12 hours is still saved.
pub const REPLY_WINDOW_HOURS: i64 = 12;

/// Why an inbound message was not saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Sender address doesn't match any user.
    UnknownNumber,
    /// The message was a STOP command; the user is now unsubscribed.
    Stopped,
    /// The message was a START command; the user is now resubscribed.
    Started,
    /// The sender exists but is not verified (e.g. replied after STOP).
    Unsubscribed,
    /// No prompt is outstanding within the reply window.
    NoPendingPrompt,
}

/// Result of handling one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InboundOutcome {
    /// Whether a journal entry was created.
    pub saved: bool,
    /// Why nothing was saved, when `saved` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

impl InboundOutcome {
    fn saved() -> Self {
        Self {
            saved: true,
            reason: None,
        }
    }

    fn skipped(reason: SkipReason) -> Self {
        Self {
            saved: false,
            reason: Some(reason),
        }
    }
}

/// Correlates inbound replies with outstanding prompts.
#[derive(Clone)]
pub struct ReplyCorrelator {
    db: Database,
}

impl ReplyCorrelator {
    /// Create a new correlator.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Handle one inbound message.
    ///
    /// Duplicate deliveries are tolerated: once a reply has claimed the
    /// outstanding prompt, any replay resolves to `no_pending_prompt`.
    pub async fn handle_inbound(&self, from: &str, body: &str) -> Result<InboundOutcome> {
        self.handle_inbound_at(from, body, Utc::now()).await
    }

    /// Handle one inbound message as of `now`. Split out for tests.
    pub async fn handle_inbound_at(
        &self,
        from: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<InboundOutcome> {
        let phone = validation::normalize_phone(from);

        let Some(u) = user::get_user_by_phone(self.db.pool(), &phone).await? else {
            debug!(%phone, "Inbound from unknown number");
            return Ok(InboundOutcome::skipped(SkipReason::UnknownNumber));
        };

        let content = body.trim();

        // Control commands short-circuit before the window check.
        match content.to_uppercase().as_str() {
            "STOP" => {
                user::set_verified(self.db.pool(), &u.id, false).await?;
                info!(user_id = %u.id, "User opted out");
                return Ok(InboundOutcome::skipped(SkipReason::Stopped));
            }
            "START" => {
                user::set_verified(self.db.pool(), &u.id, true).await?;
                info!(user_id = %u.id, "User opted in");
                return Ok(InboundOutcome::skipped(SkipReason::Started));
            }
            _ => {}
        }

        // An unsubscribed user has no live prompt, whatever the timestamp
        // still says.
        if !u.verified {
            debug!(user_id = %u.id, "Reply from unsubscribed user");
            return Ok(InboundOutcome::skipped(SkipReason::Unsubscribed));
        }

        let Some(sent_at) = u.last_prompt_sent_at.as_deref() else {
            return Ok(InboundOutcome::skipped(SkipReason::NoPendingPrompt));
        };

        let sent = match DateTime::parse_from_rfc3339(sent_at) {
            Ok(ts) => ts.with_timezone(&Utc),
            Err(_) => {
                warn!(user_id = %u.id, sent_at, "Unreadable delivery timestamp");
                return Ok(InboundOutcome::skipped(SkipReason::NoPendingPrompt));
            }
        };

        if now.signed_duration_since(sent) > Duration::hours(REPLY_WINDOW_HOURS) {
            debug!(user_id = %u.id, "Outstanding prompt expired");
            return Ok(InboundOutcome::skipped(SkipReason::NoPendingPrompt));
        }

        // Claim-and-insert is one transaction; a racing duplicate loses the
        // claim and falls out as no_pending_prompt.
        let saved = journal::save_reply(
            self.db.pool(),
            &u.id,
            content,
            sent_at,
            u.last_prompt_text.as_deref(),
            u.last_prompt_title.as_deref(),
        )
        .await?;

        if saved {
            info!(user_id = %u.id, "Journal entry saved");
            Ok(InboundOutcome::saved())
        } else {
            Ok(InboundOutcome::skipped(SkipReason::NoPendingPrompt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SecondsFormat, Timelike};
    use database::models::User;

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            phone: "+15551230001".to_string(),
            timezone: "America/New_York".to_string(),
            daily_send_time: "20:00".to_string(),
            send_time_type: "on".to_string(),
            verified: true,
            google_refresh_token: None,
            last_prompt_sent_at: None,
            last_prompt_text: None,
            last_prompt_title: None,
            created_at: String::new(),
        }
    }

    async fn setup() -> (Database, ReplyCorrelator) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        user::create_user(db.pool(), &test_user()).await.unwrap();
        (db.clone(), ReplyCorrelator::new(db))
    }

    fn rfc3339(ts: DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    async fn outstanding_prompt(db: &Database, sent_at: DateTime<Utc>) {
        user::mark_prompt_sent(
            db.pool(),
            "u1",
            None,
            &rfc3339(sent_at),
            "How did the big day go?",
            "Big day",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_number() {
        let (_db, correlator) = setup().await;
        let outcome = correlator
            .handle_inbound("+19998887777", "hello")
            .await
            .unwrap();
        assert_eq!(outcome, InboundOutcome::skipped(SkipReason::UnknownNumber));
    }

    #[tokio::test]
    async fn test_reply_within_window_is_saved() {
        let (db, correlator) = setup().await;
        let now = Utc::now();
        outstanding_prompt(&db, now - Duration::hours(2)).await;

        let outcome = correlator
            .handle_inbound_at("+15551230001", "It went really well!", now)
            .await
            .unwrap();
        assert!(outcome.saved);

        let entries = journal::list_entries(db.pool(), "u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "It went really well!");
        assert_eq!(
            entries[0].prompt_text.as_deref(),
            Some("How did the big day go?")
        );
        assert_eq!(entries[0].prompt_title.as_deref(), Some("Big day"));
    }

    #[tokio::test]
    async fn test_sender_address_without_plus_matches() {
        let (db, correlator) = setup().await;
        let now = Utc::now();
        outstanding_prompt(&db, now - Duration::hours(1)).await;

        let outcome = correlator
            .handle_inbound_at("15551230001", "reply", now)
            .await
            .unwrap();
        assert!(outcome.saved);
    }

    #[tokio::test]
    async fn test_window_boundaries() {
        // Align to whole seconds: `outstanding_prompt` stores timestamps at
        // second precision, so a fractional `now` would skew the exact-12h
        // boundary case past the window.
        let now = Utc::now().with_nanosecond(0).unwrap();

        // 11h59m: saved.
        let (db, correlator) = setup().await;
        outstanding_prompt(&db, now - Duration::hours(12) + Duration::minutes(1)).await;
        let outcome = correlator
            .handle_inbound_at("+15551230001", "just in time", now)
            .await
            .unwrap();
        assert!(outcome.saved);

        // Exactly 12h: inclusive, still saved.
        let (db, correlator) = setup().await;
        outstanding_prompt(&db, now - Duration::hours(12)).await;
        let outcome = correlator
            .handle_inbound_at("+15551230001", "right on the line", now)
            .await
            .unwrap();
        assert!(outcome.saved);

        // 12h01m: expired.
        let (db, correlator) = setup().await;
        outstanding_prompt(&db, now - Duration::hours(12) - Duration::minutes(1)).await;
        let outcome = correlator
            .handle_inbound_at("+15551230001", "too late", now)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            InboundOutcome::skipped(SkipReason::NoPendingPrompt)
        );
    }

    #[tokio::test]
    async fn test_second_reply_not_saved() {
        let (db, correlator) = setup().await;
        let now = Utc::now();
        outstanding_prompt(&db, now - Duration::hours(1)).await;

        let first = correlator
            .handle_inbound_at("+15551230001", "first reply", now)
            .await
            .unwrap();
        assert!(first.saved);

        let second = correlator
            .handle_inbound_at("+15551230001", "second reply", now)
            .await
            .unwrap();
        assert_eq!(second, InboundOutcome::skipped(SkipReason::NoPendingPrompt));

        let entries = journal::list_entries(db.pool(), "u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "first reply");
    }

    #[tokio::test]
    async fn test_stop_and_start_commands() {
        let (db, correlator) = setup().await;

        let outcome = correlator.handle_inbound("+15551230001", " stop ").await.unwrap();
        assert_eq!(outcome, InboundOutcome::skipped(SkipReason::Stopped));
        assert!(!user::get_user(db.pool(), "u1").await.unwrap().verified);

        let outcome = correlator.handle_inbound("+15551230001", "START").await.unwrap();
        assert_eq!(outcome, InboundOutcome::skipped(SkipReason::Started));
        assert!(user::get_user(db.pool(), "u1").await.unwrap().verified);
    }

    #[tokio::test]
    async fn test_reply_after_stop_not_saved() {
        let (db, correlator) = setup().await;
        let now = Utc::now();
        outstanding_prompt(&db, now - Duration::hours(1)).await;

        correlator
            .handle_inbound_at("+15551230001", "STOP", now)
            .await
            .unwrap();

        // The window nominally still holds, but verified is authoritative.
        let outcome = correlator
            .handle_inbound_at("+15551230001", "wait, one more thought", now)
            .await
            .unwrap();
        assert_eq!(outcome, InboundOutcome::skipped(SkipReason::Unsubscribed));
        assert!(journal::list_entries(db.pool(), "u1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_no_pending_prompt() {
        let (_db, correlator) = setup().await;
        let outcome = correlator
            .handle_inbound("+15551230001", "unprompted thought")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            InboundOutcome::skipped(SkipReason::NoPendingPrompt)
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let saved = serde_json::to_value(InboundOutcome::saved()).unwrap();
        assert_eq!(saved, serde_json::json!({ "saved": true }));

        let skipped =
            serde_json::to_value(InboundOutcome::skipped(SkipReason::NoPendingPrompt)).unwrap();
        assert_eq!(
            skipped,
            serde_json::json!({ "saved": false, "reason": "no_pending_prompt" })
        );
    }
}
