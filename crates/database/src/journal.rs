//! Journal entry writes and reads.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::Result;
use crate::models::JournalEntry;

/// Save a reply as a journal entry, claiming the outstanding prompt.
///
/// Runs as one transaction: first a conditional clear of
/// `last_prompt_sent_at` keyed on the value the caller observed, then the
/// entry insert. If the clear misses (another reply already claimed the
/// prompt), nothing is written and `false` is returned; only the first
/// reply per outstanding prompt is saved.
///
/// The prompt text/title columns are left in place for display history.
pub async fn save_reply(
    pool: &SqlitePool,
    user_id: &str,
    content: &str,
    observed_sent_at: &str,
    prompt_text: Option<&str>,
    prompt_title: Option<&str>,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        r#"
        UPDATE users
        SET last_prompt_sent_at = NULL
        WHERE id = ? AND last_prompt_sent_at = ?
        "#,
    )
    .bind(user_id)
    .bind(observed_sent_at)
    .execute(&mut *tx)
    .await?;

    if claimed.rows_affected() == 0 {
        debug!(user_id, "prompt already claimed, dropping reply");
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO journal_entries (user_id, content, source, prompt_text, prompt_title)
        VALUES (?, ?, 'sms', ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(content)
    .bind(prompt_text)
    .bind(prompt_title)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// List a user's journal entries, newest first.
pub async fn list_entries(pool: &SqlitePool, user_id: &str) -> Result<Vec<JournalEntry>> {
    let entries = sqlx::query_as::<_, JournalEntry>(
        r#"
        SELECT id, user_id, content, source, prompt_text, prompt_title, created_at
        FROM journal_entries
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Count a user's journal entries.
pub async fn count_entries(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM journal_entries WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::{user, Database};

    async fn seeded_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let u = User {
            id: "u1".to_string(),
            phone: "+15551230001".to_string(),
            timezone: "UTC".to_string(),
            daily_send_time: "20:00".to_string(),
            send_time_type: "on".to_string(),
            verified: true,
            google_refresh_token: None,
            last_prompt_sent_at: None,
            last_prompt_text: None,
            last_prompt_title: None,
            created_at: String::new(),
        };
        user::create_user(db.pool(), &u).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_save_reply_claims_prompt_once() {
        let db = seeded_db().await;
        let sent_at = "2026-08-29T12:00:00Z";
        user::mark_prompt_sent(db.pool(), "u1", None, sent_at, "How was today?", "Today")
            .await
            .unwrap();

        let saved = save_reply(
            db.pool(),
            "u1",
            "It was good.",
            sent_at,
            Some("How was today?"),
            Some("Today"),
        )
        .await
        .unwrap();
        assert!(saved);

        // Second reply against the same (now-cleared) prompt is dropped.
        let saved = save_reply(
            db.pool(),
            "u1",
            "One more thing...",
            sent_at,
            Some("How was today?"),
            Some("Today"),
        )
        .await
        .unwrap();
        assert!(!saved);

        let entries = list_entries(db.pool(), "u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content, "It was good.");
        assert_eq!(entries[0].source, "sms");
        assert_eq!(entries[0].prompt_text.as_deref(), Some("How was today?"));
        assert_eq!(entries[0].prompt_title.as_deref(), Some("Today"));

        // Text and title remain for display; only the timestamp is cleared.
        let u = user::get_user(db.pool(), "u1").await.unwrap();
        assert!(u.last_prompt_sent_at.is_none());
        assert_eq!(u.last_prompt_text.as_deref(), Some("How was today?"));
    }

    #[tokio::test]
    async fn test_save_reply_requires_matching_observation() {
        let db = seeded_db().await;
        user::mark_prompt_sent(
            db.pool(),
            "u1",
            None,
            "2026-08-29T12:00:00Z",
            "Prompt",
            "Title",
        )
        .await
        .unwrap();

        // Stale observation (wrong timestamp) cannot claim.
        let saved = save_reply(db.pool(), "u1", "hi", "2026-08-28T12:00:00Z", None, None)
            .await
            .unwrap();
        assert!(!saved);
        assert_eq!(count_entries(db.pool(), "u1").await.unwrap(), 0);
    }
}
