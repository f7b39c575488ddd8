//! User CRUD and delivery-state operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;

const USER_COLUMNS: &str = "id, phone, timezone, daily_send_time, send_time_type, verified, \
     google_refresh_token, last_prompt_sent_at, last_prompt_text, last_prompt_title, created_at";

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, phone, timezone, daily_send_time, send_time_type,
                           verified, google_refresh_token)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.phone)
    .bind(&user.timezone)
    .bind(&user.daily_send_time)
    .bind(&user.send_time_type)
    .bind(user.verified)
    .bind(&user.google_refresh_token)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Get a user by phone number (expects the canonical E.164 form).
pub async fn get_user_by_phone(pool: &SqlitePool, phone: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE phone = ?"
    ))
    .bind(phone)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Update a user's profile and schedule configuration.
///
/// Delivery-state fields are not touched here; they have their own
/// conditional transitions below.
pub async fn update_user(pool: &SqlitePool, user: &User) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET phone = ?, timezone = ?, daily_send_time = ?, send_time_type = ?,
            verified = ?, google_refresh_token = ?
        WHERE id = ?
        "#,
    )
    .bind(&user.phone)
    .bind(&user.timezone)
    .bind(&user.daily_send_time)
    .bind(&user.send_time_type)
    .bind(user.verified)
    .bind(&user.google_refresh_token)
    .bind(&user.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: user.id.clone(),
        });
    }

    Ok(())
}

/// Delete a user by ID.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// List users eligible for scheduling (verified phone numbers only).
pub async fn list_verified_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE verified = 1 ORDER BY created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Set a user's verified flag (STOP / START handling).
pub async fn set_verified(pool: &SqlitePool, id: &str, verified: bool) -> Result<()> {
    let result = sqlx::query("UPDATE users SET verified = ? WHERE id = ?")
        .bind(verified)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Record a sent prompt, conditionally on the previously observed state.
///
/// The update only applies while `last_prompt_sent_at` still holds
/// `expected_prev` (NULL-safe via `IS`), so a scheduler racing a correlator
/// or a second pass detects the lost race instead of silently overwriting.
/// Returns `true` if this caller won the update.
pub async fn mark_prompt_sent(
    pool: &SqlitePool,
    id: &str,
    expected_prev: Option<&str>,
    sent_at: &str,
    prompt_text: &str,
    prompt_title: &str,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET last_prompt_sent_at = ?, last_prompt_text = ?, last_prompt_title = ?
        WHERE id = ? AND last_prompt_sent_at IS ?
        "#,
    )
    .bind(sent_at)
    .bind(prompt_text)
    .bind(prompt_title)
    .bind(id)
    .bind(expected_prev)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    fn test_user(id: &str, phone: &str) -> User {
        User {
            id: id.to_string(),
            phone: phone.to_string(),
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

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_user_crud() {
        let db = test_db().await;

        let user = test_user("u1", "+15551230001");
        create_user(db.pool(), &user).await.unwrap();

        let fetched = get_user(db.pool(), "u1").await.unwrap();
        assert_eq!(fetched.phone, "+15551230001");
        assert!(fetched.verified);
        assert!(fetched.last_prompt_sent_at.is_none());

        let updated = User {
            timezone: "Europe/Berlin".to_string(),
            ..fetched.clone()
        };
        update_user(db.pool(), &updated).await.unwrap();
        let fetched = get_user(db.pool(), "u1").await.unwrap();
        assert_eq!(fetched.timezone, "Europe/Berlin");

        delete_user(db.pool(), "u1").await.unwrap();
        let result = get_user(db.pool(), "u1").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let db = test_db().await;

        create_user(db.pool(), &test_user("u1", "+15551230001"))
            .await
            .unwrap();
        let result = create_user(db.pool(), &test_user("u2", "+15551230001")).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_verified_users_filters() {
        let db = test_db().await;

        create_user(db.pool(), &test_user("u1", "+15551230001"))
            .await
            .unwrap();
        let unverified = User {
            verified: false,
            ..test_user("u2", "+15551230002")
        };
        create_user(db.pool(), &unverified).await.unwrap();

        let verified = list_verified_users(db.pool()).await.unwrap();
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].id, "u1");
    }

    #[tokio::test]
    async fn test_mark_prompt_sent_is_conditional() {
        let db = test_db().await;
        create_user(db.pool(), &test_user("u1", "+15551230001"))
            .await
            .unwrap();

        // First writer wins against the observed NULL state.
        let won = mark_prompt_sent(
            db.pool(),
            "u1",
            None,
            "2026-08-29T12:00:00Z",
            "How was today?",
            "Today",
        )
        .await
        .unwrap();
        assert!(won);

        // A second writer still holding the stale NULL observation loses.
        let won = mark_prompt_sent(
            db.pool(),
            "u1",
            None,
            "2026-08-29T12:01:00Z",
            "Other prompt",
            "Other",
        )
        .await
        .unwrap();
        assert!(!won);

        let user = get_user(db.pool(), "u1").await.unwrap();
        assert_eq!(
            user.last_prompt_sent_at.as_deref(),
            Some("2026-08-29T12:00:00Z")
        );
        assert_eq!(user.last_prompt_text.as_deref(), Some("How was today?"));
        assert_eq!(user.last_prompt_title.as_deref(), Some("Today"));
    }

    #[tokio::test]
    async fn test_set_verified() {
        let db = test_db().await;
        create_user(db.pool(), &test_user("u1", "+15551230001"))
            .await
            .unwrap();

        set_verified(db.pool(), "u1", false).await.unwrap();
        assert!(!get_user(db.pool(), "u1").await.unwrap().verified);

        set_verified(db.pool(), "u1", true).await.unwrap();
        assert!(get_user(db.pool(), "u1").await.unwrap().verified);
    }
}
