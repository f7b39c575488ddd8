//! Static fallback prompt pool.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::PoolPrompt;

/// List all pool prompts.
pub async fn list_prompts(pool: &SqlitePool) -> Result<Vec<PoolPrompt>> {
    let prompts = sqlx::query_as::<_, PoolPrompt>(
        "SELECT id, prompt_text FROM prompt_pool ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(prompts)
}

/// Add a prompt to the pool.
pub async fn add_prompt(pool: &SqlitePool, prompt_text: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO prompt_pool (prompt_text) VALUES (?)")
        .bind(prompt_text)
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Remove a prompt from the pool.
pub async fn remove_prompt(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM prompt_pool WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_pool_is_seeded_and_editable() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let seeded = list_prompts(db.pool()).await.unwrap();
        assert!(!seeded.is_empty());

        let id = add_prompt(db.pool(), "What made you laugh today?")
            .await
            .unwrap();
        let prompts = list_prompts(db.pool()).await.unwrap();
        assert_eq!(prompts.len(), seeded.len() + 1);

        remove_prompt(db.pool(), id).await.unwrap();
        let prompts = list_prompts(db.pool()).await.unwrap();
        assert_eq!(prompts.len(), seeded.len());
    }
}
