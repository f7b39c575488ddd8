//! SQLite persistence layer for Jot.
//!
//! This crate provides async database operations for users, journal entries,
//! and the fallback prompt pool using SQLx with SQLite. The user rows carry
//! the per-user delivery state (the outstanding-prompt timestamp and the
//! last prompt's text/title); the transitions on that state are conditional
//! updates so that the scheduler and the reply handler can race safely.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, models::User, user};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:jot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create a user
//!     let user = User {
//!         id: "c27fb365-0c84-4cf2-8555-814bb065e448".to_string(),
//!         phone: "+15551234567".to_string(),
//!         timezone: "America/New_York".to_string(),
//!         daily_send_time: "20:00".to_string(),
//!         send_time_type: "on".to_string(),
//!         verified: true,
//!         google_refresh_token: None,
//!         last_prompt_sent_at: None,
//!         last_prompt_text: None,
//!         last_prompt_title: None,
//!         created_at: String::new(),
//!     };
//!     user::create_user(db.pool(), &user).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod journal;
pub mod models;
pub mod prompt_pool;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{JournalEntry, PoolPrompt, User};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Sized for a scheduling pass fanning out over users while inbound
    /// replies are being handled.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist, or
    /// `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
