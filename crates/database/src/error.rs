//! Error types shared by the persistence modules.

use thiserror::Error;

/// Errors surfaced by the persistence layer.
///
/// `NotFound` and `AlreadyExists` are domain outcomes (missing user,
/// duplicate phone number) rather than transport failures; callers match
/// on them. Everything else wraps the underlying SQLx error.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying SQLx failure (connection, pool, malformed query).
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failure at startup.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The requested row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness constraint rejected the write (duplicate user id or
    /// phone number).
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

/// Result alias for persistence operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
