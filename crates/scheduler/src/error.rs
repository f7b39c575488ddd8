//! Error types for the scheduler.

use thiserror::Error;

/// Errors that can occur in the scheduling core.
///
/// Per-user transient failures (calendar, generation, transport) are caught
/// and degraded where they occur; the variants here are what can still
/// surface to a caller of the engine or correlator.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// A scheduling pass is already in flight.
    #[error("a scheduling pass is already running")]
    PassInProgress,

    /// Outbound transport failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Calendar provider failure.
    #[error("calendar error: {0}")]
    Calendar(String),

    /// Text generation failure.
    #[error("generation error: {0}")]
    Generation(String),
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
