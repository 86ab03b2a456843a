//! Game store error types.

use thiserror::Error;

use crate::game::GameId;

/// Game store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored game violates the engine's invariants
    #[error("Corrupt game record: {0}")]
    CorruptRecord(String),

    /// The stored game moved on since it was loaded
    #[error("Game {0} was modified concurrently")]
    Conflict(GameId),
}

/// Result type for game store operations
pub type StoreResult<T> = Result<T, StoreError>;
