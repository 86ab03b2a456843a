//! Game engine error types.

use thiserror::Error;

/// Game engine errors
#[derive(Debug, Clone, Eq, Error, PartialEq)]
pub enum GameError {
    /// Guess input is not exactly one alphabetic character
    #[error("Invalid letter: {0:?} (must be a single letter)")]
    InvalidLetter(String),

    /// Guess submitted against a game that is already won or lost
    #[error("Game is already over")]
    GameOver,

    /// Secret word is empty
    #[error("Secret word must not be empty")]
    EmptyWord,

    /// Secret word contains a non-letter
    #[error("Secret word must only contain letters: {0:?}")]
    InvalidWord(String),

    /// Maximum attempts must be positive
    #[error("Maximum attempts must be greater than 0")]
    InvalidMaxAttempts,
}

/// Result type for game engine operations
pub type GameResult<T> = Result<T, GameError>;
