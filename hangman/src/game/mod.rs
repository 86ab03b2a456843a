//! Hangman game engine.
//!
//! This module provides the synchronous core of the server:
//! - [`Game`] state machine (create, guess, render)
//! - Accent-aware letter matching in [`letters`]
//! - Engine error types
//!
//! The engine performs no I/O and holds no shared state. Callers load a
//! game, apply a guess and persist the result.

pub mod engine;
pub mod errors;
pub mod letters;

pub use engine::{
    DEFAULT_MAX_ATTEMPTS, Game, GameId, GameStatus, GuessOutcome, GuessReason, PLACEHOLDER,
    SEPARATOR,
};
pub use errors::{GameError, GameResult};
pub use letters::{EQUIVALENCE_CLASSES, equivalence_key, letters_match, parse_letter};
