//! # Hangman
//!
//! A hangman game engine with accent-aware letter matching, plus the
//! storage and session plumbing needed to run it behind a server.
//!
//! ## Architecture
//!
//! A game moves through three states:
//!
//! - **Active**: accepting guesses
//! - **Won**: every position revealed
//! - **Lost**: attempts exhausted, word revealed
//!
//! Letters match by equivalence class, so guessing `A` also reveals `Ä`
//! (likewise `O`/`Ö` and `U`/`Ü`).
//!
//! ## Core Modules
//!
//! - [`game`]: Game state machine and letter matching
//! - [`words`]: Word sources for new games
//! - [`db`]: Game store trait with in-memory and PostgreSQL backends
//! - [`service`]: Session operations (start, guess, query) with per-game locking
//!
//! ## Example
//!
//! ```
//! use hangman::{Game, GameStatus};
//!
//! let mut game = Game::new("CAT", 6).unwrap();
//! game.guess('c').unwrap();
//! assert_eq!(game.masked_word(), "C _ _");
//! assert_eq!(game.status(), GameStatus::Active);
//! ```

/// Core game logic and state machine.
pub mod game;
pub use game::{
    DEFAULT_MAX_ATTEMPTS, Game, GameError, GameId, GameResult, GameStatus, GuessOutcome,
    GuessReason,
};

/// Game persistence.
pub mod db;

/// Session orchestration over the engine, store and word source.
pub mod service;
pub use service::{GameService, GameSettings, GuessReport, ServiceError, ServiceResult};

/// Word sources.
pub mod words;
pub use words::{FixedWord, WordList, WordSource};
