//! Game session service.
//!
//! Ties the engine to a [`GameRepository`] and a [`WordSource`]: starts
//! games, applies guesses and looks games up. Guesses against the same game
//! are serialized through a per-game lock held across load, guess and save,
//! so concurrent requests can never race on the attempt counter or status.

use log::{debug, info, warn};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex as StdMutex, PoisonError},
};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::db::{GameRepository, StoreError};
use crate::game::{
    DEFAULT_MAX_ATTEMPTS, Game, GameError, GameId, GuessOutcome, GuessReason, parse_letter,
};
use crate::words::WordSource;

/// Upper bound on client-chosen attempt limits when none is configured.
pub const DEFAULT_MAX_ALLOWED_ATTEMPTS: u32 = 26;

/// Service errors, grouped into the categories callers report
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Game ID unknown or malformed
    #[error("Game not found with ID: {0}")]
    NotFound(String),

    /// Guess against a won or lost game
    #[error("Game is already over")]
    GameOver,

    /// Guess is not a single letter
    #[error("Input must be a single letter, got {0:?}")]
    InvalidLetter(String),

    /// Missing or out-of-range request field
    #[error("{0}")]
    Validation(String),

    /// Game was saved by someone else between load and save
    #[error("Game {0} was changed by another request, retry the guess")]
    Conflict(String),

    /// Store failure
    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    /// Inconsistent internal state (e.g. a word source produced an unusable word)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<GameError> for ServiceError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::InvalidLetter(input) => Self::InvalidLetter(input),
            GameError::GameOver => Self::GameOver,
            GameError::InvalidMaxAttempts => Self::Validation(err.to_string()),
            GameError::EmptyWord | GameError::InvalidWord(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(id) => Self::Conflict(id.to_string()),
            other => Self::Store(other),
        }
    }
}

impl ServiceError {
    /// Stable category code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "GAME_NOT_FOUND",
            Self::GameOver => "GAME_OVER",
            Self::InvalidLetter(_) => "INVALID_LETTER",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a client-safe error message that doesn't leak storage details
    pub fn client_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Attempt limits applied when starting games
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSettings {
    /// Used when the client does not ask for a limit
    pub default_max_attempts: u32,
    /// Largest limit a client may ask for
    pub max_allowed_attempts: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            default_max_attempts: DEFAULT_MAX_ATTEMPTS,
            max_allowed_attempts: DEFAULT_MAX_ALLOWED_ATTEMPTS,
        }
    }
}

/// Game state after a guess together with what the guess did
#[derive(Clone, Debug)]
pub struct GuessReport {
    pub game: Game,
    pub outcome: GuessOutcome,
}

/// Game session service
pub struct GameService {
    repository: Arc<dyn GameRepository>,
    words: Arc<dyn WordSource>,
    settings: GameSettings,
    /// One lock per game with a guess in flight
    guess_locks: StdMutex<HashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameService {
    pub fn new(
        repository: Arc<dyn GameRepository>,
        words: Arc<dyn WordSource>,
        settings: GameSettings,
    ) -> Self {
        Self {
            repository,
            words,
            settings,
            guess_locks: StdMutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> GameSettings {
        self.settings
    }

    /// Start a new game with a word from the word source.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Attempt limit, or `None` for the configured default
    ///
    /// # Errors
    ///
    /// - `Validation` if `max_attempts` is zero or above the configured ceiling
    /// - `Store` if the game cannot be saved
    pub async fn start_game(&self, max_attempts: Option<u32>) -> ServiceResult<Game> {
        let max_attempts = self.resolve_max_attempts(max_attempts)?;
        let word = self.words.pick_word();
        let game = Game::new(&word, max_attempts)?;

        let game = self.repository.save(game).await?;
        info!(
            "Game created with ID: {}, max attempts: {}",
            game.id(),
            max_attempts
        );
        debug!("Game {} secret word: {}", game.id(), word);

        Ok(game)
    }

    /// Apply a guess to a stored game and persist the result.
    ///
    /// "Already guessed" is a successful outcome, not an error.
    ///
    /// # Errors
    ///
    /// - `Validation` if `id` or `letter` is empty
    /// - `InvalidLetter` if `letter` is not exactly one alphabetic character
    /// - `NotFound` if no game has this ID
    /// - `GameOver` if the game is already won or lost
    /// - `Conflict` if another process saved this game first
    /// - `Store` on persistence failure
    pub async fn guess(&self, id: &str, letter: &str) -> ServiceResult<GuessReport> {
        let game_id = parse_game_id(id)?;
        if letter.is_empty() {
            warn!("Missing letter in guess for game {game_id}");
            return Err(ServiceError::Validation("Letter is required".to_string()));
        }
        let letter = parse_letter(letter).inspect_err(|_| {
            warn!("Invalid letter provided for game {game_id}: {letter:?}");
        })?;

        // Dropping the entry (also on cancellation) cleans up the lock table.
        let entry = self.guess_lock(game_id);
        let _guard = entry.lock.lock().await;
        self.apply_guess(game_id, letter).await
    }

    /// Look up a game.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty ID, `NotFound` for an unknown one.
    pub async fn get_game(&self, id: &str) -> ServiceResult<Game> {
        let game_id = parse_game_id(id)?;
        self.repository
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(game_id.to_string()))
    }

    /// Check that the underlying store is reachable.
    pub async fn health_check(&self) -> ServiceResult<()> {
        self.repository.health_check().await?;
        Ok(())
    }

    async fn apply_guess(&self, id: GameId, letter: char) -> ServiceResult<GuessReport> {
        let Some(mut game) = self.repository.find_by_id(id).await? else {
            warn!("Game not found with ID: {id}");
            return Err(ServiceError::NotFound(id.to_string()));
        };

        if game.is_over() {
            warn!("Game {id} is already over with status: {}", game.status());
            return Err(ServiceError::GameOver);
        }

        let outcome = game.guess(letter)?;
        debug!(
            "Guess result for game {id}: letter={letter}, correct={}, game_over={}, reason={}, remaining={}",
            outcome.correct,
            outcome.game_over,
            outcome.reason.as_str(),
            game.remaining_attempts()
        );

        // Nothing changed; skip the write.
        if outcome.reason == GuessReason::AlreadyGuessed {
            return Ok(GuessReport { game, outcome });
        }

        let game = self.repository.save(game).await.map_err(|e| {
            warn!("Failed to save guess for game {id}: {e}");
            ServiceError::from(e)
        })?;
        if outcome.game_over {
            info!(
                "Game {id} finished: {} after {} failed attempts",
                game.status(),
                game.failed_attempts()
            );
        }

        Ok(GuessReport { game, outcome })
    }

    fn resolve_max_attempts(&self, requested: Option<u32>) -> ServiceResult<u32> {
        let max_attempts = requested.unwrap_or(self.settings.default_max_attempts);
        if max_attempts == 0 || max_attempts > self.settings.max_allowed_attempts {
            return Err(ServiceError::Validation(format!(
                "maxAttempts must be between 1 and {}",
                self.settings.max_allowed_attempts
            )));
        }
        Ok(max_attempts)
    }

    fn guess_lock(&self, id: GameId) -> GuessLockEntry<'_> {
        let lock = self
            .guess_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_default()
            .clone();
        GuessLockEntry {
            locks: &self.guess_locks,
            id,
            lock,
        }
    }

    #[cfg(test)]
    fn pending_guess_locks(&self) -> usize {
        self.guess_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle on one game's guess lock. The table entry is removed when the
/// last handle for that game is dropped.
struct GuessLockEntry<'a> {
    locks: &'a StdMutex<HashMap<GameId, Arc<Mutex<()>>>>,
    id: GameId,
    lock: Arc<Mutex<()>>,
}

impl Drop for GuessLockEntry<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the table and this handle still reference it.
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.id);
        }
    }
}

fn parse_game_id(id: &str) -> ServiceResult<GameId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::Validation("Game ID is required".to_string()));
    }
    GameId::parse_str(id).map_err(|_| ServiceError::NotFound(id.to_string()))
}
