//! Hangman game state machine.
//!
//! A [`Game`] is a plain value. Every state transition goes through
//! [`Game::guess`]; persisting the mutated value is the caller's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use uuid::Uuid;

use super::errors::{GameError, GameResult};
use super::letters::{letters_match, to_upper};

/// Unique game identifier
pub type GameId = Uuid;

/// Attempts allowed when the caller does not choose a limit.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Shown in place of a letter that has not been revealed yet.
pub const PLACEHOLDER: char = '_';

/// Inserted between positions of a masked word.
pub const SEPARATOR: char = ' ';

/// Lifecycle of a game. `Won` and `Lost` are terminal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

impl GameStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Won => "WON",
            Self::Lost => "LOST",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "WON" => Ok(Self::Won),
            "LOST" => Ok(Self::Lost),
            other => Err(format!("unknown game status {other:?}")),
        }
    }
}

/// Why a guess produced the outcome it did
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuessReason {
    Correct,
    Wrong,
    AlreadyGuessed,
    Won,
    Lost,
}

impl GuessReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
            Self::AlreadyGuessed => "already_guessed",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

/// Result of a single accepted guess.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GuessOutcome {
    pub correct: bool,
    pub game_over: bool,
    pub reason: GuessReason,
}

impl GuessOutcome {
    #[must_use]
    pub const fn from_reason(reason: GuessReason) -> Self {
        let (correct, game_over) = match reason {
            GuessReason::Correct => (true, false),
            GuessReason::Won => (true, true),
            GuessReason::Wrong | GuessReason::AlreadyGuessed => (false, false),
            GuessReason::Lost => (false, true),
        };
        Self {
            correct,
            game_over,
            reason,
        }
    }

    /// Player-facing description of the outcome
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self.reason {
            GuessReason::Correct => "Correct guess!",
            GuessReason::Wrong => "Wrong guess. Try again!",
            GuessReason::AlreadyGuessed => "Letter already guessed",
            GuessReason::Won => "Correct! You won!",
            GuessReason::Lost => "Game over! You lost!",
        }
    }
}

/// Raw field values of a stored game, used to rebuild a [`Game`].
#[derive(Debug)]
pub(crate) struct GameParts {
    pub id: GameId,
    pub secret_word: Vec<char>,
    pub revealed: Vec<bool>,
    pub guessed_letters: BTreeSet<char>,
    pub failed_attempts: u32,
    pub max_attempts: u32,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

/// A single hangman game.
#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    id: GameId,
    secret_word: Vec<char>,
    /// One flag per position of `secret_word`.
    revealed: Vec<bool>,
    guessed_letters: BTreeSet<char>,
    failed_attempts: u32,
    max_attempts: u32,
    status: GameStatus,
    created_at: DateTime<Utc>,
}

impl Game {
    /// Create a new active game with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Fails if `secret_word` is empty or contains non-letters, or if
    /// `max_attempts` is zero.
    pub fn new(secret_word: &str, max_attempts: u32) -> GameResult<Self> {
        Self::with_id(Uuid::new_v4(), secret_word, max_attempts)
    }

    /// Create a new active game with a caller-chosen identifier.
    ///
    /// # Errors
    ///
    /// Same as [`Game::new`].
    pub fn with_id(id: GameId, secret_word: &str, max_attempts: u32) -> GameResult<Self> {
        if secret_word.is_empty() {
            return Err(GameError::EmptyWord);
        }
        if !secret_word.chars().all(char::is_alphabetic) {
            return Err(GameError::InvalidWord(secret_word.to_string()));
        }
        if max_attempts == 0 {
            return Err(GameError::InvalidMaxAttempts);
        }

        let secret_word: Vec<char> = secret_word.chars().map(to_upper).collect();
        let revealed = vec![false; secret_word.len()];

        Ok(Self {
            id,
            secret_word,
            revealed,
            guessed_letters: BTreeSet::new(),
            failed_attempts: 0,
            max_attempts,
            status: GameStatus::Active,
            created_at: Utc::now(),
        })
    }

    pub(crate) fn from_parts(parts: GameParts) -> Self {
        Self {
            id: parts.id,
            secret_word: parts.secret_word,
            revealed: parts.revealed,
            guessed_letters: parts.guessed_letters,
            failed_attempts: parts.failed_attempts,
            max_attempts: parts.max_attempts,
            status: parts.status,
            created_at: parts.created_at,
        }
    }

    /// Apply a letter guess.
    ///
    /// Every check runs before the first mutation, so an `Err` leaves the
    /// game untouched. Guessing a letter twice is not an error; it yields
    /// [`GuessReason::AlreadyGuessed`] without changing state.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameOver`] if the game is already won or lost
    /// - [`GameError::InvalidLetter`] if `letter` is not alphabetic
    pub fn guess(&mut self, letter: char) -> GameResult<GuessOutcome> {
        if self.status.is_terminal() {
            return Err(GameError::GameOver);
        }
        if !letter.is_alphabetic() {
            return Err(GameError::InvalidLetter(letter.to_string()));
        }

        let letter = to_upper(letter);
        if !self.guessed_letters.insert(letter) {
            return Ok(GuessOutcome::from_reason(GuessReason::AlreadyGuessed));
        }

        let mut matched = false;
        for (secret, revealed) in self.secret_word.iter().zip(self.revealed.iter_mut()) {
            if letters_match(*secret, letter) {
                *revealed = true;
                matched = true;
            }
        }

        let reason = if matched {
            if self.revealed.iter().all(|r| *r) {
                self.status = GameStatus::Won;
                GuessReason::Won
            } else {
                GuessReason::Correct
            }
        } else {
            self.failed_attempts += 1;
            if self.failed_attempts >= self.max_attempts {
                self.status = GameStatus::Lost;
                self.revealed.fill(true);
                GuessReason::Lost
            } else {
                GuessReason::Wrong
            }
        };

        Ok(GuessOutcome::from_reason(reason))
    }

    /// Current display form, e.g. `"_ A _"`. A lost game shows the whole
    /// word without separators.
    #[must_use]
    pub fn masked_word(&self) -> String {
        if self.status == GameStatus::Lost {
            return self.secret_word();
        }

        let mut masked = String::with_capacity(self.secret_word.len() * 2);
        for (i, (secret, revealed)) in self.secret_word.iter().zip(&self.revealed).enumerate() {
            if i > 0 {
                masked.push(SEPARATOR);
            }
            masked.push(if *revealed { *secret } else { PLACEHOLDER });
        }
        masked
    }

    /// Revealed letters concatenated, with placeholders for hidden positions
    /// and no separators.
    #[must_use]
    pub fn reconstructed_word(&self) -> String {
        self.secret_word
            .iter()
            .zip(&self.revealed)
            .map(|(secret, revealed)| if *revealed { *secret } else { PLACEHOLDER })
            .collect()
    }

    #[must_use]
    pub const fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn secret_word(&self) -> String {
        self.secret_word.iter().collect()
    }

    #[must_use]
    pub fn revealed(&self) -> &[bool] {
        &self.revealed
    }

    #[must_use]
    pub const fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    #[must_use]
    pub const fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn remaining_attempts(&self) -> u32 {
        self.max_attempts.saturating_sub(self.failed_attempts)
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
