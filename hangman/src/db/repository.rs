//! Game store abstraction and its PostgreSQL implementation.
//!
//! The service only talks to [`GameRepository`], so storage can be swapped
//! (see [`InMemoryGameRepository`](super::memory::InMemoryGameRepository))
//! without touching game logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::BTreeSet;

use super::errors::{StoreError, StoreResult};
use crate::game::{
    Game, GameId, GameStatus,
    engine::GameParts,
};

/// Schema for the `games` table
pub const GAMES_SCHEMA: &str = include_str!("../../migrations/001_create_games.sql");

/// Trait for game persistence
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Insert a game, or replace the stored one with its next state.
    ///
    /// Every persisted guess adds exactly one letter, so a replacement must
    /// carry one more guessed letter than the stored game. Anything else
    /// means another writer got there first and fails with
    /// [`StoreError::Conflict`]. This keeps guesses serialized even when
    /// several server processes share one database.
    async fn save(&self, game: Game) -> StoreResult<Game>;

    /// Find game by ID
    async fn find_by_id(&self, id: GameId) -> StoreResult<Option<Game>>;

    /// Check that the store is reachable
    async fn health_check(&self) -> StoreResult<()>;
}

/// PostgreSQL implementation of `GameRepository`
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `games` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(GAMES_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl GameRepository for PgGameRepository {
    async fn save(&self, game: Game) -> StoreResult<Game> {
        let failed_attempts = to_db_int(game.failed_attempts(), "failed_attempts")?;
        let max_attempts = to_db_int(game.max_attempts(), "max_attempts")?;
        let guessed_letters: String = game.guessed_letters().iter().collect();

        let result = sqlx::query(
            r#"
            INSERT INTO games (game_id, secret_word, revealed, guessed_letters,
                               failed_attempts, max_attempts, game_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            ON CONFLICT (game_id) DO UPDATE SET
                revealed = EXCLUDED.revealed,
                guessed_letters = EXCLUDED.guessed_letters,
                failed_attempts = EXCLUDED.failed_attempts,
                game_status = EXCLUDED.game_status,
                updated_at = NOW()
            WHERE char_length(games.guessed_letters) + 1 = char_length(EXCLUDED.guessed_letters)
            "#,
        )
        .bind(game.id())
        .bind(game.secret_word())
        .bind(game.revealed().to_vec())
        .bind(guessed_letters)
        .bind(failed_attempts)
        .bind(max_attempts)
        .bind(game.status().as_str())
        .bind(game.created_at())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(game.id()));
        }
        Ok(game)
    }

    async fn find_by_id(&self, id: GameId) -> StoreResult<Option<Game>> {
        let row = sqlx::query(
            "SELECT game_id, secret_word, revealed, guessed_letters, failed_attempts,
                    max_attempts, game_status, created_at
             FROM games WHERE game_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_to_game(&r)).transpose()
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn to_db_int(value: u32, column: &str) -> StoreResult<i32> {
    i32::try_from(value)
        .map_err(|_| StoreError::CorruptRecord(format!("{column} out of range: {value}")))
}

fn from_db_int(value: i32, column: &str) -> StoreResult<u32> {
    u32::try_from(value)
        .map_err(|_| StoreError::CorruptRecord(format!("{column} is negative: {value}")))
}

fn row_to_game(row: &PgRow) -> StoreResult<Game> {
    let id: GameId = row.try_get("game_id")?;
    let secret_word: String = row.try_get("secret_word")?;
    let revealed: Vec<bool> = row.try_get("revealed")?;
    let guessed_letters: String = row.try_get("guessed_letters")?;
    let failed_attempts = from_db_int(row.try_get("failed_attempts")?, "failed_attempts")?;
    let max_attempts = from_db_int(row.try_get("max_attempts")?, "max_attempts")?;
    let status: String = row.try_get("game_status")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    let secret_word: Vec<char> = secret_word.chars().collect();
    let status: GameStatus = status
        .parse()
        .map_err(|e: String| StoreError::CorruptRecord(format!("game {id}: {e}")))?;

    let parts = GameParts {
        id,
        secret_word,
        revealed,
        guessed_letters: guessed_letters.chars().collect::<BTreeSet<char>>(),
        failed_attempts,
        max_attempts,
        status,
        created_at,
    };
    check_consistency(&parts)?;
    Ok(Game::from_parts(parts))
}

/// Reject records no sequence of guesses could have produced.
fn check_consistency(parts: &GameParts) -> StoreResult<()> {
    let id = parts.id;
    let corrupt = |reason: String| -> StoreResult<()> {
        Err(StoreError::CorruptRecord(format!("game {id}: {reason}")))
    };

    if parts.secret_word.is_empty() || parts.secret_word.len() != parts.revealed.len() {
        return corrupt(format!(
            "{} letters but {} reveal flags",
            parts.secret_word.len(),
            parts.revealed.len()
        ));
    }
    if parts.max_attempts == 0 || parts.failed_attempts > parts.max_attempts {
        return corrupt(format!(
            "{} of {} attempts",
            parts.failed_attempts, parts.max_attempts
        ));
    }

    let all_revealed = parts.revealed.iter().all(|r| *r);
    match parts.status {
        GameStatus::Active if parts.failed_attempts == parts.max_attempts => {
            corrupt("active with no attempts left".to_string())
        }
        GameStatus::Active if all_revealed => {
            corrupt("active with every letter revealed".to_string())
        }
        GameStatus::Won | GameStatus::Lost if !all_revealed => {
            corrupt(format!("{} with hidden letters", parts.status))
        }
        _ => Ok(()),
    }
}
