//! In-memory game store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::repository::GameRepository;
use crate::game::{Game, GameId};

/// Game store backed by a `HashMap`. Games live as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<GameId, Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored games
    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn save(&self, game: Game) -> StoreResult<Game> {
        let mut games = self.games.write().await;
        if let Some(stored) = games.get(&game.id()) {
            if stored.guessed_letters().len() + 1 != game.guessed_letters().len() {
                return Err(StoreError::Conflict(game.id()));
            }
        }
        games.insert(game.id(), game.clone());
        Ok(game)
    }

    async fn find_by_id(&self, id: GameId) -> StoreResult<Option<Game>> {
        Ok(self.games.read().await.get(&id).cloned())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;

    #[tokio::test]
    async fn test_save_then_find() {
        let repo = InMemoryGameRepository::new();
        let game = Game::new("HAUS", 6).unwrap();
        let id = game.id();

        repo.save(game.clone()).await.unwrap();
        assert_eq!(repo.find_by_id(id).await.unwrap(), Some(game));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let repo = InMemoryGameRepository::new();
        let mut game = Game::new("HAUS", 1).unwrap();
        repo.save(game.clone()).await.unwrap();

        game.guess('Z').unwrap();
        repo.save(game.clone()).await.unwrap();

        let stored = repo.find_by_id(game.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), GameStatus::Lost);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let repo = InMemoryGameRepository::new();
        let game = Game::new("HAUS", 6).unwrap();
        repo.save(game.clone()).await.unwrap();

        // Two writers start from the same stored state
        let mut first = game.clone();
        let mut second = game;
        first.guess('H').unwrap();
        second.guess('X').unwrap();

        repo.save(first.clone()).await.unwrap();
        let err = repo.save(second).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == first.id()));

        let stored = repo.find_by_id(first.id()).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_resave_unchanged_game_conflicts() {
        let repo = InMemoryGameRepository::new();
        let game = Game::new("HAUS", 6).unwrap();
        repo.save(game.clone()).await.unwrap();

        assert!(matches!(
            repo.save(game).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_game() {
        let repo = InMemoryGameRepository::new();
        assert!(repo.find_by_id(GameId::new_v4()).await.unwrap().is_none());
        assert!(repo.is_empty().await);
        repo.health_check().await.unwrap();
    }
}
