//! In-process adapter for the game repository.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::game::{Game, GameId};
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::repos::games::GameRepository;

/// Keeps each game as its serialized JSON document, so a stored game is
/// always a full round-trip of the aggregate.
#[derive(Debug, Default)]
pub struct InMemoryGameRepository {
    games: DashMap<GameId, String>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn find(&self, game_id: &str) -> Result<Option<Game>, DomainError> {
        let Some(doc) = self.games.get(game_id) else {
            return Ok(None);
        };
        serde_json::from_str(doc.value()).map(Some).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Stored game {game_id} is unreadable: {e}"),
            )
        })
    }

    async fn save(&self, game: &Game) -> Result<(), DomainError> {
        let doc = serde_json::to_string(game).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Storage,
                format!("Failed to serialize game {}: {e}", game.id),
            )
        })?;
        self.games.insert(game.id.clone(), doc);
        Ok(())
    }

    async fn delete(&self, game_id: &str) -> Result<bool, DomainError> {
        Ok(self.games.remove(game_id).is_some())
    }
}
