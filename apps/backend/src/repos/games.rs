//! Game repository port.

use async_trait::async_trait;

use crate::domain::game::Game;
use crate::errors::domain::DomainError;

/// Persistence for whole `Game` aggregates.
///
/// Callers serialize access per game id; implementations only need to be
/// safe for concurrent use across different games.
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn find(&self, game_id: &str) -> Result<Option<Game>, DomainError>;

    /// Insert or replace.
    async fn save(&self, game: &Game) -> Result<(), DomainError>;

    /// Returns whether a game was removed.
    async fn delete(&self, game_id: &str) -> Result<bool, DomainError>;
}
