//! Game flow orchestration service - bridges the pure domain rules with
//! persistence, event fan-out and action timeouts.
//!
//! Every state change goes through `run_mutation`: lock the game, load it,
//! apply the domain change, persist, publish, re-arm the timeout, unlock.

mod mutation;
mod player_actions;
mod round_lifecycle;
mod seats;
mod timeout_coordinator;

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::adapters::InMemoryGameRepository;
use crate::config::EngineConfig;
use crate::domain::snapshot::GameSnapshot;
use crate::error::AppError;
use crate::protocol::{CommandKind, EventEnvelope, GameCommand};
use crate::realtime::{GameEventHub, Subscription};
use crate::repos::GameRepository;
use crate::services::deck_provider::{DeckProvider, ShuffledDeckProvider};
use crate::services::game_locks::GameLockRegistry;
use crate::services::timeouts::TimeoutManager;

pub use seats::JoinResult;

struct Inner {
    repo: Arc<dyn GameRepository>,
    hub: Arc<GameEventHub>,
    decks: Arc<dyn DeckProvider>,
    locks: GameLockRegistry,
    timeouts: TimeoutManager,
    config: EngineConfig,
}

/// Cheap to clone; clones share the same games, locks and timers.
#[derive(Clone)]
pub struct GameFlowService {
    inner: Arc<Inner>,
}

impl GameFlowService {
    pub fn new(
        repo: Arc<dyn GameRepository>,
        hub: Arc<GameEventHub>,
        decks: Arc<dyn DeckProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                repo,
                hub,
                decks,
                locks: GameLockRegistry::new(),
                timeouts: TimeoutManager::new(),
                config,
            }),
        }
    }

    /// In-memory storage and seeded decks.
    pub fn in_memory(config: EngineConfig) -> Self {
        let decks = ShuffledDeckProvider::new(config.deterministic_deck);
        Self::new(
            Arc::new(InMemoryGameRepository::new()),
            Arc::new(GameEventHub::new()),
            Arc::new(decks),
            config,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn hub(&self) -> &Arc<GameEventHub> {
        &self.inner.hub
    }

    pub fn subscribe(&self, game_id: &str) -> Subscription {
        self.inner.hub.subscribe(game_id)
    }

    /// Marker of the armed timeout for `game_id`, if any.
    pub fn pending_timeout(&self, game_id: &str) -> Option<u64> {
        self.inner.timeouts.pending_marker(game_id)
    }

    /// Current aggregate for a late or rejoining subscriber. Never mutates.
    pub async fn get_snapshot(&self, game_id: &str) -> Result<GameSnapshot, AppError> {
        let game = self
            .inner
            .repo
            .find(game_id)
            .await?
            .ok_or_else(|| AppError::game_not_found(game_id))?;
        Ok(GameSnapshot::from_game(&game))
    }

    /// Dispatch one command. On success the returned events have already been
    /// persisted and published.
    pub async fn execute(&self, command: GameCommand) -> Result<Vec<EventEnvelope>, AppError> {
        let GameCommand {
            game_id,
            player_id,
            kind,
        } = command;
        let command_name = kind.name();
        debug!(game_id = %game_id, player_id = %player_id, command = command_name, "Executing command");

        let result = match kind {
            CommandKind::JoinGame {
                player_name,
                session_token,
            } => self
                .join_game(&game_id, &player_id, &player_name, session_token)
                .await
                .map(|joined| joined.events),
            CommandKind::PlayHandCard {
                card_id,
                selected_target,
            } => {
                self.play_hand_card(&game_id, &player_id, card_id, selected_target)
                    .await
            }
            CommandKind::SelectTarget {
                source_card_id,
                target_card_id,
            } => {
                self.select_target(&game_id, &player_id, source_card_id, target_card_id)
                    .await
            }
            CommandKind::MakeDecision { decision } => {
                self.make_decision(&game_id, &player_id, decision).await
            }
            CommandKind::ConfirmContinue => self.confirm_continue(&game_id, &player_id).await,
            CommandKind::LeaveGame => self.leave_game(&game_id, &player_id).await,
        };

        if let Err(e) = &result {
            if e.is_recoverable() {
                warn!(
                    game_id = %game_id,
                    player_id = %player_id,
                    command = command_name,
                    code = %e.code(),
                    error = %e,
                    "Command rejected"
                );
            } else {
                error!(
                    game_id = %game_id,
                    player_id = %player_id,
                    command = command_name,
                    code = %e.code(),
                    error = %e,
                    "Command failed"
                );
            }
        }
        result
    }
}
