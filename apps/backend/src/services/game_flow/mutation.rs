use rand::Rng;
use time::OffsetDateTime;
use tracing::{debug, error};

use super::GameFlowService;
use crate::domain::game::Game;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::protocol::{EventEnvelope, GameEvent};

/// Whether a missing game is an error or gets created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LoadMode {
    Existing,
    CreateIfMissing,
}

impl GameFlowService {
    /// Run `mutation` against the stored game under its lock.
    ///
    /// The mutation works on a loaded copy. If it fails, or returns no events,
    /// nothing is saved and nothing is published. Otherwise the events are
    /// sequenced, the game is saved and the events are published, all before
    /// the lock is released. The action marker moves and the timeout is
    /// re-armed only when the game's control point changed: a reconnect or a
    /// partial confirmation leaves the running deadline alone.
    pub(super) async fn run_mutation<F>(
        &self,
        game_id: &str,
        mode: LoadMode,
        mutation: F,
    ) -> Result<Vec<EventEnvelope>, AppError>
    where
        F: FnOnce(&GameFlowService, &mut Game) -> Result<Vec<GameEvent>, AppError>,
    {
        let _guard = self.inner.locks.acquire(game_id).await;

        let mut game = match (self.inner.repo.find(game_id).await?, mode) {
            (Some(game), _) => game,
            (None, LoadMode::CreateIfMissing) => self.new_game(game_id),
            (None, LoadMode::Existing) => return Err(AppError::game_not_found(game_id)),
        };
        let control_before = game.control_point();

        let events = mutation(self, &mut game)?;
        if events.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(round) = &game.current_round {
            if !round.cards_conserved() {
                error!(game_id, round_no = round.round_no, "Card conservation violated");
                return Err(AppError::Internal {
                    code: ErrorCode::DataCorruption,
                    detail: format!("Round {} lost track of its cards", round.round_no),
                });
            }
        }

        let now = OffsetDateTime::now_utc();
        let control_moved = game.control_point() != control_before;
        if control_moved {
            game.action_marker += 1;
        }
        game.touch(now);
        let envelopes: Vec<EventEnvelope> = events
            .into_iter()
            .map(|event| {
                game.event_seq += 1;
                EventEnvelope {
                    game_id: game.id.clone(),
                    seq: game.event_seq,
                    emitted_at: now,
                    event,
                }
            })
            .collect();

        self.inner.repo.save(&game).await?;

        debug!(
            game_id,
            first_seq = envelopes[0].seq,
            last_seq = game.event_seq,
            action_marker = game.action_marker,
            control_moved,
            "Mutation applied"
        );
        self.inner.hub.publish(game_id, &envelopes);
        if control_moved {
            self.rearm_timeout(&game);
        }

        Ok(envelopes)
    }

    fn new_game(&self, game_id: &str) -> Game {
        let seed: u64 = rand::rng().random();
        Game::new(
            game_id,
            self.inner.config.ruleset(),
            seed,
            OffsetDateTime::now_utc(),
        )
    }
}
