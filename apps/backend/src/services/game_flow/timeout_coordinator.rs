use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::mutation::LoadMode;
use super::GameFlowService;
use crate::domain::game::{Game, GameStatus};
use crate::domain::round::ForcedAction;
use crate::error::AppError;
use crate::protocol::GameEvent;

/// A failed forced action is retried this many times, doubling the delay
/// from `RETRY_BASE_DELAY` each attempt.
const MAX_TIMEOUT_RETRIES: u32 = 5;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

impl GameFlowService {
    /// Arm the timer for whatever the game waits on now, or cancel it when
    /// nothing is awaited. Called with the game lock held.
    pub(super) fn rearm_timeout(&self, game: &Game) {
        let delay = match game.status {
            GameStatus::InProgress if game.is_between_rounds() => self.inner.config.display_timeout(),
            GameStatus::InProgress => self.inner.config.action_timeout(),
            GameStatus::Waiting | GameStatus::Finished => None,
        };
        let Some(delay) = delay else {
            self.inner.timeouts.cancel(&game.id);
            return;
        };

        let svc = self.clone();
        let game_id = game.id.clone();
        let marker = game.action_marker;
        self.inner
            .timeouts
            .schedule(&game.id, marker, delay, move || async move {
                svc.on_timeout(game_id, marker, 0).await;
            });
    }

    /// Re-arm a failed timeout with the same marker, unless a command has
    /// armed a newer one meanwhile.
    fn schedule_retry(&self, game_id: &str, marker: u64, attempt: u32) {
        if attempt >= MAX_TIMEOUT_RETRIES {
            error!(game_id, marker, attempts = attempt, "Giving up on timeout");
            return;
        }
        let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
        let svc = self.clone();
        let id = game_id.to_string();
        let armed = self
            .inner
            .timeouts
            .schedule_if_idle(game_id, marker, delay, move || async move {
                svc.on_timeout(id, marker, attempt + 1).await;
            });
        if armed {
            warn!(
                game_id,
                marker,
                attempt = attempt + 1,
                retry_in_ms = delay.as_millis() as u64,
                "Retrying timeout"
            );
        }
    }

    async fn on_timeout(&self, game_id: String, marker: u64, attempt: u32) {
        self.inner.timeouts.clear_fired(&game_id, marker);

        let result = self
            .run_mutation(&game_id, LoadMode::Existing, |svc, game| {
                if game.action_marker != marker {
                    warn!(
                        game_id = %game.id,
                        armed = marker,
                        current = game.action_marker,
                        "Stale timeout ignored"
                    );
                    return Ok(Vec::new());
                }
                svc.apply_forced(game)
            })
            .await;

        match result {
            Ok(events) if events.is_empty() => {}
            Ok(events) => debug!(game_id = %game_id, emitted = events.len(), "Timeout applied"),
            Err(e) => {
                error!(game_id = %game_id, code = %e.code(), error = %e, "Timeout handling failed");
                self.schedule_retry(&game_id, marker, attempt);
            }
        }
    }

    /// The nearest legal default for whatever the game is waiting on.
    fn apply_forced(&self, game: &mut Game) -> Result<Vec<GameEvent>, AppError> {
        if game.status != GameStatus::InProgress {
            return Ok(Vec::new());
        }
        if game.is_between_rounds() {
            info!(game_id = %game.id, "Display timeout expired; dealing next round");
            return self.deal_round(game);
        }

        let Some(action) = game.round()?.forced_action() else {
            return Ok(Vec::new());
        };
        match action {
            ForcedAction::PlayHandCard {
                player_id,
                card,
                selected_target,
            } => {
                info!(game_id = %game.id, player_id = %player_id, card = %card, "Action timeout; playing default card");
                self.apply_hand_play(game, &player_id, card, selected_target)
            }
            ForcedAction::SelectTarget {
                player_id,
                source_card,
                target,
            } => {
                info!(game_id = %game.id, player_id = %player_id, target = %target, "Action timeout; selecting first target");
                self.apply_selection(game, &player_id, source_card, target)
            }
            ForcedAction::MakeDecision {
                player_id,
                decision,
            } => {
                info!(game_id = %game.id, player_id = %player_id, ?decision, "Action timeout; ending round");
                self.apply_decision(game, &player_id, decision)
            }
        }
    }
}
