//! Drives a whole match between bots through the regular command path.

use tracing::{debug, warn};

use super::trait_def::AiPlayer;
use crate::domain::game::{GameId, GameStatus, PlayerId};
use crate::domain::round::{FlowState, Round};
use crate::domain::snapshot::GameSnapshot;
use crate::error::AppError;
use crate::protocol::{CommandKind, GameCommand};
use crate::services::GameFlowService;

struct Seat {
    player_id: PlayerId,
    name: String,
    bot: Box<dyn AiPlayer>,
}

pub struct SelfPlay {
    service: GameFlowService,
    game_id: GameId,
    seats: Vec<Seat>,
}

impl SelfPlay {
    pub fn new(service: GameFlowService, game_id: impl Into<GameId>) -> Self {
        Self {
            service,
            game_id: game_id.into(),
            seats: Vec::with_capacity(2),
        }
    }

    pub fn seat(
        mut self,
        player_id: impl Into<PlayerId>,
        name: impl Into<String>,
        bot: Box<dyn AiPlayer>,
    ) -> Self {
        self.seats.push(Seat {
            player_id: player_id.into(),
            name: name.into(),
            bot,
        });
        self
    }

    /// Join every seat, then issue commands until the game finishes.
    ///
    /// Commands rejected because a timeout moved the game first are retried
    /// against the fresh state. Fails after `max_commands` commands.
    pub async fn run(&self, max_commands: usize) -> Result<GameSnapshot, AppError> {
        for seat in &self.seats {
            self.service
                .join_game(&self.game_id, &seat.player_id, &seat.name, None)
                .await?;
        }

        for _ in 0..max_commands {
            let snapshot = self.service.get_snapshot(&self.game_id).await?;
            if snapshot.status == GameStatus::Finished {
                return Ok(snapshot);
            }
            let command = self.next_command(&snapshot)?;
            debug!(game_id = %self.game_id, player_id = %command.player_id, command = command.kind.name(), "Bot acting");

            match self.service.execute(command).await {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {
                    warn!(game_id = %self.game_id, code = %e.code(), "Bot command rejected; retrying");
                }
                Err(e) => return Err(e),
            }
        }
        Err(AppError::internal(format!(
            "Game {} did not finish within {max_commands} commands",
            self.game_id
        )))
    }

    fn next_command(&self, snapshot: &GameSnapshot) -> Result<GameCommand, AppError> {
        if snapshot.status != GameStatus::InProgress {
            return Err(AppError::internal(format!(
                "Game {} is {:?}",
                self.game_id, snapshot.status
            )));
        }
        let Some(round) = &snapshot.current_round else {
            let waiting = self
                .seats
                .iter()
                .find(|s| !snapshot.pending_continue_confirmations.contains(&s.player_id))
                .ok_or_else(|| AppError::internal("Every seat confirmed but no round was dealt"))?;
            return Ok(GameCommand::new(
                self.game_id.clone(),
                waiting.player_id.clone(),
                CommandKind::ConfirmContinue,
            ));
        };

        let seat = self
            .seats
            .iter()
            .find(|s| s.player_id == round.active_player_id)
            .ok_or_else(|| AppError::internal("Active player has no bot"))?;
        let kind = self.choose(seat, round)?;
        Ok(GameCommand::new(
            self.game_id.clone(),
            seat.player_id.clone(),
            kind,
        ))
    }

    fn choose(&self, seat: &Seat, round: &Round) -> Result<CommandKind, AppError> {
        let kind = match round.flow_state {
            FlowState::AwaitingHandPlay => {
                let choice = seat.bot.choose_hand_card(round, &seat.player_id)?;
                CommandKind::PlayHandCard {
                    card_id: choice.card,
                    selected_target: choice.selected_target,
                }
            }
            FlowState::AwaitingSelection => {
                let pending = round
                    .pending_selection
                    .as_ref()
                    .ok_or_else(|| AppError::internal("Selection state without a pending card"))?;
                CommandKind::SelectTarget {
                    source_card_id: pending.source_card,
                    target_card_id: seat.bot.choose_target(round, &pending.possible_targets)?,
                }
            }
            FlowState::AwaitingDecision => CommandKind::MakeDecision {
                decision: seat.bot.choose_decision(round, &seat.player_id)?,
            },
            FlowState::RoundEnded => {
                return Err(AppError::internal("Ended round was not folded into the game"))
            }
        };
        Ok(kind)
    }
}
