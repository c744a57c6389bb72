use tracing::info;
use uuid::Uuid;

use super::mutation::LoadMode;
use super::GameFlowService;
use crate::domain::game::{ConnectionStatus, Game, GameStatus, Player};
use crate::domain::game_transition::{transition_after_player_leave, GameTransition};
use crate::domain::snapshot::GameSnapshot;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::protocol::{EventEnvelope, GameEvent};

/// Outcome of a successful join.
#[derive(Debug, Clone)]
pub struct JoinResult {
    /// Token the client must present to rejoin this seat.
    pub session_token: String,
    pub events: Vec<EventEnvelope>,
}

impl GameFlowService {
    /// Take a seat, creating the game if needed, or rejoin a held seat.
    ///
    /// The second seat starts the game and deals round 1.
    pub async fn join_game(
        &self,
        game_id: &str,
        player_id: &str,
        player_name: &str,
        session_token: Option<String>,
    ) -> Result<JoinResult, AppError> {
        if game_id.trim().is_empty() || player_id.trim().is_empty() {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "game_id and player_id are required",
            ));
        }
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "player_name must not be empty",
            ));
        }

        let mut issued_token = String::new();
        let events = self
            .run_mutation(game_id, LoadMode::CreateIfMissing, |svc, game| {
                let (token, events) = svc.seat_player(game, player_id, player_name, session_token)?;
                issued_token = token;
                Ok(events)
            })
            .await?;

        Ok(JoinResult {
            session_token: issued_token,
            events,
        })
    }

    /// Give up the seat. The opponent, if any, wins.
    pub async fn leave_game(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Vec<EventEnvelope>, AppError> {
        self.run_mutation(game_id, LoadMode::Existing, |_, game| {
            if !game.is_player(player_id) {
                return Err(DomainError::wrong_player(format!(
                    "{player_id} is not seated in {}",
                    game.id
                ))
                .into());
            }
            if game.status == GameStatus::Finished {
                return Err(DomainError::invalid_state(format!("Game {} is over", game.id)).into());
            }

            let GameTransition::GameFinished { winner_id } =
                transition_after_player_leave(game, player_id)
            else {
                return Err(AppError::internal("Leaving did not finish the game"));
            };
            info!(game_id = %game.id, player_id, winner_id = ?winner_id, "Player left; game finished");
            Ok(vec![GameEvent::GameFinished {
                winner_id,
                final_scores: game.cumulative_scores.clone(),
            }])
        })
        .await
    }

    /// Acknowledge the last round's result. The next round is dealt once both
    /// players have confirmed. Confirming twice is a no-op.
    pub async fn confirm_continue(
        &self,
        game_id: &str,
        player_id: &str,
    ) -> Result<Vec<EventEnvelope>, AppError> {
        self.run_mutation(game_id, LoadMode::Existing, |svc, game| {
            game.require_in_progress()?;
            if !game.is_player(player_id) {
                return Err(DomainError::wrong_player(format!(
                    "{player_id} is not seated in {}",
                    game.id
                ))
                .into());
            }
            if !game.is_between_rounds() {
                return Err(DomainError::invalid_state("No round result to confirm").into());
            }
            if !game
                .pending_continue_confirmations
                .insert(player_id.to_string())
            {
                return Ok(Vec::new());
            }

            let waiting_for: Vec<_> = game
                .players
                .iter()
                .map(|p| p.id.clone())
                .filter(|id| !game.pending_continue_confirmations.contains(id))
                .collect();
            if waiting_for.is_empty() {
                return svc.deal_round(game);
            }
            Ok(vec![GameEvent::ContinueConfirmed {
                player_id: player_id.to_string(),
                waiting_for,
            }])
        })
        .await
    }

    fn seat_player(
        &self,
        game: &mut Game,
        player_id: &str,
        player_name: &str,
        session_token: Option<String>,
    ) -> Result<(String, Vec<GameEvent>), AppError> {
        if let Some(seated) = game.player(player_id) {
            if session_token.as_deref() != Some(seated.session_token.as_str()) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidSession,
                    format!("Session token does not match {player_id}"),
                )
                .into());
            }
            let token = seated.session_token.clone();
            if game.player_connection_statuses.get(player_id) == Some(&ConnectionStatus::Left) {
                return Err(DomainError::invalid_state(format!("{player_id} left the game")).into());
            }
            game.set_connection(player_id, ConnectionStatus::Connected);
            info!(game_id = %game.id, player_id, "Player rejoined");
            let snapshot = GameSnapshot::from_game(game);
            return Ok((token, vec![GameEvent::GameSnapshotRestore { snapshot }]));
        }

        let token = session_token.unwrap_or_else(|| Uuid::new_v4().to_string());
        game.add_player(Player {
            id: player_id.to_string(),
            name: player_name.to_string(),
            session_token: token.clone(),
        })?;

        if !game.is_full() {
            info!(game_id = %game.id, player_id, "Game created; waiting for an opponent");
            let snapshot = GameSnapshot::from_game(game);
            return Ok((token, vec![GameEvent::GameSnapshotRestore { snapshot }]));
        }

        game.start()?;
        info!(game_id = %game.id, player_id, "Game started");
        let snapshot = GameSnapshot::from_game(game);
        let mut events = vec![GameEvent::GameStarted {
            players: snapshot.players,
            ruleset: snapshot.ruleset,
        }];
        events.extend(self.deal_round(game)?);
        Ok((token, events))
    }
}
