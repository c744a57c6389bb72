//! Read model handed to reconnecting subscribers.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::game::{ConnectionStatus, Game, GameId, GameStatus, PlayerId};
use crate::domain::round::{Round, RoundOutcome};
use crate::domain::rules::Ruleset;

/// A seat as other clients see it; the session token stays server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub connection: ConnectionStatus,
}

/// Everything a client needs to rebuild its view without replaying events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub status: GameStatus,
    pub players: Vec<PlayerPublic>,
    pub ruleset: Ruleset,
    pub cumulative_scores: BTreeMap<PlayerId, u32>,
    pub rounds_played: u32,
    pub dealer_id: Option<PlayerId>,
    pub current_round: Option<Round>,
    pub last_round_result: Option<RoundOutcome>,
    pub pending_continue_confirmations: BTreeSet<PlayerId>,
    pub winner_id: Option<PlayerId>,
    /// Last sequence number folded into this snapshot.
    pub event_seq: u64,
}

impl GameSnapshot {
    pub fn from_game(game: &Game) -> Self {
        let players = game
            .players
            .iter()
            .map(|p| PlayerPublic {
                id: p.id.clone(),
                name: p.name.clone(),
                connection: game
                    .player_connection_statuses
                    .get(&p.id)
                    .copied()
                    .unwrap_or(ConnectionStatus::Disconnected),
            })
            .collect();

        Self {
            game_id: game.id.clone(),
            status: game.status,
            players,
            ruleset: game.ruleset.clone(),
            cumulative_scores: game.cumulative_scores.clone(),
            rounds_played: game.rounds_played,
            dealer_id: game.dealer_id.clone(),
            current_round: game.current_round.clone(),
            last_round_result: game.last_round_result.clone(),
            pending_continue_confirmations: game.pending_continue_confirmations.clone(),
            winner_id: game.winner_id.clone(),
            event_seq: game.event_seq,
        }
    }
}
