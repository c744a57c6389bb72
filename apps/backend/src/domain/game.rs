//! The match aggregate: players, cumulative scores and the current round.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::dealing::DeckError;
use crate::domain::round::{FlowState, Round, RoundOutcome};
use crate::domain::rules::{Ruleset, PLAYERS};
use crate::domain::CardId;
use crate::errors::domain::DomainError;

pub type GameId = String;
pub type PlayerId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Waiting,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Left,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub session_token: String,
}

/// What the game is waiting on. Two equal points mean nobody gained or lost
/// the move, so a running timer stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPoint {
    pub status: GameStatus,
    pub rounds_played: u32,
    pub turn: Option<TurnPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPoint {
    pub round_no: u32,
    pub flow_state: FlowState,
    pub active_player_id: PlayerId,
    pub pending_card: Option<CardId>,
    pub deck_remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    /// Join order. The first player deals round 1.
    pub players: Vec<Player>,
    pub ruleset: Ruleset,
    pub cumulative_scores: BTreeMap<PlayerId, u32>,
    pub rounds_played: u32,
    pub current_round: Option<Round>,
    pub status: GameStatus,
    pub player_connection_statuses: BTreeMap<PlayerId, ConnectionStatus>,
    /// Players who acknowledged the last round's result.
    pub pending_continue_confirmations: BTreeSet<PlayerId>,
    /// Dealer of the current round, or of the next one between rounds.
    pub dealer_id: Option<PlayerId>,
    pub last_round_result: Option<RoundOutcome>,
    pub winner_id: Option<PlayerId>,
    pub rng_seed: u64,
    /// Sequence number of the last emitted event.
    pub event_seq: u64,
    /// Bumped whenever `control_point` moves; pending timeouts carry the value they were armed with.
    pub action_marker: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Game {
    pub fn new(id: impl Into<GameId>, ruleset: Ruleset, rng_seed: u64, now: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            players: Vec::with_capacity(PLAYERS),
            ruleset,
            cumulative_scores: BTreeMap::new(),
            rounds_played: 0,
            current_round: None,
            status: GameStatus::Waiting,
            player_connection_statuses: BTreeMap::new(),
            pending_continue_confirmations: BTreeSet::new(),
            dealer_id: None,
            last_round_result: None,
            winner_id: None,
            rng_seed,
            event_seq: 0,
            action_marker: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn is_player(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() == PLAYERS
    }

    pub fn opponent_of(&self, player_id: &str) -> Option<&PlayerId> {
        if !self.is_player(player_id) {
            return None;
        }
        self.players
            .iter()
            .map(|p| &p.id)
            .find(|id| id.as_str() != player_id)
    }

    /// Both seats in join order.
    pub fn seat_ids(&self) -> Result<[PlayerId; PLAYERS], DomainError> {
        match self.players.as_slice() {
            [a, b] => Ok([a.id.clone(), b.id.clone()]),
            _ => Err(DomainError::invalid_state("Game does not have two players")),
        }
    }

    pub fn add_player(&mut self, player: Player) -> Result<(), DomainError> {
        if self.status != GameStatus::Waiting || self.is_full() {
            return Err(DomainError::invalid_state(format!(
                "Game {} is not accepting players",
                self.id
            )));
        }
        if self.is_player(&player.id) {
            return Err(DomainError::invalid_state(format!(
                "{} already joined",
                player.id
            )));
        }
        self.cumulative_scores.insert(player.id.clone(), 0);
        self.player_connection_statuses
            .insert(player.id.clone(), ConnectionStatus::Connected);
        self.players.push(player);
        Ok(())
    }

    /// WAITING -> IN_PROGRESS once both seats are taken.
    pub fn start(&mut self) -> Result<(), DomainError> {
        if self.status != GameStatus::Waiting || !self.is_full() {
            return Err(DomainError::invalid_state(format!(
                "Game {} cannot start",
                self.id
            )));
        }
        self.status = GameStatus::InProgress;
        self.dealer_id = Some(self.players[0].id.clone());
        Ok(())
    }

    pub fn require_in_progress(&self) -> Result<(), DomainError> {
        match self.status {
            GameStatus::InProgress => Ok(()),
            other => Err(DomainError::invalid_state(format!(
                "Game {} is {other:?}",
                self.id
            ))),
        }
    }

    /// IN_PROGRESS with no active round: waiting on continue confirmations.
    pub fn is_between_rounds(&self) -> bool {
        self.status == GameStatus::InProgress && self.current_round.is_none()
    }

    pub fn round(&self) -> Result<&Round, DomainError> {
        self.current_round
            .as_ref()
            .ok_or_else(|| DomainError::invalid_state("No round in progress"))
    }

    pub fn round_mut(&mut self) -> Result<&mut Round, DomainError> {
        self.current_round
            .as_mut()
            .ok_or_else(|| DomainError::invalid_state("No round in progress"))
    }

    /// Deal round `rounds_played + 1` from `deck`. A dealt layout that hits a
    /// special rule leaves the new round already ended.
    pub fn begin_round(&mut self, deck: &[CardId]) -> Result<&Round, BeginRoundError> {
        self.require_in_progress()?;
        if self.current_round.is_some() {
            return Err(DomainError::invalid_state("A round is already in progress").into());
        }
        let seats = self.seat_ids()?;
        let dealer = self.dealer_id.clone().unwrap_or_else(|| seats[0].clone());

        let mut round = Round::deal(self.rounds_played + 1, deck, &seats, &dealer)?;
        round.apply_instant_end(&self.ruleset.special_rules);

        self.dealer_id = Some(dealer);
        self.pending_continue_confirmations.clear();
        Ok(&*self.current_round.insert(round))
    }

    /// Highest cumulative score; `None` on a tie.
    pub fn leading_player(&self) -> Option<PlayerId> {
        let mut ranked: Vec<(&PlayerId, &u32)> = self.cumulative_scores.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(a.1));
        match ranked.as_slice() {
            [(first, top), (_, second), ..] if top > second => Some((*first).clone()),
            [(only, _)] => Some((*only).clone()),
            _ => None,
        }
    }

    pub fn set_connection(&mut self, player_id: &str, status: ConnectionStatus) {
        if let Some(entry) = self.player_connection_statuses.get_mut(player_id) {
            *entry = status;
        }
    }

    pub fn control_point(&self) -> ControlPoint {
        ControlPoint {
            status: self.status,
            rounds_played: self.rounds_played,
            turn: self.current_round.as_ref().map(|round| TurnPoint {
                round_no: round.round_no,
                flow_state: round.flow_state,
                active_player_id: round.active_player_id.clone(),
                pending_card: round.pending_selection.as_ref().map(|p| p.source_card),
                deck_remaining: round.deck.len(),
            }),
        }
    }

    pub fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BeginRoundError {
    #[error(transparent)]
    Rejected(#[from] DomainError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}
