use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::game::{GameId, PlayerId};
use crate::domain::round::{
    CardPlay, Decision, FlowState, Multipliers, Round, RoundEndReason, SelectionSource,
};
use crate::domain::rules::Ruleset;
use crate::domain::scoring::ScoreBreakdown;
use crate::domain::snapshot::{GameSnapshot, PlayerPublic};
use crate::domain::yaku::Yaku;
use crate::domain::CardId;
use crate::errors::ErrorCode;

/// Who acts next and what they are expected to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextState {
    pub flow_state: FlowState,
    pub active_player_id: PlayerId,
}

impl NextState {
    pub fn of(round: &Round) -> Self {
        Self {
            flow_state: round.flow_state,
            active_player_id: round.active_player_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YakuUpdate {
    pub new_yaku: Vec<Yaku>,
    pub all_active_yaku: Vec<Yaku>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringData {
    pub winner_id: Option<PlayerId>,
    pub yaku: Vec<Yaku>,
    pub score: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestedAction {
    Retry,
    ReturnToMatchmaking,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStarted {
        players: Vec<PlayerPublic>,
        ruleset: Ruleset,
    },
    RoundDealt {
        round_no: u32,
        dealer_id: PlayerId,
        field: Vec<CardId>,
        hands: BTreeMap<PlayerId, Vec<CardId>>,
        deck_remaining: usize,
        action_timeout_seconds: u64,
        next_state: NextState,
    },
    TurnCompleted {
        player_id: PlayerId,
        hand_card_play: Option<CardPlay>,
        draw_card_play: Option<CardPlay>,
        deck_remaining: usize,
        next_state: NextState,
    },
    /// `source_card` is the drawn card, or the hand card when `source` says so.
    SelectionRequired {
        player_id: PlayerId,
        source: SelectionSource,
        source_card: CardId,
        possible_targets: Vec<CardId>,
        hand_card_play: Option<CardPlay>,
        action_timeout_seconds: u64,
    },
    TurnProgressAfterSelection {
        player_id: PlayerId,
        hand_card_play: Option<CardPlay>,
        draw_card_play: Option<CardPlay>,
        yaku_update: Option<YakuUpdate>,
        deck_remaining: usize,
        next_state: NextState,
    },
    DecisionRequired {
        player_id: PlayerId,
        hand_card_play: Option<CardPlay>,
        draw_card_play: Option<CardPlay>,
        yaku_update: YakuUpdate,
        current_multipliers: Multipliers,
        action_timeout_seconds: u64,
    },
    DecisionMade {
        player_id: PlayerId,
        decision: Decision,
        updated_multipliers: Multipliers,
        next_state: NextState,
    },
    RoundEnded {
        round_no: u32,
        reason: RoundEndReason,
        scoring_data: Option<ScoringData>,
        updated_total_scores: BTreeMap<PlayerId, u32>,
        display_timeout_seconds: Option<u64>,
    },
    /// A player acknowledged the round result; `waiting_for` are the rest.
    ContinueConfirmed {
        player_id: PlayerId,
        waiting_for: Vec<PlayerId>,
    },
    GameFinished {
        winner_id: Option<PlayerId>,
        final_scores: BTreeMap<PlayerId, u32>,
    },
    TurnError {
        error_code: ErrorCode,
        error_message: String,
    },
    GameError {
        message: String,
        recoverable: bool,
        suggested_action: SuggestedAction,
    },
    GameSnapshotRestore {
        snapshot: GameSnapshot,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::GameStarted { .. } => "game_started",
            GameEvent::RoundDealt { .. } => "round_dealt",
            GameEvent::TurnCompleted { .. } => "turn_completed",
            GameEvent::SelectionRequired { .. } => "selection_required",
            GameEvent::TurnProgressAfterSelection { .. } => "turn_progress_after_selection",
            GameEvent::DecisionRequired { .. } => "decision_required",
            GameEvent::DecisionMade { .. } => "decision_made",
            GameEvent::RoundEnded { .. } => "round_ended",
            GameEvent::ContinueConfirmed { .. } => "continue_confirmed",
            GameEvent::GameFinished { .. } => "game_finished",
            GameEvent::TurnError { .. } => "turn_error",
            GameEvent::GameError { .. } => "game_error",
            GameEvent::GameSnapshotRestore { .. } => "game_snapshot_restore",
        }
    }
}

/// A sequenced event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub game_id: GameId,
    /// Per-game, gapless, starting at 1.
    pub seq: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub emitted_at: OffsetDateTime,
    pub event: GameEvent,
}
