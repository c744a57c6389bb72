use serde::{Deserialize, Serialize};

use crate::domain::game::{GameId, PlayerId};
use crate::domain::round::Decision;
use crate::domain::CardId;

/// A command scoped to one game and issued by one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCommand {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandKind {
    JoinGame {
        player_name: String,
        #[serde(default)]
        session_token: Option<String>,
    },
    PlayHandCard {
        card_id: CardId,
        /// Settles a double match without a separate `SelectTarget`.
        #[serde(default)]
        selected_target: Option<CardId>,
    },
    SelectTarget {
        source_card_id: CardId,
        target_card_id: CardId,
    },
    MakeDecision {
        decision: Decision,
    },
    /// Acknowledge the last round's result; the next round is dealt once both players confirm.
    ConfirmContinue,
    LeaveGame,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::JoinGame { .. } => "join_game",
            CommandKind::PlayHandCard { .. } => "play_hand_card",
            CommandKind::SelectTarget { .. } => "select_target",
            CommandKind::MakeDecision { .. } => "make_decision",
            CommandKind::ConfirmContinue => "confirm_continue",
            CommandKind::LeaveGame => "leave_game",
        }
    }
}

impl GameCommand {
    pub fn new(game_id: impl Into<GameId>, player_id: impl Into<PlayerId>, kind: CommandKind) -> Self {
        Self {
            game_id: game_id.into(),
            player_id: player_id.into(),
            kind,
        }
    }
}
