//! Bot player trait definition.

use std::fmt;

use crate::domain::round::{Decision, Round};
use crate::domain::CardId;
use crate::error::AppError;

/// Errors a bot can hit while choosing an action.
#[derive(Debug)]
pub enum AiError {
    /// The round offers the bot nothing to choose from.
    InvalidMove(String),
    Internal(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::InvalidMove(msg) => write!(f, "bot invalid move: {msg}"),
            AiError::Internal(msg) => write!(f, "bot internal error: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("Bot error: {err}"))
    }
}

/// A hand card to play, with the target when it would hit a double match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandChoice {
    pub card: CardId,
    pub selected_target: Option<CardId>,
}

/// Automated Koi-Koi player.
///
/// Bots see the whole round; they are only ever asked when it is their turn.
pub trait AiPlayer: Send + Sync {
    fn choose_hand_card(&self, round: &Round, player_id: &str) -> Result<HandChoice, AiError>;

    fn choose_target(&self, round: &Round, targets: &[CardId]) -> Result<CardId, AiError>;

    fn choose_decision(&self, round: &Round, player_id: &str) -> Result<Decision, AiError>;
}

/// Cards `player_id` holds, lowest code first.
pub(crate) fn hand_of(round: &Round, player_id: &str) -> Result<Vec<CardId>, AiError> {
    let hand: Vec<CardId> = round
        .player_state(player_id)
        .ok_or_else(|| AiError::InvalidMove(format!("{player_id} is not in the round")))?
        .hand
        .iter()
        .copied()
        .collect();
    if hand.is_empty() {
        return Err(AiError::InvalidMove(format!("{player_id} has no cards")));
    }
    Ok(hand)
}
