//! Bot that takes the most valuable capture available.

use super::trait_def::{hand_of, AiError, AiPlayer, HandChoice};
use crate::domain::matching::analyze_match;
use crate::domain::round::{Decision, Round};
use crate::domain::{CardCategory, CardId};

/// Keeps going after a yaku while it still holds at least this many cards.
const KOI_KOI_MIN_HAND: usize = 4;

#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyPlayer;

impl GreedyPlayer {
    pub const NAME: &'static str = "GreedyPlayer";

    pub fn new() -> Self {
        Self
    }
}

fn value(card: CardId) -> u32 {
    match card.category() {
        CardCategory::Bright => 20,
        CardCategory::Animal => 10,
        CardCategory::Ribbon => 5,
        CardCategory::Plain => 1,
    }
}

fn best_target(targets: &[CardId]) -> Option<CardId> {
    targets.iter().copied().max_by_key(|t| (value(*t), std::cmp::Reverse(*t)))
}

impl AiPlayer for GreedyPlayer {
    /// Highest-value capture; with nothing to capture, discard the cheapest card.
    fn choose_hand_card(&self, round: &Round, player_id: &str) -> Result<HandChoice, AiError> {
        let hand = hand_of(round, player_id)?;

        let mut best: Option<(u32, HandChoice)> = None;
        for &card in &hand {
            let result = analyze_match(card, &round.field);
            let targets = result.targets();
            if targets.is_empty() {
                continue;
            }
            let (gain, selected_target) = if result.requires_selection() {
                let target = best_target(&targets)
                    .ok_or_else(|| AiError::Internal("double match without targets".into()))?;
                (value(card) + value(target), Some(target))
            } else {
                (value(card) + targets.iter().map(|t| value(*t)).sum::<u32>(), None)
            };
            if best.as_ref().map_or(true, |(top, _)| gain > *top) {
                best = Some((
                    gain,
                    HandChoice {
                        card,
                        selected_target,
                    },
                ));
            }
        }
        if let Some((_, choice)) = best {
            return Ok(choice);
        }

        let card = hand
            .iter()
            .copied()
            .min_by_key(|c| value(*c))
            .ok_or_else(|| AiError::InvalidMove(format!("{player_id} has no cards")))?;
        Ok(HandChoice {
            card,
            selected_target: None,
        })
    }

    fn choose_target(&self, _round: &Round, targets: &[CardId]) -> Result<CardId, AiError> {
        best_target(targets).ok_or_else(|| AiError::InvalidMove("no targets".into()))
    }

    fn choose_decision(&self, round: &Round, player_id: &str) -> Result<Decision, AiError> {
        let held = hand_of(round, player_id).map(|h| h.len()).unwrap_or(0);
        if held >= KOI_KOI_MIN_HAND && !round.koikoi_declared() {
            Ok(Decision::KoiKoi)
        } else {
            Ok(Decision::EndRound)
        }
    }
}
