//! Bot that picks uniformly among legal actions.

use parking_lot::Mutex;
use rand::prelude::*;

use super::trait_def::{hand_of, AiError, AiPlayer, HandChoice};
use crate::domain::matching::{analyze_match, MatchResult};
use crate::domain::round::{Decision, Round};
use crate::domain::CardId;

pub struct RandomPlayer {
    rng: Mutex<StdRng>,
}

impl RandomPlayer {
    pub const NAME: &'static str = "RandomPlayer";

    /// `Some(seed)` replays the same choices; `None` draws from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn pick(&self, options: &[CardId]) -> Result<CardId, AiError> {
        options
            .choose(&mut *self.rng.lock())
            .copied()
            .ok_or_else(|| AiError::InvalidMove("nothing to choose from".into()))
    }
}

impl AiPlayer for RandomPlayer {
    fn choose_hand_card(&self, round: &Round, player_id: &str) -> Result<HandChoice, AiError> {
        let card = self.pick(&hand_of(round, player_id)?)?;
        let selected_target = match analyze_match(card, &round.field) {
            MatchResult::DoubleMatch { targets } => Some(self.pick(&targets)?),
            _ => None,
        };
        Ok(HandChoice {
            card,
            selected_target,
        })
    }

    fn choose_target(&self, _round: &Round, targets: &[CardId]) -> Result<CardId, AiError> {
        self.pick(targets)
    }

    fn choose_decision(&self, _round: &Round, _player_id: &str) -> Result<Decision, AiError> {
        let decision = if self.rng.lock().random_bool(0.5) {
            Decision::KoiKoi
        } else {
            Decision::EndRound
        };
        Ok(decision)
    }
}
