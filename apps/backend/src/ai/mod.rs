//! Bot players - automated opponents and self-play.
//!
//! - [`AiPlayer`]: the trait every bot implements
//! - [`RandomPlayer`]: uniform legal choices, seedable for tests
//! - [`GreedyPlayer`]: takes the most valuable capture
//! - [`SelfPlay`]: plays a match between bots through `GameFlowService`

mod greedy;
mod random;
mod self_play;
mod trait_def;

pub use greedy::GreedyPlayer;
pub use random::RandomPlayer;
pub use self_play::SelfPlay;
pub use trait_def::{AiError, AiPlayer, HandChoice};

/// Build a bot by name; `seed` only affects random bots.
pub fn create_ai(ai_type: &str, seed: Option<u64>) -> Option<Box<dyn AiPlayer>> {
    match ai_type {
        "random" => Some(Box::new(RandomPlayer::new(seed))),
        "greedy" => Some(Box::new(GreedyPlayer::new())),
        _ => None,
    }
}
