//! Domain layer: pure Koi-Koi rules, free of IO and async.

pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod catalog;
pub mod dealing;
pub mod fixtures;
pub mod game;
pub mod game_transition;
pub mod matching;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod special_rules;
pub mod yaku;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_yaku;

// Re-exports for ergonomics
pub use cards_types::{Card, CardCategory, CardId, Month};
pub use dealing::{create_seeded_deck, create_shuffled_deck, deal, DeckError};
pub use game::{Game, GameId, GameStatus, Player, PlayerId};
pub use round::{Decision, FlowState, Round};
pub use rules::Ruleset;
pub use seed_derivation::derive_dealing_seed;
