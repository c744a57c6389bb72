//! Where each round's deck comes from.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::domain::dealing::{create_seeded_deck, create_shuffled_deck};
use crate::domain::game::Game;
use crate::domain::seed_derivation::derive_dealing_seed;
use crate::domain::CardId;

pub trait DeckProvider: Send + Sync {
    /// The 48-card deck for round `round_no` of `game`.
    fn deck_for(&self, game: &Game, round_no: u32) -> Vec<CardId>;
}

/// Seeded from the game's `rng_seed`, so a game replays identically.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShuffledDeckProvider {
    deterministic: bool,
}

impl ShuffledDeckProvider {
    pub fn new(deterministic: bool) -> Self {
        Self { deterministic }
    }
}

impl DeckProvider for ShuffledDeckProvider {
    fn deck_for(&self, game: &Game, round_no: u32) -> Vec<CardId> {
        if self.deterministic {
            return create_shuffled_deck(true);
        }
        create_seeded_deck(derive_dealing_seed(game.rng_seed, round_no))
    }
}

/// Hands out prepared decks in order, then falls back to seeded shuffles.
#[derive(Debug, Default)]
pub struct FixedDeckProvider {
    decks: Mutex<VecDeque<Vec<CardId>>>,
    fallback: ShuffledDeckProvider,
}

impl FixedDeckProvider {
    pub fn new(decks: impl IntoIterator<Item = Vec<CardId>>) -> Self {
        Self {
            decks: Mutex::new(decks.into_iter().collect()),
            fallback: ShuffledDeckProvider::default(),
        }
    }
}

impl DeckProvider for FixedDeckProvider {
    fn deck_for(&self, game: &Game, round_no: u32) -> Vec<CardId> {
        let next = self.decks.lock().pop_front();
        next.unwrap_or_else(|| self.fallback.deck_for(game, round_no))
    }
}
