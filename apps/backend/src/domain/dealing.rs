//! Deck Service: shuffling, validation and the opening deal.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::domain::catalog::{is_catalog_card, CATALOG, DECK_SIZE};
use crate::domain::game::PlayerId;
use crate::domain::CardId;

pub const HAND_SIZE: usize = 8;
pub const FIELD_SIZE: usize = 8;

/// Deck Service failures. These are orchestration bugs, never user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck must hold exactly {DECK_SIZE} catalog cards, got {0}")]
    InvalidDeckSize(usize),
    #[error("exactly two non-empty player ids are required")]
    InvalidPlayerCount,
}

/// Opening layout of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealResult {
    /// Hands in the order of the `player_ids` passed to [`deal`].
    pub hands: [Vec<CardId>; 2],
    pub field: Vec<CardId>,
    pub deck_remainder: Vec<CardId>,
}

/// Full deck, shuffled; `deterministic` returns catalog order for tests.
pub fn create_shuffled_deck(deterministic: bool) -> Vec<CardId> {
    if deterministic {
        return CATALOG.to_vec();
    }
    let mut rng = ChaCha8Rng::from_os_rng();
    shuffle(&mut rng)
}

/// Full deck shuffled from a fixed seed; the same seed always yields the same order.
pub fn create_seeded_deck(seed: u64) -> Vec<CardId> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    shuffle(&mut rng)
}

/// Fisher-Yates over the catalog.
fn shuffle<R: Rng>(rng: &mut R) -> Vec<CardId> {
    let mut deck = CATALOG.to_vec();
    for i in (1..deck.len()).rev() {
        let j = rng.random_range(0..=i);
        deck.swap(i, j);
    }
    deck
}

/// Exactly 48 unique cards, all from the catalog.
pub fn is_valid_deck(deck: &[CardId]) -> bool {
    if deck.len() != DECK_SIZE {
        return false;
    }
    let mut seen = HashSet::with_capacity(DECK_SIZE);
    deck.iter().all(|id| is_catalog_card(*id) && seen.insert(*id))
}

/// Deal the opening layout: first 8 cards to the first player, next 8 to the
/// second, next 8 face-up on the field, the remaining 24 stay in the deck in
/// order (draw-from-front).
pub fn deal(deck: &[CardId], player_ids: &[PlayerId]) -> Result<DealResult, DeckError> {
    if !is_valid_deck(deck) {
        return Err(DeckError::InvalidDeckSize(deck.len()));
    }
    if player_ids.len() != 2 || player_ids.iter().any(|p| p.is_empty()) {
        return Err(DeckError::InvalidPlayerCount);
    }

    let first = deck[..HAND_SIZE].to_vec();
    let second = deck[HAND_SIZE..HAND_SIZE * 2].to_vec();
    let field = deck[HAND_SIZE * 2..HAND_SIZE * 2 + FIELD_SIZE].to_vec();
    let deck_remainder = deck[HAND_SIZE * 2 + FIELD_SIZE..].to_vec();

    Ok(DealResult {
        hands: [first, second],
        field,
        deck_remainder,
    })
}
