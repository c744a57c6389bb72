//! RNG seed derivation utilities for deterministic dealing.
//!
//! Every game draws one base seed at creation; each round's shuffle derives
//! its own seed from it so a game can be replayed from the base seed alone.

/// Derive a seed for shuffling the deck of a round.
///
/// # Arguments
///
/// * `game_seed` - Base RNG seed stored on the game
/// * `round_no` - 1-based round number
///
/// # Returns
///
/// Derived seed that is unique per (game, round) combination.
pub fn derive_dealing_seed(game_seed: u64, round_no: u32) -> u64 {
    // SplitMix64 finalizer over the combined input so neighbouring rounds
    // land far apart in seed space.
    let mut z = game_seed.wrapping_add((round_no as u64).wrapping_mul(0x9E3779B97F4A7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
