//! Dealt-layout patterns that end a round before any card is played.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::game::PlayerId;
use crate::domain::round::RoundEndReason;
use crate::domain::rules::SpecialRules;
use crate::domain::{CardId, Month};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantEnd {
    pub reason: RoundEndReason,
    pub winner_id: Option<PlayerId>,
    pub points: u32,
}

fn month_counts<'a>(cards: impl IntoIterator<Item = &'a CardId>) -> BTreeMap<Month, usize> {
    let mut counts = BTreeMap::new();
    for card in cards {
        *counts.entry(card.month()).or_insert(0) += 1;
    }
    counts
}

/// All four cards of one month.
pub fn has_four_of_a_month<'a>(cards: impl IntoIterator<Item = &'a CardId>) -> bool {
    month_counts(cards).values().any(|&n| n == 4)
}

/// Exactly four months, two cards each.
pub fn is_four_pairs(hand: &BTreeSet<CardId>) -> bool {
    let counts = month_counts(hand);
    counts.len() == 4 && counts.values().all(|&n| n == 2)
}

/// Check the dealt layout. `hands` must list the dealer first: the dealer's
/// hand takes priority when both hands qualify.
pub fn check_instant_end(
    hands: &[(&PlayerId, &BTreeSet<CardId>)],
    field: &[CardId],
    rules: &SpecialRules,
) -> Option<InstantEnd> {
    if rules.field_teshi_enabled && has_four_of_a_month(field) {
        return Some(InstantEnd {
            reason: RoundEndReason::InstantFieldTeshi,
            winner_id: None,
            points: 0,
        });
    }

    for (player_id, hand) in hands {
        if rules.teshi_enabled && has_four_of_a_month(hand.iter()) {
            return Some(InstantEnd {
                reason: RoundEndReason::InstantTeshi,
                winner_id: Some((*player_id).clone()),
                points: rules.teshi_points,
            });
        }
        if rules.kuttsuki_enabled && is_four_pairs(hand) {
            return Some(InstantEnd {
                reason: RoundEndReason::InstantKuttsuki,
                winner_id: Some((*player_id).clone()),
                points: rules.kuttsuki_points,
            });
        }
    }

    None
}
