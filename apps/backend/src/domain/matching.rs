//! Matching Service: month matching between a played/drawn card and the field.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::domain::CardId;

/// Outcome of matching one card against the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Nothing shares the month; the card is laid on the field.
    NoMatch,
    SingleMatch { target: CardId },
    /// Two candidates; the player must choose one.
    DoubleMatch { targets: [CardId; 2] },
    /// The fourth card of a month takes all three.
    TripleMatch { targets: [CardId; 3] },
}

impl MatchResult {
    pub fn targets(&self) -> Vec<CardId> {
        match self {
            MatchResult::NoMatch => Vec::new(),
            MatchResult::SingleMatch { target } => vec![*target],
            MatchResult::DoubleMatch { targets } => targets.to_vec(),
            MatchResult::TripleMatch { targets } => targets.to_vec(),
        }
    }

    pub fn requires_selection(&self) -> bool {
        matches!(self, MatchResult::DoubleMatch { .. })
    }
}

/// Capture failures. These are orchestration bugs, never user errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("a double match requires a target selection")]
    SelectionRequired,
    #[error("selected target {0} is not one of the matching cards")]
    InvalidTargetSelection(CardId),
}

/// Same month; an identical id counts as a match.
pub fn can_match(a: CardId, b: CardId) -> bool {
    a.same_month(b)
}

pub fn find_matchable_targets(card: CardId, field: &[CardId]) -> BTreeSet<CardId> {
    field
        .iter()
        .copied()
        .filter(|f| can_match(card, *f))
        .collect()
}

pub fn analyze_match(card: CardId, field: &[CardId]) -> MatchResult {
    let targets: Vec<CardId> = find_matchable_targets(card, field).into_iter().collect();
    match targets.as_slice() {
        [] => MatchResult::NoMatch,
        [t] => MatchResult::SingleMatch { target: *t },
        [a, b] => MatchResult::DoubleMatch { targets: [*a, *b] },
        [a, b, c, ..] => MatchResult::TripleMatch {
            targets: [*a, *b, *c],
        },
    }
}

/// Cards that move to the depository; empty means the played card stays on the field.
pub fn execute_capture(
    played: CardId,
    chosen_target: Option<CardId>,
    result: &MatchResult,
) -> Result<BTreeSet<CardId>, MatchError> {
    match result {
        MatchResult::NoMatch => Ok(BTreeSet::new()),
        MatchResult::SingleMatch { target } => Ok(BTreeSet::from([played, *target])),
        MatchResult::DoubleMatch { targets } => {
            let chosen = chosen_target.ok_or(MatchError::SelectionRequired)?;
            if !targets.contains(&chosen) {
                return Err(MatchError::InvalidTargetSelection(chosen));
            }
            Ok(BTreeSet::from([played, chosen]))
        }
        MatchResult::TripleMatch { targets } => {
            let mut captured: BTreeSet<CardId> = targets.iter().copied().collect();
            captured.insert(played);
            Ok(captured)
        }
    }
}

/// Field without `cards`; absent ids are ignored.
pub fn remove_from_field(field: &[CardId], cards: &BTreeSet<CardId>) -> Vec<CardId> {
    field
        .iter()
        .copied()
        .filter(|c| !cards.contains(c))
        .collect()
}

pub fn add_to_field(field: &[CardId], card: CardId) -> Vec<CardId> {
    let mut next = field.to_vec();
    if !next.contains(&card) {
        next.push(card);
    }
    next
}
