use std::collections::HashSet;

use crate::domain::catalog::CATALOG;
use crate::domain::dealing::{FIELD_SIZE, HAND_SIZE};
use crate::domain::CardId;

/// Centralized helper for building hardcoded card layouts in fixtures and demo data.
pub struct CardFixtures;

impl CardFixtures {
    /// Parse hardcoded card codes.
    ///
    /// Only for codes known to be in the catalog; panics otherwise.
    pub fn parse_hardcoded(codes: &[&str]) -> Vec<CardId> {
        codes
            .iter()
            .map(|s| {
                #[allow(clippy::expect_used)]
                s.parse::<CardId>().expect("hardcoded valid card code")
            })
            .collect()
    }

    /// A full 48-card deck that deals the given layout.
    ///
    /// Hands and field are padded to size and the deck continues after
    /// `deck_front`, all from unused cards in catalog order.
    pub fn arranged_deck(
        first_hand: &[&str],
        second_hand: &[&str],
        field: &[&str],
        deck_front: &[&str],
    ) -> Vec<CardId> {
        let parts = [
            Self::parse_hardcoded(first_hand),
            Self::parse_hardcoded(second_hand),
            Self::parse_hardcoded(field),
            Self::parse_hardcoded(deck_front),
        ];
        let used: HashSet<CardId> = parts.iter().flatten().copied().collect();
        assert_eq!(
            used.len(),
            parts.iter().map(Vec::len).sum::<usize>(),
            "arranged layout repeats a card"
        );
        let mut spare = CATALOG.iter().copied().filter(|c| !used.contains(c));

        let [first, second, field, front] = parts;
        let mut deck = Vec::with_capacity(CATALOG.len());
        for (mut part, size) in [(first, HAND_SIZE), (second, HAND_SIZE), (field, FIELD_SIZE)] {
            assert!(part.len() <= size, "arranged part holds more than {size} cards");
            while part.len() < size {
                #[allow(clippy::expect_used)]
                part.push(spare.next().expect("catalog has spare cards"));
            }
            deck.extend(part);
        }
        deck.extend(front);
        deck.extend(spare);
        deck
    }
}
