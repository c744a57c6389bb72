//! Static table of the 48 Hanafuda cards.

use crate::domain::cards_types::{Card, CardCategory, CardId, Month};

pub const DECK_SIZE: usize = 48;

const fn c(code: u16) -> CardId {
    CardId::from_code(code)
}

// Named cards used by yaku and special rules.
pub const PINE_CRANE: CardId = c(111);
pub const PINE_POEM_RIBBON: CardId = c(131);
pub const PLUM_POEM_RIBBON: CardId = c(231);
pub const CHERRY_CURTAIN: CardId = c(311);
pub const CHERRY_POEM_RIBBON: CardId = c(331);
pub const PEONY_BUTTERFLIES: CardId = c(621);
pub const PEONY_BLUE_RIBBON: CardId = c(631);
pub const CLOVER_BOAR: CardId = c(721);
pub const SUSUKI_MOON: CardId = c(811);
pub const CHRYSANTHEMUM_SAKE_CUP: CardId = c(921);
pub const CHRYSANTHEMUM_BLUE_RIBBON: CardId = c(931);
pub const MAPLE_DEER: CardId = c(1021);
pub const MAPLE_BLUE_RIBBON: CardId = c(1031);
pub const WILLOW_RAIN_MAN: CardId = c(1111);
pub const PAULOWNIA_PHOENIX: CardId = c(1211);

pub const POEM_RIBBONS: [CardId; 3] = [PINE_POEM_RIBBON, PLUM_POEM_RIBBON, CHERRY_POEM_RIBBON];
pub const BLUE_RIBBONS: [CardId; 3] = [
    PEONY_BLUE_RIBBON,
    CHRYSANTHEMUM_BLUE_RIBBON,
    MAPLE_BLUE_RIBBON,
];
pub const BOAR_DEER_BUTTERFLY: [CardId; 3] = [CLOVER_BOAR, MAPLE_DEER, PEONY_BUTTERFLIES];

/// Every card in catalog order (month ascending, then code).
pub const CATALOG: [CardId; DECK_SIZE] = [
    c(111), c(131), c(141), c(142),
    c(221), c(231), c(241), c(242),
    c(311), c(331), c(341), c(342),
    c(421), c(431), c(441), c(442),
    c(521), c(531), c(541), c(542),
    c(621), c(631), c(641), c(642),
    c(721), c(731), c(741), c(742),
    c(811), c(821), c(841), c(842),
    c(921), c(931), c(941), c(942),
    c(1021), c(1031), c(1041), c(1042),
    c(1111), c(1121), c(1131), c(1141),
    c(1211), c(1241), c(1242), c(1243),
];

pub fn is_catalog_card(id: CardId) -> bool {
    CATALOG.binary_search(&id).is_ok()
}

/// Resolve an id into its catalog entry.
pub fn card(id: CardId) -> Option<Card> {
    is_catalog_card(id).then(|| Card::from(id))
}

/// The four cards of `month`, in catalog order.
pub fn cards_of_month(month: Month) -> impl Iterator<Item = CardId> {
    CATALOG.into_iter().filter(move |id| id.month() == month)
}

pub fn cards_of_category(category: CardCategory) -> impl Iterator<Item = CardId> {
    CATALOG
        .into_iter()
        .filter(move |id| id.category() == category)
}
