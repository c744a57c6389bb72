//! Core card-related types: CardId, Card, Month, CardCategory

/// The twelve flower months of the Hanafuda deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// 1-based month number as used in card codes.
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(n: u8) -> Option<Month> {
        match n {
            1..=12 => Some(Self::ALL[(n - 1) as usize]),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum CardCategory {
    Bright,
    Animal,
    Ribbon,
    Plain,
}

impl CardCategory {
    /// Category digit as used in card codes.
    pub const fn digit(self) -> u8 {
        match self {
            CardCategory::Bright => 1,
            CardCategory::Animal => 2,
            CardCategory::Ribbon => 3,
            CardCategory::Plain => 4,
        }
    }

    pub fn from_digit(d: u8) -> Option<CardCategory> {
        match d {
            1 => Some(CardCategory::Bright),
            2 => Some(CardCategory::Animal),
            3 => Some(CardCategory::Ribbon),
            4 => Some(CardCategory::Plain),
            _ => None,
        }
    }
}

/// Compact card identity: the numeric form of the 4-character code `MMCD`
/// (2-digit month, category digit, disambiguator).
///
/// Ordering is by code, which groups cards by month and then category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CardId(u16);

impl CardId {
    pub(crate) const fn from_code(code: u16) -> Self {
        CardId(code)
    }

    pub const fn code(self) -> u16 {
        self.0
    }

    pub fn month(self) -> Month {
        // Catalog ids always carry a valid month; parsing rejects the rest.
        Month::from_number((self.0 / 100) as u8).unwrap_or(Month::January)
    }

    pub fn category(self) -> CardCategory {
        CardCategory::from_digit(((self.0 / 10) % 10) as u8).unwrap_or(CardCategory::Plain)
    }

    pub const fn index(self) -> u8 {
        (self.0 % 10) as u8
    }

    pub fn same_month(self, other: CardId) -> bool {
        self.0 / 100 == other.0 / 100
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Catalog entry: a card id resolved into its attributes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub id: CardId,
    pub month: Month,
    pub category: CardCategory,
    pub index: u8,
}

impl From<CardId> for Card {
    fn from(id: CardId) -> Self {
        Card {
            id,
            month: id.month(),
            category: id.category(),
            index: id.index(),
        }
    }
}
