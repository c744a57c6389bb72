//! Card parsing from the 4-character code (e.g., "0111", "1243")

use std::str::FromStr;

use super::cards_types::CardId;
use crate::domain::catalog::is_catalog_card;
use crate::errors::domain::{DomainError, ValidationKind};

impl FromStr for CardId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Parse card: {s}"),
            ));
        }
        let code: u16 = s.parse().map_err(|_| {
            DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"))
        })?;
        let id = CardId::from_code(code);
        if !is_catalog_card(id) {
            return Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Unknown card: {s}"),
            ));
        }
        Ok(id)
    }
}

/// Non-panicking helper to parse card codes into ids.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<CardId>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<CardId>())
        .collect()
}
