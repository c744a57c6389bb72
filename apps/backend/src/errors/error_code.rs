//! Error codes surfaced to clients.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear
//! in `TurnError` / `GameError` payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Command validation
    /// Game id is unknown
    GameNotFound,
    /// Acting player is not the active player
    WrongPlayer,
    /// Command does not match the current flow state
    InvalidState,
    /// Card is not in hand / not the pending card
    InvalidCard,
    /// Target is not among the possible targets
    InvalidSelection,
    /// Session token does not match the seated player
    InvalidSession,
    /// Card code could not be parsed
    ParseCard,
    /// General validation error
    ValidationError,

    // System errors
    /// Repository failure
    StorageError,
    /// Persisted state failed an integrity check
    DataCorruption,
    /// Configuration error
    ConfigError,
    /// Internal invariant failure
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::WrongPlayer => "WRONG_PLAYER",
            Self::InvalidState => "INVALID_STATE",
            Self::InvalidCard => "INVALID_CARD",
            Self::InvalidSelection => "INVALID_SELECTION",
            Self::InvalidSession => "INVALID_SESSION",
            Self::ParseCard => "PARSE_CARD",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::StorageError => "STORAGE_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
