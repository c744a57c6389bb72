//! Engine configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::domain::rules::{Ruleset, SpecialRules, DEFAULT_TOTAL_ROUNDS};
use crate::error::AppError;

pub const DEFAULT_ACTION_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_DISPLAY_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Time a player has to act before a forced action. 0 disables it.
    pub action_timeout_seconds: u64,
    /// Time between rounds before the next one is dealt unconfirmed. 0 disables it.
    pub display_timeout_seconds: u64,
    pub total_rounds: u32,
    /// Deal every round from the catalog order instead of a seeded shuffle.
    pub deterministic_deck: bool,
    /// Teshi, kuttsuki and field teshi checks at the deal.
    pub special_rules: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            action_timeout_seconds: DEFAULT_ACTION_TIMEOUT_SECS,
            display_timeout_seconds: DEFAULT_DISPLAY_TIMEOUT_SECS,
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            deterministic_deck: false,
            special_rules: true,
        }
    }
}

impl EngineConfig {
    /// Load from the process environment; unset variables keep their defaults.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let total_rounds = parse_or(&lookup, "KOIKOI_TOTAL_ROUNDS", defaults.total_rounds)?;
        if total_rounds == 0 {
            return Err(AppError::config("KOIKOI_TOTAL_ROUNDS must be at least 1"));
        }

        Ok(Self {
            action_timeout_seconds: parse_or(
                &lookup,
                "KOIKOI_ACTION_TIMEOUT_SECS",
                defaults.action_timeout_seconds,
            )?,
            display_timeout_seconds: parse_or(
                &lookup,
                "KOIKOI_DISPLAY_TIMEOUT_SECS",
                defaults.display_timeout_seconds,
            )?,
            total_rounds,
            deterministic_deck: parse_or(
                &lookup,
                "KOIKOI_DETERMINISTIC_DECK",
                defaults.deterministic_deck,
            )?,
            special_rules: parse_or(&lookup, "KOIKOI_SPECIAL_RULES", defaults.special_rules)?,
        })
    }

    /// Default ruleset with the configured round count.
    pub fn ruleset(&self) -> Ruleset {
        let special_rules = if self.special_rules {
            SpecialRules::default()
        } else {
            SpecialRules::disabled()
        };
        Ruleset {
            total_rounds: self.total_rounds,
            special_rules,
            ..Ruleset::default()
        }
    }

    pub fn action_timeout(&self) -> Option<Duration> {
        (self.action_timeout_seconds > 0).then(|| Duration::from_secs(self.action_timeout_seconds))
    }

    pub fn display_timeout(&self) -> Option<Duration> {
        (self.display_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.display_timeout_seconds))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("{key} has invalid value '{raw}': {e}"))),
    }
}
