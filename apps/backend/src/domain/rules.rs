//! Ruleset: round count, per-yaku settings and the instant-end special rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const PLAYERS: usize = 2;
pub const DEFAULT_TOTAL_ROUNDS: u32 = 12;

/// Round score at or above which the score doubles.
pub const DOUBLING_THRESHOLD: u32 = 7;
/// Applied when any Koi-Koi was declared during the round.
pub const KOI_KOI_MULTIPLIER: u32 = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YakuType {
    Gokou,
    Shikou,
    AmeShikou,
    Sankou,
    Inoshikacho,
    HanamiZake,
    TsukimiZake,
    Akatan,
    Aotan,
    Tane,
    Tanzaku,
    Kasu,
}

impl YakuType {
    pub const ALL: [YakuType; 12] = [
        YakuType::Gokou,
        YakuType::Shikou,
        YakuType::AmeShikou,
        YakuType::Sankou,
        YakuType::Inoshikacho,
        YakuType::HanamiZake,
        YakuType::TsukimiZake,
        YakuType::Akatan,
        YakuType::Aotan,
        YakuType::Tane,
        YakuType::Tanzaku,
        YakuType::Kasu,
    ];

    pub const fn default_points(self) -> u32 {
        match self {
            YakuType::Gokou => 15,
            YakuType::Shikou => 10,
            YakuType::AmeShikou => 8,
            YakuType::Sankou => 6,
            YakuType::Inoshikacho => 5,
            YakuType::HanamiZake => 3,
            YakuType::TsukimiZake => 3,
            YakuType::Akatan => 5,
            YakuType::Aotan => 5,
            YakuType::Tane => 1,
            YakuType::Tanzaku => 1,
            YakuType::Kasu => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct YakuSetting {
    pub enabled: bool,
    pub base_points: u32,
}

pub type YakuSettings = BTreeMap<YakuType, YakuSetting>;

pub fn default_yaku_settings() -> YakuSettings {
    YakuType::ALL
        .into_iter()
        .map(|t| {
            (
                t,
                YakuSetting {
                    enabled: true,
                    base_points: t.default_points(),
                },
            )
        })
        .collect()
}

/// Dealt-hand patterns that end the round before any play.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SpecialRules {
    /// All four cards of a month in one hand.
    pub teshi_enabled: bool,
    /// A hand made of four month-pairs.
    pub kuttsuki_enabled: bool,
    /// All four cards of a month on the field; the round ends without score.
    pub field_teshi_enabled: bool,
    pub teshi_points: u32,
    pub kuttsuki_points: u32,
}

impl Default for SpecialRules {
    fn default() -> Self {
        Self {
            teshi_enabled: true,
            kuttsuki_enabled: true,
            field_teshi_enabled: true,
            teshi_points: 6,
            kuttsuki_points: 6,
        }
    }
}

impl SpecialRules {
    pub fn disabled() -> Self {
        Self {
            teshi_enabled: false,
            kuttsuki_enabled: false,
            field_teshi_enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    pub total_rounds: u32,
    pub yaku_settings: YakuSettings,
    pub special_rules: SpecialRules,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            yaku_settings: default_yaku_settings(),
            special_rules: SpecialRules::default(),
        }
    }
}

impl Ruleset {
    /// Setting for `yaku_type`; types missing from the map use the table defaults.
    pub fn yaku_setting(&self, yaku_type: YakuType) -> YakuSetting {
        self.yaku_settings
            .get(&yaku_type)
            .copied()
            .unwrap_or(YakuSetting {
                enabled: true,
                base_points: yaku_type.default_points(),
            })
    }
}
