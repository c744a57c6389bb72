//! Yaku Detection Service: scoring combinations in a captured-card pile.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{
    BLUE_RIBBONS, BOAR_DEER_BUTTERFLY, CHERRY_CURTAIN, CHRYSANTHEMUM_SAKE_CUP, POEM_RIBBONS,
    SUSUKI_MOON, WILLOW_RAIN_MAN,
};
use crate::domain::rules::{Ruleset, YakuType};
use crate::domain::{CardCategory, CardId};

const TANE_THRESHOLD: usize = 5;
const TANZAKU_THRESHOLD: usize = 5;
const KASU_THRESHOLD: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yaku {
    pub yaku_type: YakuType,
    pub base_points: u32,
    pub contributing_cards: Vec<CardId>,
}

/// Sum of the points of `yaku`.
pub fn total_points(yaku: &[Yaku]) -> u32 {
    yaku.iter().map(|y| y.base_points).sum()
}

fn of_category(depository: &BTreeSet<CardId>, category: CardCategory) -> Vec<CardId> {
    depository
        .iter()
        .copied()
        .filter(|c| c.category() == category)
        .collect()
}

fn holds_all(depository: &BTreeSet<CardId>, cards: &[CardId]) -> bool {
    cards.iter().all(|c| depository.contains(c))
}

/// The bright family is exclusive: only the highest tier is reported.
fn bright_yaku(depository: &BTreeSet<CardId>) -> Option<(YakuType, Vec<CardId>)> {
    let brights = of_category(depository, CardCategory::Bright);
    let has_rain = brights.contains(&WILLOW_RAIN_MAN);
    let yaku_type = match (brights.len(), has_rain) {
        (5, _) => YakuType::Gokou,
        (4, true) => YakuType::AmeShikou,
        (4, false) => YakuType::Shikou,
        (3, false) => YakuType::Sankou,
        _ => return None,
    };
    Some((yaku_type, brights))
}

fn counted(cards: Vec<CardId>, threshold: usize) -> Option<(Vec<CardId>, u32)> {
    (cards.len() >= threshold).then(|| {
        let extra = (cards.len() - threshold) as u32;
        (cards, extra)
    })
}

/// Every yaku present in `depository`, filtered and priced by the ruleset.
pub fn detect_yaku(depository: &BTreeSet<CardId>, rules: &Ruleset) -> Vec<Yaku> {
    // (type, contributing cards, points on top of the base)
    let mut found: Vec<(YakuType, Vec<CardId>, u32)> = Vec::new();

    if let Some((t, cards)) = bright_yaku(depository) {
        found.push((t, cards, 0));
    }
    if holds_all(depository, &BOAR_DEER_BUTTERFLY) {
        found.push((YakuType::Inoshikacho, BOAR_DEER_BUTTERFLY.to_vec(), 0));
    }
    if holds_all(depository, &[CHERRY_CURTAIN, CHRYSANTHEMUM_SAKE_CUP]) {
        found.push((
            YakuType::HanamiZake,
            vec![CHERRY_CURTAIN, CHRYSANTHEMUM_SAKE_CUP],
            0,
        ));
    }
    if holds_all(depository, &[SUSUKI_MOON, CHRYSANTHEMUM_SAKE_CUP]) {
        found.push((
            YakuType::TsukimiZake,
            vec![SUSUKI_MOON, CHRYSANTHEMUM_SAKE_CUP],
            0,
        ));
    }
    if holds_all(depository, &POEM_RIBBONS) {
        found.push((YakuType::Akatan, POEM_RIBBONS.to_vec(), 0));
    }
    if holds_all(depository, &BLUE_RIBBONS) {
        found.push((YakuType::Aotan, BLUE_RIBBONS.to_vec(), 0));
    }
    if let Some((cards, extra)) = counted(of_category(depository, CardCategory::Animal), TANE_THRESHOLD) {
        found.push((YakuType::Tane, cards, extra));
    }
    if let Some((cards, extra)) =
        counted(of_category(depository, CardCategory::Ribbon), TANZAKU_THRESHOLD)
    {
        found.push((YakuType::Tanzaku, cards, extra));
    }
    if let Some((cards, extra)) = counted(of_category(depository, CardCategory::Plain), KASU_THRESHOLD) {
        found.push((YakuType::Kasu, cards, extra));
    }

    found
        .into_iter()
        .filter_map(|(yaku_type, contributing_cards, extra)| {
            let setting = rules.yaku_setting(yaku_type);
            setting.enabled.then(|| Yaku {
                yaku_type,
                base_points: setting.base_points + extra,
                contributing_cards,
            })
        })
        .collect()
}

/// Entries of `current` that are new by type, or worth more than before.
pub fn detect_new_yaku(previous: &[Yaku], current: &[Yaku]) -> Vec<Yaku> {
    current
        .iter()
        .filter(|y| {
            previous
                .iter()
                .find(|p| p.yaku_type == y.yaku_type)
                .map_or(true, |p| y.base_points > p.base_points)
        })
        .cloned()
        .collect()
}
