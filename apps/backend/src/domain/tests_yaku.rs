use std::collections::BTreeSet;

use crate::domain::fixtures::CardFixtures;
use crate::domain::rules::{Ruleset, YakuSetting, YakuType};
use crate::domain::yaku::{detect_new_yaku, detect_yaku, total_points, Yaku};
use crate::domain::CardId;

fn pile(codes: &[&str]) -> BTreeSet<CardId> {
    CardFixtures::parse_hardcoded(codes).into_iter().collect()
}

fn types(yaku: &[Yaku]) -> Vec<YakuType> {
    yaku.iter().map(|y| y.yaku_type).collect()
}

fn points_of(yaku: &[Yaku], t: YakuType) -> Option<u32> {
    yaku.iter().find(|y| y.yaku_type == t).map(|y| y.base_points)
}

#[test]
fn empty_pile_has_no_yaku() {
    assert!(detect_yaku(&BTreeSet::new(), &Ruleset::default()).is_empty());
}

#[test]
fn five_brights_is_only_gokou() {
    let found = detect_yaku(&pile(&["0111", "0311", "0811", "1111", "1211"]), &Ruleset::default());
    assert_eq!(types(&found), vec![YakuType::Gokou]);
    assert_eq!(total_points(&found), 15);
}

#[test]
fn four_brights_split_on_rain() {
    let dry = detect_yaku(&pile(&["0111", "0311", "0811", "1211"]), &Ruleset::default());
    assert_eq!(types(&dry), vec![YakuType::Shikou]);
    assert_eq!(points_of(&dry, YakuType::Shikou), Some(10));

    let wet = detect_yaku(&pile(&["0111", "0311", "0811", "1111"]), &Ruleset::default());
    assert_eq!(types(&wet), vec![YakuType::AmeShikou]);
    assert_eq!(points_of(&wet, YakuType::AmeShikou), Some(8));
}

#[test]
fn three_brights_with_rain_score_nothing() {
    let with_rain = detect_yaku(&pile(&["0111", "1111", "1211"]), &Ruleset::default());
    assert!(with_rain.is_empty());

    let sankou = detect_yaku(&pile(&["0111", "0311", "1211"]), &Ruleset::default());
    assert_eq!(types(&sankou), vec![YakuType::Sankou]);
    assert_eq!(total_points(&sankou), 6);
}

#[test]
fn sake_cup_can_serve_both_viewing_yaku() {
    let found = detect_yaku(&pile(&["0311", "0811", "0921"]), &Ruleset::default());
    assert!(types(&found).contains(&YakuType::HanamiZake));
    assert!(types(&found).contains(&YakuType::TsukimiZake));
    assert_eq!(total_points(&found), 6);
}

#[test]
fn ribbon_sets_and_animal_trio() {
    let found = detect_yaku(
        &pile(&["0131", "0231", "0331", "0631", "0931", "1031", "0621", "0721", "1021"]),
        &Ruleset::default(),
    );
    assert_eq!(points_of(&found, YakuType::Akatan), Some(5));
    assert_eq!(points_of(&found, YakuType::Aotan), Some(5));
    assert_eq!(points_of(&found, YakuType::Inoshikacho), Some(5));
    // six ribbons
    assert_eq!(points_of(&found, YakuType::Tanzaku), Some(2));
    assert_eq!(points_of(&found, YakuType::Tane), None);
}

#[test]
fn counted_yaku_grow_linearly() {
    let tane5 = pile(&["0221", "0421", "0521", "0621", "0721"]);
    assert_eq!(
        points_of(&detect_yaku(&tane5, &Ruleset::default()), YakuType::Tane),
        Some(1)
    );

    let kasu = pile(&[
        "0141", "0142", "0241", "0242", "0341", "0342", "0441", "0442", "0541", "0542", "0641",
        "0642",
    ]);
    assert_eq!(
        points_of(&detect_yaku(&kasu, &Ruleset::default()), YakuType::Kasu),
        Some(3)
    );
}

#[test]
fn disabled_yaku_and_point_overrides() {
    let mut rules = Ruleset::default();
    rules.yaku_settings.insert(
        YakuType::Sankou,
        YakuSetting {
            enabled: false,
            base_points: 6,
        },
    );
    rules.yaku_settings.insert(
        YakuType::HanamiZake,
        YakuSetting {
            enabled: true,
            base_points: 5,
        },
    );
    let found = detect_yaku(&pile(&["0111", "0311", "1211", "0921"]), &rules);
    assert_eq!(types(&found), vec![YakuType::HanamiZake]);
    assert_eq!(total_points(&found), 5);
}

#[test]
fn new_yaku_covers_additions_and_upgrades() {
    let rules = Ruleset::default();
    let before = detect_yaku(&pile(&["0221", "0421", "0521", "0621", "0721"]), &rules);
    let after = detect_yaku(
        &pile(&["0221", "0421", "0521", "0621", "0721", "1021"]),
        &rules,
    );
    let new = detect_new_yaku(&before, &after);
    assert_eq!(types(&new), vec![YakuType::Inoshikacho, YakuType::Tane]);
    assert_eq!(points_of(&new, YakuType::Tane), Some(2));

    assert!(detect_new_yaku(&after, &after).is_empty());
}
