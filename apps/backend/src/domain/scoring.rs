//! Scoring Service: round score under the doubling and Koi-Koi rules.

use serde::{Deserialize, Serialize};

use crate::domain::rules::{DOUBLING_THRESHOLD, KOI_KOI_MULTIPLIER};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_score: u32,
    pub koi_multiplier: u32,
    pub is_doubled: bool,
    pub final_score: u32,
}

/// Koi-Koi applies a flat ×2 however many times it was declared.
pub fn koi_multiplier(koikoi_declared: bool) -> u32 {
    if koikoi_declared {
        KOI_KOI_MULTIPLIER
    } else {
        1
    }
}

pub fn calculate_final_score(base_score: u32, koikoi_declared: bool) -> ScoreBreakdown {
    let is_doubled = base_score >= DOUBLING_THRESHOLD;
    let doubled_factor = if is_doubled { 2 } else { 1 };
    let koi_multiplier = koi_multiplier(koikoi_declared);
    ScoreBreakdown {
        base_score,
        koi_multiplier,
        is_doubled,
        final_score: base_score * doubled_factor * koi_multiplier,
    }
}

/// Instant-end wins score their fixed points with no multipliers.
pub fn instant_score(points: u32) -> ScoreBreakdown {
    ScoreBreakdown {
        base_score: points,
        koi_multiplier: 1,
        is_doubled: false,
        final_score: points,
    }
}
