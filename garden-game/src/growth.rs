//! Growth stages derived from time elapsed since growth started.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    STAGE_FULL_BLOOM_MS, STAGE_MATURE_PLANT_MS, STAGE_SEEDLING_MS, STAGE_SPROUT_MS,
    STAGE_YOUNG_PLANT_MS,
};

/// Six ordered growth stages; the derived ordering follows maturity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    #[default]
    Seed,
    Sprout,
    Seedling,
    YoungPlant,
    MaturePlant,
    FullBloom,
}

impl GrowthStage {
    pub const ALL: [Self; 6] = [
        Self::Seed,
        Self::Sprout,
        Self::Seedling,
        Self::YoungPlant,
        Self::MaturePlant,
        Self::FullBloom,
    ];

    /// Minimum elapsed growth time for this stage.
    #[must_use]
    pub const fn threshold_ms(self) -> u64 {
        match self {
            Self::Seed => 0,
            Self::Sprout => STAGE_SPROUT_MS,
            Self::Seedling => STAGE_SEEDLING_MS,
            Self::YoungPlant => STAGE_YOUNG_PLANT_MS,
            Self::MaturePlant => STAGE_MATURE_PLANT_MS,
            Self::FullBloom => STAGE_FULL_BLOOM_MS,
        }
    }

    /// Numeric stage index, 0 for a dormant seed.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Sprout => "Sprout",
            Self::Seedling => "Seedling",
            Self::YoungPlant => "Young Plant",
            Self::MaturePlant => "Mature Plant",
            Self::FullBloom => "Full Bloom",
        }
    }

    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Seed => "🌰",
            Self::Sprout => "🌱",
            Self::Seedling => "🌿",
            Self::YoungPlant => "🌾",
            Self::MaturePlant => "🌲",
            Self::FullBloom => "🌺",
        }
    }

    /// Highest stage whose threshold is at or below `elapsed_ms`.
    #[must_use]
    pub fn for_elapsed(elapsed_ms: u64) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|stage| stage.threshold_ms() <= elapsed_ms)
            .unwrap_or(Self::Seed)
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HOUR_MS, MINUTE_MS};

    #[test]
    fn thresholds_select_highest_reached_stage() {
        assert_eq!(GrowthStage::for_elapsed(0), GrowthStage::Seed);
        assert_eq!(GrowthStage::for_elapsed(20 * MINUTE_MS - 1), GrowthStage::Seed);
        assert_eq!(GrowthStage::for_elapsed(20 * MINUTE_MS), GrowthStage::Sprout);
        assert_eq!(GrowthStage::for_elapsed(HOUR_MS), GrowthStage::Seedling);
        assert_eq!(GrowthStage::for_elapsed(3 * HOUR_MS), GrowthStage::YoungPlant);
        assert_eq!(GrowthStage::for_elapsed(4 * HOUR_MS), GrowthStage::MaturePlant);
        assert_eq!(GrowthStage::for_elapsed(30 * 24 * HOUR_MS), GrowthStage::FullBloom);
    }

    #[test]
    fn stage_is_monotonic_in_elapsed_time() {
        let mut previous = GrowthStage::Seed;
        for minute in 0..(26 * 60) {
            let stage = GrowthStage::for_elapsed(minute * MINUTE_MS);
            assert!(stage >= previous);
            previous = stage;
        }
        assert_eq!(previous, GrowthStage::FullBloom);
    }

    #[test]
    fn indices_follow_declaration_order() {
        for (idx, stage) in GrowthStage::ALL.iter().enumerate() {
            assert_eq!(usize::from(stage.index()), idx);
        }
        assert_eq!(GrowthStage::YoungPlant.to_string(), "Young Plant");
    }
}
