//! Harvest rolls: which species grew and which seed tier is awarded.
use rand::Rng;

use crate::constants::{
    BASIC_TO_BASIC_BELOW, EXTINCT_TO_BASIC_BELOW, EXTINCT_TO_RARE_BELOW, RARE_TO_BASIC_BELOW,
    RARE_TO_RARE_BELOW, SPECIES_PER_TIER,
};
use crate::species::{SpeciesId, Tier};

/// Map a uniform roll in `[0, 1)` to the reward tier for a harvested `tier`.
#[must_use]
pub fn reward_tier_for_roll(tier: Tier, roll: f64) -> Tier {
    match tier {
        Tier::Basic => {
            if roll < BASIC_TO_BASIC_BELOW {
                Tier::Basic
            } else {
                Tier::Rare
            }
        }
        Tier::Rare => {
            if roll < RARE_TO_BASIC_BELOW {
                Tier::Basic
            } else if roll < RARE_TO_RARE_BELOW {
                Tier::Rare
            } else {
                Tier::Extinct
            }
        }
        Tier::Extinct => {
            if roll < EXTINCT_TO_BASIC_BELOW {
                Tier::Basic
            } else if roll < EXTINCT_TO_RARE_BELOW {
                Tier::Rare
            } else {
                Tier::Extinct
            }
        }
    }
}

/// Draw one value from `rng` and map it through the reward table.
pub fn roll_seed_reward<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> Tier {
    reward_tier_for_roll(tier, rng.r#gen::<f64>())
}

/// Uniformly pick one of the five species of `tier`.
pub fn roll_species<R: Rng + ?Sized>(tier: Tier, rng: &mut R) -> SpeciesId {
    SpeciesId {
        tier,
        index: rng.gen_range(1..=SPECIES_PER_TIER),
    }
}

/// Expected reward probabilities for `tier`, ordered basic, rare, extinct.
#[must_use]
pub fn reward_distribution(tier: Tier) -> [f64; 3] {
    match tier {
        Tier::Basic => [BASIC_TO_BASIC_BELOW, 1.0 - BASIC_TO_BASIC_BELOW, 0.0],
        Tier::Rare => [
            RARE_TO_BASIC_BELOW,
            RARE_TO_RARE_BELOW - RARE_TO_BASIC_BELOW,
            1.0 - RARE_TO_RARE_BELOW,
        ],
        Tier::Extinct => [
            EXTINCT_TO_BASIC_BELOW,
            EXTINCT_TO_RARE_BELOW - EXTINCT_TO_BASIC_BELOW,
            1.0 - EXTINCT_TO_RARE_BELOW,
        ],
    }
}
