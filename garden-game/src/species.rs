//! Static plant tiers and the species table rolled on harvest.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ASSET_ROOT, SPECIES_PER_TIER};

/// Rarity tier shared by seeds, plants and species.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Basic,
    Rare,
    Extinct,
}

impl Tier {
    pub const ALL: [Self; 3] = [Self::Basic, Self::Rare, Self::Extinct];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Rare => "rare",
            Self::Extinct => "extinct",
        }
    }

    /// Title-cased label used in the dex and detail views.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Rare => "Rare",
            Self::Extinct => "Extinct",
        }
    }

    /// Accent colour used for glows and dex sections.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Basic => "#7cb342",
            Self::Rare => "#5e35b1",
            Self::Extinct => "#ff6f00",
        }
    }

    /// The five species that can be harvested from a plant of this tier.
    #[must_use]
    pub const fn species(self) -> &'static [Species; SPECIES_PER_TIER as usize] {
        match self {
            Self::Basic => &BASIC_SPECIES,
            Self::Rare => &RARE_SPECIES,
            Self::Extinct => &EXTINCT_SPECIES,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "rare" => Ok(Self::Rare),
            "extinct" => Ok(Self::Extinct),
            _ => Err(()),
        }
    }
}

/// Read-only species record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Species {
    /// 1-based position within the tier table.
    pub index: u8,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

/// Composite key naming one species: tier plus 1-based index.
///
/// Serialised as `"<tier>:<index>"` so it can key JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpeciesId {
    pub tier: Tier,
    pub index: u8,
}

impl SpeciesId {
    /// Build a key, rejecting indices outside `1..=5`.
    #[must_use]
    pub const fn new(tier: Tier, index: u8) -> Option<Self> {
        if index >= 1 && index <= SPECIES_PER_TIER {
            Some(Self { tier, index })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn species(self) -> &'static Species {
        &self.tier.species()[(self.index - 1) as usize]
    }

    /// Asset path following the `assets/<tier>/<icon>` convention.
    #[must_use]
    pub fn icon_path(self) -> String {
        icon_path(self.tier, self.species())
    }

    /// Every species key in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        Tier::ALL.into_iter().flat_map(|tier| {
            (1..=SPECIES_PER_TIER).map(move |index| Self { tier, index })
        })
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tier, self.index)
    }
}

impl FromStr for SpeciesId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tier, index) = s.split_once(':').ok_or(())?;
        let tier = tier.parse::<Tier>()?;
        let index = index.parse::<u8>().map_err(|_| ())?;
        Self::new(tier, index).ok_or(())
    }
}

impl Serialize for SpeciesId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpeciesId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|()| serde::de::Error::custom(format!("invalid species key `{raw}`")))
    }
}

#[must_use]
pub fn icon_path(tier: Tier, species: &Species) -> String {
    format!("{ASSET_ROOT}/{tier}/{}", species.icon)
}

const BASIC_SPECIES: [Species; 5] = [
    Species {
        index: 1,
        name: "Moonbell Fern",
        icon: "moonbell_fern.png",
        description: "A gentle fern that chimes softly in moonlight, said to bring peaceful dreams to those who tend it.",
    },
    Species {
        index: 2,
        name: "Dewdrop Moss",
        icon: "dewdrop_moss.png",
        description: "This humble moss collects morning dew that sparkles like tiny diamonds, beloved by hedge wizards for simple enchantments.",
    },
    Species {
        index: 3,
        name: "Whisperwort",
        icon: "whisper_wort.png",
        description: "Its leaves rustle with the faintest breeze, carrying messages between gardeners who know how to listen.",
    },
    Species {
        index: 4,
        name: "Glimmergrass",
        icon: "glimmergrass.png",
        description: "Common in magical meadows, each blade reflects light differently, creating a shimmering carpet effect.",
    },
    Species {
        index: 5,
        name: "Starlight Sprout",
        icon: "starlight_sprout.png",
        description: "A hardy little plant that glows faintly at night, often used to mark garden paths in wizarding communities.",
    },
];

const RARE_SPECIES: [Species; 5] = [
    Species {
        index: 1,
        name: "Crystalbark Sapling",
        icon: "crystalbark_sapling.png",
        description: "Its bark slowly crystallizes over time, producing fragments sought after by alchemists for focus potions.",
    },
    Species {
        index: 2,
        name: "Dreamweaver Vine",
        icon: "dreamweaver_vine.png",
        description: "These purple vines grow in spirals and are said to enhance lucid dreaming when dried and kept under pillows.",
    },
    Species {
        index: 3,
        name: "Phoenix Bloom",
        icon: "phoenix_bloom.png",
        description: "A flower that wilts and regrows daily, its petals carry warmth even in winter and are prized by herbalists.",
    },
    Species {
        index: 4,
        name: "Shadowleaf Orchid",
        icon: "shadowleaf_orchid.png",
        description: "Thrives in darkness rather than light, its midnight-blue flowers are essential in nocturnal spell work.",
    },
    Species {
        index: 5,
        name: "Timekeeper Rose",
        icon: "timekeeper_rose.png",
        description: "Each petal marks an hour of the day, opening and closing in perfect rhythm with the sun's journey.",
    },
];

const EXTINCT_SPECIES: [Species; 5] = [
    Species {
        index: 1,
        name: "Dragon's Breath Lily",
        icon: "dradonbreath_lily.png",
        description: "Once thought lost to the ages, this fiery bloom exhales warm mist and was treasured by ancient fire mages.",
    },
    Species {
        index: 2,
        name: "Void Lotus",
        icon: "void_lotus.png",
        description: "A legendary flower that absorbs all light around it, creating patches of absolute darkness in daylight gardens.",
    },
    Species {
        index: 3,
        name: "Eternal Frost Pine",
        icon: "eternalfrost_pine.png",
        description: "From the frozen north, this tree never thaws and its needles can preserve anything they touch indefinitely.",
    },
    Species {
        index: 4,
        name: "Starfall Mushroom",
        icon: "starfall_mushroom.png",
        description: "Said to grow only where meteors have fallen, these luminous fungi pulse with celestial energy.",
    },
    Species {
        index: 5,
        name: "Worldtree Seedling",
        icon: "worldtree_seedling.png",
        description: "The rarest of all plants, descended from the mythical tree that connects all realms of existence.",
    },
];
