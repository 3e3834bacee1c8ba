//! Discovery log counting harvested species.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::species::{SpeciesId, Tier};

/// Ordered discovery counts keyed by species. Counts only ever grow.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dex {
    counts: BTreeMap<SpeciesId, u32>,
}

impl Dex {
    /// Record one discovery and return the new count.
    pub fn record(&mut self, id: SpeciesId) -> u32 {
        let count = self.counts.entry(id).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    #[must_use]
    pub fn count(&self, id: SpeciesId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_discovered(&self, id: SpeciesId) -> bool {
        self.count(id) > 0
    }

    /// Number of distinct species discovered.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.counts.values().filter(|count| **count > 0).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, u32)> + '_ {
        self.counts.iter().map(|(id, count)| (*id, *count))
    }

    /// Per-tier view with undiscovered species masked.
    #[must_use]
    pub fn sections(&self) -> Vec<DexSection> {
        Tier::ALL
            .into_iter()
            .map(|tier| DexSection {
                tier,
                title: format!("{} Plants", tier.label()),
                color: tier.color(),
                entries: tier
                    .species()
                    .iter()
                    .map(|species| {
                        let id = SpeciesId {
                            tier,
                            index: species.index,
                        };
                        let count = self.count(id);
                        let discovered = count > 0;
                        DexEntry {
                            key: id.to_string(),
                            discovered,
                            count,
                            name: if discovered {
                                species.name.to_string()
                            } else {
                                UNDISCOVERED_NAME.to_string()
                            },
                            icon: discovered.then(|| id.icon_path()),
                            description: discovered.then(|| species.description.to_string()),
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

pub const UNDISCOVERED_NAME: &str = "???";

/// One tier block of the dex view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DexSection {
    pub tier: Tier,
    pub title: String,
    pub color: &'static str,
    pub entries: Vec<DexEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DexEntry {
    pub key: String,
    pub discovered: bool,
    pub count: u32,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}
