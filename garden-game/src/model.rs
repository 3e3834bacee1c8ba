//! Persisted garden data: seeds, plants and settings.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::PLANT_HIT_RADIUS;
use crate::dex::Dex;
use crate::growth::GrowthStage;
use crate::species::{SpeciesId, Tier};

/// Opaque seed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedId(pub String);

/// Opaque plant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(pub String);

impl fmt::Display for SeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for SeedId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A seed waiting in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub id: SeedId,
    pub tier: Tier,
    /// Transient highlight shown after a reward lands in the bank.
    #[serde(default)]
    pub is_new: bool,
}

/// Garden coordinates in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether `(x, y)` lies within `radius` of this point, edge inclusive.
    #[must_use]
    pub fn within(self, x: f64, y: f64, radius: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= radius * radius
    }
}

/// Lifecycle of a planted task.
///
/// Each step carries the timestamps it depends on, so a harvested plant always
/// has a growth start and a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(
    tag = "state",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum PlantStatus {
    #[default]
    Dormant,
    Growing {
        started_at: u64,
    },
    Harvested {
        started_at: u64,
        harvested_at: u64,
        species: SpeciesId,
    },
}

impl PlantStatus {
    #[must_use]
    pub const fn started_at(self) -> Option<u64> {
        match self {
            Self::Dormant => None,
            Self::Growing { started_at } | Self::Harvested { started_at, .. } => Some(started_at),
        }
    }

    #[must_use]
    pub const fn is_growing(self) -> bool {
        !matches!(self, Self::Dormant)
    }

    #[must_use]
    pub const fn is_harvested(self) -> bool {
        matches!(self, Self::Harvested { .. })
    }

    #[must_use]
    pub const fn harvested_species(self) -> Option<SpeciesId> {
        match self {
            Self::Harvested { species, .. } => Some(species),
            _ => None,
        }
    }
}

/// A task planted in the garden.
///
/// Reads both the current record and the flat layout written by earlier
/// releases under the same storage keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredPlant")]
pub struct Plant {
    pub id: PlantId,
    pub title: String,
    pub tier: Tier,
    pub position: Position,
    pub planted_at: u64,
    #[serde(default)]
    pub status: PlantStatus,
}

impl Plant {
    #[must_use]
    pub const fn is_growing(&self) -> bool {
        self.status.is_growing()
    }

    #[must_use]
    pub const fn is_harvested(&self) -> bool {
        self.status.is_harvested()
    }

    /// Derived growth stage; frozen at the harvest instant once harvested.
    #[must_use]
    pub fn growth_stage_at(&self, now: u64) -> GrowthStage {
        match self.status {
            PlantStatus::Dormant => GrowthStage::Seed,
            PlantStatus::Growing { started_at } => {
                GrowthStage::for_elapsed(now.saturating_sub(started_at))
            }
            PlantStatus::Harvested {
                started_at,
                harvested_at,
                ..
            } => GrowthStage::for_elapsed(harvested_at.saturating_sub(started_at)),
        }
    }

    /// Milliseconds of growth so far, `None` while dormant.
    #[must_use]
    pub fn elapsed_growth(&self, now: u64) -> Option<u64> {
        self.status
            .started_at()
            .map(|started| now.saturating_sub(started))
    }

    /// Remaining wait before harvest is allowed, `Some(0)` when ready.
    ///
    /// `None` for dormant or already harvested plants.
    #[must_use]
    pub fn harvest_ready_in(&self, now: u64, min_complete_ms: u64) -> Option<u64> {
        match self.status {
            PlantStatus::Growing { started_at } => {
                Some(min_complete_ms.saturating_sub(now.saturating_sub(started_at)))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.position.within(x, y, PLANT_HIT_RADIUS)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPlant {
    Current(PlantRecord),
    Flat(FlatPlant),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlantRecord {
    id: PlantId,
    title: String,
    tier: Tier,
    position: Position,
    planted_at: u64,
    #[serde(default)]
    status: PlantStatus,
}

/// Flat plant layout: coordinates inline and lifecycle as loose flags.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatPlant {
    id: PlantId,
    title: String,
    tier: Tier,
    x: f64,
    y: f64,
    planted_at: u64,
    #[serde(default)]
    is_growing: bool,
    #[serde(default)]
    start_time: Option<u64>,
    #[serde(default)]
    harvested: bool,
    #[serde(default)]
    harvested_at: Option<u64>,
    #[serde(default)]
    harvested_type: Option<u8>,
}

impl TryFrom<FlatPlant> for Plant {
    type Error = String;

    fn try_from(flat: FlatPlant) -> Result<Self, Self::Error> {
        let started_at = flat.start_time.unwrap_or(flat.planted_at);
        let status = if flat.harvested {
            let index = flat
                .harvested_type
                .ok_or_else(|| format!("harvested plant `{}` has no species", flat.id))?;
            let species = SpeciesId::new(flat.tier, index).ok_or_else(|| {
                format!("harvested plant `{}` has species index {index}", flat.id)
            })?;
            PlantStatus::Harvested {
                started_at,
                harvested_at: flat.harvested_at.unwrap_or(started_at),
                species,
            }
        } else if flat.is_growing {
            PlantStatus::Growing { started_at }
        } else {
            PlantStatus::Dormant
        };
        Ok(Self {
            id: flat.id,
            title: flat.title,
            tier: flat.tier,
            position: Position::new(flat.x, flat.y),
            planted_at: flat.planted_at,
            status,
        })
    }
}

impl TryFrom<StoredPlant> for Plant {
    type Error = String;

    fn try_from(stored: StoredPlant) -> Result<Self, Self::Error> {
        match stored {
            StoredPlant::Current(record) => Ok(Self {
                id: record.id,
                title: record.title,
                tier: record.tier,
                position: record.position,
                planted_at: record.planted_at,
                status: record.status,
            }),
            StoredPlant::Flat(flat) => Self::try_from(flat),
        }
    }
}

/// User preferences persisted alongside the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub sfx: bool,
    pub animations: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sfx: true,
            animations: true,
        }
    }
}

/// The four persisted slices owned by the garden.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GardenState {
    pub seeds: Vec<Seed>,
    pub plants: Vec<Plant>,
    pub dex: Dex,
    pub settings: Settings,
}

impl GardenState {
    #[must_use]
    pub fn plant(&self, id: &PlantId) -> Option<&Plant> {
        self.plants.iter().find(|plant| &plant.id == id)
    }

    pub fn plant_mut(&mut self, id: &PlantId) -> Option<&mut Plant> {
        self.plants.iter_mut().find(|plant| &plant.id == id)
    }

    /// Topmost plant under `(x, y)`; later plants are drawn above earlier ones.
    #[must_use]
    pub fn plant_at(&self, x: f64, y: f64) -> Option<&Plant> {
        self.plants.iter().rev().find(|plant| plant.contains_point(x, y))
    }

    #[must_use]
    pub fn harvested_count(&self) -> usize {
        self.plants.iter().filter(|plant| plant.is_harvested()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HOUR_MS, MIN_COMPLETE_TIME_MS, MINUTE_MS};

    fn plant(id: &str, x: f64, y: f64) -> Plant {
        Plant {
            id: PlantId::from(id),
            title: id.to_string(),
            tier: Tier::Basic,
            position: Position::new(x, y),
            planted_at: 0,
            status: PlantStatus::Dormant,
        }
    }

    #[test]
    fn dormant_plants_stay_at_seed_stage() {
        let p = plant("a", 0.0, 0.0);
        assert_eq!(p.growth_stage_at(48 * HOUR_MS), GrowthStage::Seed);
        assert_eq!(p.harvest_ready_in(48 * HOUR_MS, MIN_COMPLETE_TIME_MS), None);
    }

    #[test]
    fn harvested_stage_is_frozen() {
        let mut p = plant("a", 0.0, 0.0);
        p.status = PlantStatus::Harvested {
            started_at: 1_000,
            harvested_at: 1_000 + 30 * MINUTE_MS,
            species: SpeciesId::new(Tier::Basic, 1).unwrap(),
        };
        assert_eq!(p.growth_stage_at(100 * HOUR_MS), GrowthStage::Sprout);
        assert!(p.is_growing());
        assert!(p.is_harvested());
    }

    #[test]
    fn readiness_counts_down_to_zero() {
        let mut p = plant("a", 0.0, 0.0);
        p.status = PlantStatus::Growing { started_at: 10_000 };
        assert_eq!(
            p.harvest_ready_in(10_000 + MINUTE_MS, MIN_COMPLETE_TIME_MS),
            Some(4 * MINUTE_MS)
        );
        assert_eq!(
            p.harvest_ready_in(10_000 + HOUR_MS, MIN_COMPLETE_TIME_MS),
            Some(0)
        );
    }

    #[test]
    fn hit_test_prefers_latest_plant_and_includes_edge() {
        let state = GardenState {
            plants: vec![plant("under", 100.0, 100.0), plant("over", 110.0, 100.0)],
            ..GardenState::default()
        };
        assert_eq!(state.plant_at(105.0, 100.0).unwrap().id, PlantId::from("over"));
        assert_eq!(state.plant_at(70.0, 100.0).unwrap().id, PlantId::from("under"));
        assert!(state.plant_at(69.0, 100.0).is_none());
    }

    #[test]
    fn status_serializes_as_tagged_record() {
        let status = PlantStatus::Growing { started_at: 5 };
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["state"], "growing");
        assert_eq!(json["startedAt"], 5);
    }

    #[test]
    fn harvested_record_uses_one_casing() {
        let status = PlantStatus::Harvested {
            started_at: 1,
            harvested_at: 2,
            species: SpeciesId::new(Tier::Rare, 3).unwrap(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"state":"harvested","startedAt":1,"harvestedAt":2,"species":"rare:3"}"#
        );
    }

    #[test]
    fn flat_plants_map_onto_lifecycle_states() {
        let raw = r#"[
            {"id":"a","title":"a","tier":"basic","x":1,"y":2,"plantedAt":10,"isGrowing":false,"startTime":null},
            {"id":"b","title":"b","tier":"basic","x":3,"y":4,"plantedAt":10,"isGrowing":true,"startTime":20},
            {"id":"c","title":"c","tier":"extinct","x":5,"y":6,"plantedAt":10,"isGrowing":true,"startTime":20,
             "harvested":true,"harvestedAt":90,"harvestedType":4}
        ]"#;
        let plants: Vec<Plant> = serde_json::from_str(raw).unwrap();
        assert_eq!(plants[0].status, PlantStatus::Dormant);
        assert_eq!(plants[0].position, Position::new(1.0, 2.0));
        assert_eq!(plants[1].status, PlantStatus::Growing { started_at: 20 });
        assert_eq!(
            plants[2].status,
            PlantStatus::Harvested {
                started_at: 20,
                harvested_at: 90,
                species: SpeciesId::new(Tier::Extinct, 4).unwrap(),
            }
        );
    }

    #[test]
    fn flat_harvest_with_unknown_species_is_rejected() {
        let raw = r#"{"id":"x","title":"x","tier":"rare","x":0,"y":0,"plantedAt":1,
            "isGrowing":true,"startTime":2,"harvested":true,"harvestedType":9}"#;
        assert!(serde_json::from_str::<Plant>(raw).is_err());
    }

    #[test]
    fn current_records_round_trip() {
        let mut p = plant("r", 7.0, 8.0);
        p.status = PlantStatus::Growing { started_at: 3 };
        let text = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<Plant>(&text).unwrap(), p);
    }
}
