//! Snapshot codec over a namespaced key-value store.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

use crate::KeyValueStore;
use crate::config::GardenConfig;
use crate::constants::{STORAGE_DEX, STORAGE_PLANTS, STORAGE_SEEDS, STORAGE_SETTINGS};
use crate::dex::Dex;
use crate::model::{GardenState, Plant, Seed, Settings};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage backend failed for `{key}`: {message}")]
    Backend { key: String, message: String },
    #[error("stored value under `{key}` is unreadable")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    fn backend(key: &str, err: &dyn std::error::Error) -> Self {
        Self::Backend {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result of reading every persisted slice.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSnapshot {
    pub state: GardenState,
    /// No seed, plant or dex record existed.
    pub first_run: bool,
}

/// Read all four slices. Missing slices fall back to empty defaults.
///
/// # Errors
///
/// Returns `PersistError` when the backend fails or a slice does not parse.
pub fn load_snapshot<S: KeyValueStore + ?Sized>(
    store: &S,
    config: &GardenConfig,
) -> Result<LoadedSnapshot, PersistError> {
    let seeds: Option<Vec<Seed>> = read_slice(store, &config.storage_key(STORAGE_SEEDS))?;
    let plants: Option<Vec<Plant>> = read_slice(store, &config.storage_key(STORAGE_PLANTS))?;
    let dex: Option<Dex> = read_slice(store, &config.storage_key(STORAGE_DEX))?;
    let settings: Option<Settings> = read_slice(store, &config.storage_key(STORAGE_SETTINGS))?;

    let first_run = seeds.is_none() && plants.is_none() && dex.is_none();
    Ok(LoadedSnapshot {
        state: GardenState {
            seeds: seeds.unwrap_or_default(),
            plants: plants.unwrap_or_default(),
            dex: dex.unwrap_or_default(),
            settings: settings.unwrap_or_default(),
        },
        first_run,
    })
}

/// Write all four slices, stopping at the first failure.
///
/// # Errors
///
/// Returns `PersistError` when encoding or the backend write fails.
pub fn save_snapshot<S: KeyValueStore + ?Sized>(
    store: &S,
    config: &GardenConfig,
    state: &GardenState,
) -> Result<(), PersistError> {
    write_slice(store, &config.storage_key(STORAGE_SEEDS), &state.seeds)?;
    write_slice(store, &config.storage_key(STORAGE_PLANTS), &state.plants)?;
    write_slice(store, &config.storage_key(STORAGE_DEX), &state.dex)?;
    write_slice(store, &config.storage_key(STORAGE_SETTINGS), &state.settings)?;
    Ok(())
}

fn read_slice<S, T>(store: &S, key: &str) -> Result<Option<T>, PersistError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = store
        .get(key)
        .map_err(|err| PersistError::backend(key, &err))?;
    match raw {
        None => Ok(None),
        // `null` is what a JSON writer leaves behind for a cleared slice.
        Some(text) if text.trim() == "null" => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| PersistError::Corrupt {
                key: key.to_string(),
                source,
            }),
    }
}

fn write_slice<S, T>(store: &S, key: &str, value: &T) -> Result<(), PersistError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|source| PersistError::Encode {
        key: key.to_string(),
        source,
    })?;
    store
        .set(key, &text)
        .map_err(|err| PersistError::backend(key, &err))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryStoreError {
    #[error("writes are disabled")]
    WritesDisabled,
}

/// In-memory store; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<Cell<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail, simulating a full or locked backend.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Insert a raw value, bypassing the read-only flag.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = MemoryStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        if self.read_only.get() {
            return Err(MemoryStoreError::WritesDisabled);
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.read_only.get() {
            return Err(MemoryStoreError::WritesDisabled);
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlantId, PlantStatus, Position, SeedId};
    use crate::species::{SpeciesId, Tier};

    fn sample_state() -> GardenState {
        let mut dex = Dex::default();
        dex.record(SpeciesId::new(Tier::Basic, 2).unwrap());
        GardenState {
            seeds: vec![Seed {
                id: SeedId::from("seed_1_0"),
                tier: Tier::Rare,
                is_new: true,
            }],
            plants: vec![Plant {
                id: PlantId::from("plant_1_a"),
                title: "Write report".to_string(),
                tier: Tier::Basic,
                position: Position::new(10.0, 10.0),
                planted_at: 1,
                status: PlantStatus::Harvested {
                    started_at: 2,
                    harvested_at: 400_000,
                    species: SpeciesId::new(Tier::Basic, 2).unwrap(),
                },
            }],
            dex,
            settings: Settings {
                sfx: false,
                animations: true,
            },
        }
    }

    #[test]
    fn empty_store_is_a_first_run() {
        let store = MemoryStore::new();
        let loaded = load_snapshot(&store, &GardenConfig::default()).unwrap();
        assert!(loaded.first_run);
        assert_eq!(loaded.state, GardenState::default());
    }

    #[test]
    fn snapshot_round_trips_under_namespaced_keys() {
        let store = MemoryStore::new();
        let cfg = GardenConfig::default();
        let state = sample_state();
        save_snapshot(&store, &cfg, &state).unwrap();
        assert!(store.raw("pgarden:v1:dex").unwrap().contains("basic:2"));
        let loaded = load_snapshot(&store, &cfg).unwrap();
        assert!(!loaded.first_run);
        assert_eq!(loaded.state, state);
    }

    #[test]
    fn any_single_slice_marks_a_returning_user() {
        let store = MemoryStore::new();
        store.insert_raw("pgarden:v1:dex", "{}");
        let loaded = load_snapshot(&store, &GardenConfig::default()).unwrap();
        assert!(!loaded.first_run);
        assert!(loaded.state.seeds.is_empty());
    }

    #[test]
    fn unreadable_slice_is_reported_as_corrupt() {
        let store = MemoryStore::new();
        store.insert_raw("pgarden:v1:plants", "[{not json");
        let err = load_snapshot(&store, &GardenConfig::default()).unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { ref key, .. } if key == "pgarden:v1:plants"));
    }

    #[test]
    fn read_only_backend_surfaces_backend_error() {
        let store = MemoryStore::new();
        store.set_read_only(true);
        let err = save_snapshot(&store, &GardenConfig::default(), &sample_state()).unwrap_err();
        assert!(matches!(err, PersistError::Backend { .. }));
        assert!(store.is_empty());
    }
}
