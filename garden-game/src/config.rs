//! Tunable garden rules with validation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_SEED_COUNT, HARVEST_NOTICE_DELAY_MS, MAX_SEEDS, MIN_COMPLETE_TIME_MS,
    NOTICE_DURATION_MS, SEED_HIGHLIGHT_MS, STORAGE_NAMESPACE,
};

/// Rules governing the seed bank, harvest timing and storage keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenConfig {
    #[serde(default = "GardenConfig::default_max_seeds")]
    pub max_seeds: usize,
    #[serde(default = "GardenConfig::default_seed_count")]
    pub default_seed_count: usize,
    #[serde(default = "GardenConfig::default_min_complete_ms")]
    pub min_complete_ms: u64,
    #[serde(default = "GardenConfig::default_highlight_ms")]
    pub highlight_ms: u64,
    #[serde(default = "GardenConfig::default_harvest_notice_delay_ms")]
    pub harvest_notice_delay_ms: u64,
    #[serde(default = "GardenConfig::default_notice_duration_ms")]
    pub notice_duration_ms: u64,
    #[serde(default = "GardenConfig::default_storage_namespace")]
    pub storage_namespace: String,
}

impl GardenConfig {
    #[must_use]
    pub const fn default_max_seeds() -> usize {
        MAX_SEEDS
    }

    #[must_use]
    pub const fn default_seed_count() -> usize {
        DEFAULT_SEED_COUNT
    }

    #[must_use]
    pub const fn default_min_complete_ms() -> u64 {
        MIN_COMPLETE_TIME_MS
    }

    #[must_use]
    pub const fn default_highlight_ms() -> u64 {
        SEED_HIGHLIGHT_MS
    }

    #[must_use]
    pub const fn default_harvest_notice_delay_ms() -> u64 {
        HARVEST_NOTICE_DELAY_MS
    }

    #[must_use]
    pub const fn default_notice_duration_ms() -> u64 {
        NOTICE_DURATION_MS
    }

    #[must_use]
    pub fn default_storage_namespace() -> String {
        STORAGE_NAMESPACE.to_string()
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the seed bank has no capacity, the starter
    /// set would overflow it, or the storage namespace is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_seeds == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.default_seed_count > self.max_seeds {
            return Err(ConfigError::StarterSeedsExceedCapacity {
                count: self.default_seed_count,
                max: self.max_seeds,
            });
        }
        if self.storage_namespace.trim().is_empty() {
            return Err(ConfigError::EmptyNamespace);
        }
        Ok(())
    }

    /// Fully-qualified storage key for one persisted slice.
    #[must_use]
    pub fn storage_key(&self, slice: &str) -> String {
        format!("{}:{slice}", self.storage_namespace)
    }
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            max_seeds: Self::default_max_seeds(),
            default_seed_count: Self::default_seed_count(),
            min_complete_ms: Self::default_min_complete_ms(),
            highlight_ms: Self::default_highlight_ms(),
            harvest_notice_delay_ms: Self::default_harvest_notice_delay_ms(),
            notice_duration_ms: Self::default_notice_duration_ms(),
            storage_namespace: Self::default_storage_namespace(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_seeds must be at least 1")]
    ZeroCapacity,
    #[error("default_seed_count {count} exceeds max_seeds {max}")]
    StarterSeedsExceedCapacity { count: usize, max: usize },
    #[error("storage_namespace must not be empty")]
    EmptyNamespace,
}
