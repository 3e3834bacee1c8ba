//! Productivity Garden Core
//!
//! Platform-agnostic logic for the Productivity Garden task tracker: seeds,
//! growth, harvest rolls, the discovery log and the render loop. Storage,
//! drawing, images, sound and time are reached through traits so the browser
//! shell and headless tools can plug in their own backends.

pub mod assets;
pub mod audio;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dex;
pub mod garden;
pub mod growth;
pub mod harvest_anim;
pub mod interaction;
pub mod model;
pub mod notice;
pub mod persist;
pub mod render;
pub mod rewards;
pub mod rng;
pub mod session;
pub mod species;
pub mod timers;

// Re-export commonly used types
pub use assets::{ImageCache, StaticImages, preload_paths};
pub use audio::{AudioManager, RecordingPlayer, Sound, SoundPlayer};
pub use canvas::{Canvas, DrawCommand, RecordingCanvas};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GardenConfig};
pub use dex::{Dex, DexEntry, DexSection};
pub use garden::{
    Garden, GardenEvent, HarvestOutcome, HarvestRejection, LoadOutcome, SeedBankView, SeedSlot,
    TickReport,
};
pub use growth::GrowthStage;
pub use harvest_anim::{CompletionHook, HarvestAnimator};
pub use interaction::{ClickTarget, PopoverView};
pub use model::{GardenState, Plant, PlantId, PlantStatus, Position, Seed, SeedId, Settings};
pub use notice::{Notice, NoticeLevel};
pub use persist::{LoadedSnapshot, MemoryStore, PersistError};
pub use render::GardenRenderer;
pub use rewards::{reward_distribution, reward_tier_for_roll, roll_seed_reward, roll_species};
pub use rng::RngBundle;
pub use session::{FrameReport, GardenSession, HoverView};
pub use species::{Species, SpeciesId, Tier};
pub use timers::{TimerHandle, TimerRegistry};

/// Trait for abstracting durable key-value storage
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + 'static;

    /// Read the raw value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Delete `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the removal.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    type Error = T::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        (**self).remove(key)
    }
}
