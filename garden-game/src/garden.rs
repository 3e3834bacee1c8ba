//! The garden state machine: seed bank, plants, harvest rolls and the dex.
use log::{debug, error, info};
use rand::Rng;
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::KeyValueStore;
use crate::clock::Clock;
use crate::config::{ConfigError, GardenConfig};
use crate::dex::Dex;
use crate::growth::GrowthStage;
use crate::model::{GardenState, Plant, PlantId, PlantStatus, Position, Seed, SeedId, Settings};
use crate::notice::{
    MSG_ALREADY_HARVESTED, MSG_BANK_FULL, MSG_BONUS_SEED, MSG_NOT_STARTED, MSG_NOTHING_TO_CLEAR,
    MSG_PLANT_REMOVED, MSG_TOO_EARLY, Notice, cleared_message, harvested_message,
};
use crate::persist::{self, PersistError};
use crate::rewards;
use crate::rng::{CountingRng, RngBundle};
use crate::species::{Species, SpeciesId, Tier};
use crate::timers::TimerRegistry;

/// Why a harvest attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestRejection {
    NotFound,
    NotStarted,
    TooEarly { remaining_ms: u64 },
    AlreadyHarvested,
}

impl HarvestRejection {
    /// Message shown to the player; unknown plants are rejected silently.
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::NotFound => None,
            Self::NotStarted => Some(MSG_NOT_STARTED),
            Self::TooEarly { .. } => Some(MSG_TOO_EARLY),
            Self::AlreadyHarvested => Some(MSG_ALREADY_HARVESTED),
        }
    }

    fn notice(self) -> Option<Notice> {
        match self {
            Self::NotFound => None,
            Self::NotStarted | Self::TooEarly { .. } => self.message().map(Notice::warning),
            Self::AlreadyHarvested => self.message().map(Notice::info),
        }
    }
}

/// Everything the shell needs to present a successful harvest.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestOutcome {
    pub dex_key: SpeciesId,
    pub species: &'static Species,
    pub plant_id: PlantId,
    pub position: Position,
    pub tier: Tier,
    /// Species the reveal animation must land on.
    pub final_species: &'static Species,
    /// Reward tier rolled, whether or not the bank had room for it.
    pub reward_tier: Tier,
    pub reward_granted: bool,
    pub bonus_seed: bool,
}

/// How [`Garden::load`] obtained its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    FirstRun,
    /// The stored data could not be read and the garden was reset.
    Recovered,
}

/// Deferred effects scheduled by garden operations.
#[derive(Debug, Clone, PartialEq)]
pub enum GardenEvent {
    ClearSeedHighlight(SeedId),
    Notify(Notice),
}

/// Changes applied during a [`Garden::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub seed_bank_changed: bool,
    pub notices_released: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeedSlot {
    Empty,
    Filled { tier: Tier, highlighted: bool },
}

/// Seed bank summary for the HUD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedBankView {
    pub slots: Vec<SeedSlot>,
    pub seed_count: usize,
    pub plant_count: usize,
}

/// Sole owner of the persisted garden. Every mutation is saved before it
/// returns; save failures are logged and the in-memory state stays
/// authoritative.
#[derive(Debug)]
pub struct Garden<S, C> {
    state: GardenState,
    config: GardenConfig,
    store: S,
    clock: C,
    rng: RngBundle,
    timers: TimerRegistry<GardenEvent>,
    notices: Vec<Notice>,
}

impl<S, C> Garden<S, C>
where
    S: KeyValueStore,
    C: Clock,
{
    /// Build an empty garden. Call [`Garden::load`] to read stored state.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation.
    pub fn new(store: S, clock: C, config: GardenConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GardenState::default(),
            config,
            store,
            clock,
            rng: RngBundle::from_user_seed(seed),
            timers: TimerRegistry::new(),
            notices: Vec::new(),
        })
    }

    /// Build and immediately load.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `config` fails validation.
    pub fn open(store: S, clock: C, config: GardenConfig, seed: u64) -> Result<Self, ConfigError> {
        let mut garden = Self::new(store, clock, config, seed)?;
        garden.load();
        Ok(garden)
    }

    /// Read every slice from the store. A first run receives the starter
    /// seeds; unreadable data resets the garden.
    pub fn load(&mut self) -> LoadOutcome {
        match persist::load_snapshot(&self.store, &self.config) {
            Ok(snapshot) => {
                self.state = snapshot.state;
                if snapshot.first_run {
                    info!(
                        "new garden detected, granting {} starter seeds",
                        self.config.default_seed_count
                    );
                    self.state.seeds = self.default_seeds();
                    self.persist();
                    LoadOutcome::FirstRun
                } else {
                    debug!(
                        "restored garden with {} seeds and {} plants",
                        self.state.seeds.len(),
                        self.state.plants.len()
                    );
                    LoadOutcome::Restored
                }
            }
            Err(err) => {
                error!("failed to load garden state: {err}");
                self.reset();
                LoadOutcome::Recovered
            }
        }
    }

    /// Persist the full snapshot.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` when encoding or the backend write fails.
    pub fn save(&self) -> Result<(), PersistError> {
        persist::save_snapshot(&self.store, &self.config, &self.state)
    }

    fn persist(&self) {
        if let Err(err) = self.save() {
            error!("failed to save garden state: {err}");
        }
    }

    // Seed bank -------------------------------------------------------------

    /// Remove and return the oldest seed.
    pub fn consume_seed(&mut self) -> Option<Seed> {
        if self.state.seeds.is_empty() {
            return None;
        }
        let seed = self.state.seeds.remove(0);
        self.persist();
        Some(seed)
    }

    /// Append a seed unless the bank is full. A highlighted seed loses its
    /// highlight after the configured delay.
    pub fn add_seed(&mut self, tier: Tier, highlight: bool) -> bool {
        if self.state.seeds.len() >= self.config.max_seeds {
            self.notify(Notice::warning(MSG_BANK_FULL));
            return false;
        }
        let now = self.now();
        let id = self.fresh_seed_id(now);
        self.state.seeds.push(Seed {
            id: id.clone(),
            tier,
            is_new: highlight,
        });
        self.persist();
        if highlight {
            self.timers.schedule(
                now.saturating_add(self.config.highlight_ms),
                GardenEvent::ClearSeedHighlight(id),
            );
        }
        true
    }

    // Plants ----------------------------------------------------------------

    /// Plant `seed` at `(x, y)`. There is no cap on the number of plants.
    pub fn plant_seed(&mut self, x: f64, y: f64, title: &str, seed: Seed) -> PlantId {
        let now = self.now();
        let id = self.fresh_plant_id(now);
        self.state.plants.push(Plant {
            id: id.clone(),
            title: title.to_string(),
            tier: seed.tier,
            position: Position::new(x, y),
            planted_at: now,
            status: PlantStatus::Dormant,
        });
        self.persist();
        id
    }

    /// Start the growth timer. Returns `false` for unknown or already growing
    /// plants.
    pub fn start_growth(&mut self, id: &PlantId) -> bool {
        let now = self.now();
        let Some(plant) = self.state.plant_mut(id) else {
            return false;
        };
        if plant.is_growing() {
            return false;
        }
        plant.status = PlantStatus::Growing { started_at: now };
        self.persist();
        true
    }

    /// Harvest a plant: roll its species, record the discovery and roll a
    /// seed reward.
    ///
    /// # Errors
    ///
    /// Returns the `HarvestRejection` explaining why nothing changed. Every
    /// rejection except `NotFound` also queues a notice.
    pub fn complete_plant(&mut self, id: &PlantId) -> Result<HarvestOutcome, HarvestRejection> {
        let now = self.now();
        let min_complete_ms = self.config.min_complete_ms;
        let (tier, position, started_at) = match self.check_harvest(id, now, min_complete_ms) {
            Ok(found) => found,
            Err(rejection) => {
                if let Some(notice) = rejection.notice() {
                    self.notify(notice);
                }
                return Err(rejection);
            }
        };

        let dex_key = rewards::roll_species(tier, self.rng.species());
        if let Some(plant) = self.state.plant_mut(id) {
            plant.status = PlantStatus::Harvested {
                started_at,
                harvested_at: now,
                species: dex_key,
            };
        }
        let discoveries = self.state.dex.record(dex_key);
        let species = dex_key.species();
        debug!(
            "harvested {} ({dex_key}) from {id}, discovered {discoveries} time(s)",
            species.name
        );

        let reward_tier = self.roll_seed_reward(tier);
        let reward_granted = self.add_seed(reward_tier, true);

        let bonus_seed = self.state.seeds.is_empty();
        if bonus_seed {
            self.add_seed(Tier::Basic, false);
            self.notify(Notice::info(MSG_BONUS_SEED));
        }

        self.persist();
        self.timers.schedule(
            now.saturating_add(self.config.harvest_notice_delay_ms),
            GardenEvent::Notify(
                Notice::success(harvested_message(species.name))
                    .with_duration(self.config.notice_duration_ms),
            ),
        );

        Ok(HarvestOutcome {
            dex_key,
            species,
            plant_id: id.clone(),
            position,
            tier,
            final_species: species,
            reward_tier,
            reward_granted,
            bonus_seed,
        })
    }

    fn check_harvest(
        &self,
        id: &PlantId,
        now: u64,
        min_complete_ms: u64,
    ) -> Result<(Tier, Position, u64), HarvestRejection> {
        let plant = self.state.plant(id).ok_or(HarvestRejection::NotFound)?;
        let started_at = plant
            .status
            .started_at()
            .ok_or(HarvestRejection::NotStarted)?;
        let elapsed = now.saturating_sub(started_at);
        if elapsed < min_complete_ms {
            return Err(HarvestRejection::TooEarly {
                remaining_ms: min_complete_ms - elapsed,
            });
        }
        if plant.is_harvested() {
            return Err(HarvestRejection::AlreadyHarvested);
        }
        Ok((plant.tier, plant.position, started_at))
    }

    /// Draw a reward tier for a harvest of `tier` from the reward stream.
    pub fn roll_seed_reward(&mut self, tier: Tier) -> Tier {
        rewards::roll_seed_reward(tier, self.rng.reward())
    }

    /// Remove a plant without refunding its seed.
    pub fn remove_plant(&mut self, id: &PlantId) -> bool {
        let Some(index) = self.state.plants.iter().position(|plant| &plant.id == id) else {
            return false;
        };
        self.state.plants.remove(index);
        self.persist();
        self.notify(Notice::warning(MSG_PLANT_REMOVED));
        true
    }

    /// Remove every harvested plant and return how many were removed.
    pub fn clear_harvested(&mut self) -> usize {
        let before = self.state.plants.len();
        self.state.plants.retain(|plant| !plant.is_harvested());
        let removed = before - self.state.plants.len();
        if removed > 0 {
            self.persist();
            self.notify(Notice::success(cleared_message(removed)));
        } else {
            self.notify(Notice::info(MSG_NOTHING_TO_CLEAR));
        }
        removed
    }

    /// Replace the bank with starter seeds and wipe plants and the dex.
    /// Settings survive a reset.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.state.seeds = self.default_seeds();
        self.state.plants.clear();
        self.state.dex = Dex::default();
        self.persist();
    }

    // Derived reads ---------------------------------------------------------

    #[must_use]
    pub fn growth_stage(&self, plant: &Plant) -> GrowthStage {
        plant.growth_stage_at(self.now())
    }

    /// Remaining ms until `id` may be harvested; `None` unless it is growing.
    #[must_use]
    pub fn harvest_ready_in(&self, id: &PlantId) -> Option<u64> {
        self.state
            .plant(id)?
            .harvest_ready_in(self.now(), self.config.min_complete_ms)
    }

    #[must_use]
    pub fn plant_at(&self, x: f64, y: f64) -> Option<&Plant> {
        self.state.plant_at(x, y)
    }

    #[must_use]
    pub fn plant(&self, id: &PlantId) -> Option<&Plant> {
        self.state.plant(id)
    }

    #[must_use]
    pub fn seed_bank(&self) -> SeedBankView {
        let slots = (0..self.config.max_seeds)
            .map(|idx| {
                self.state
                    .seeds
                    .get(idx)
                    .map_or(SeedSlot::Empty, |seed| SeedSlot::Filled {
                        tier: seed.tier,
                        highlighted: seed.is_new,
                    })
            })
            .collect();
        SeedBankView {
            slots,
            seed_count: self.state.seeds.len(),
            plant_count: self.state.plants.len(),
        }
    }

    // Settings --------------------------------------------------------------

    pub fn set_sfx(&mut self, enabled: bool) {
        self.state.settings.sfx = enabled;
        self.persist();
    }

    pub fn set_animations(&mut self, enabled: bool) {
        self.state.settings.animations = enabled;
        self.persist();
    }

    // Deferred effects ------------------------------------------------------

    /// Fire due timers: clear seed highlights and release deferred notices.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        for event in self.timers.drain_due(self.now()) {
            match event {
                GardenEvent::ClearSeedHighlight(id) => {
                    if let Some(seed) = self.state.seeds.iter_mut().find(|seed| seed.id == id)
                        && seed.is_new
                    {
                        seed.is_new = false;
                        report.seed_bank_changed = true;
                    }
                }
                GardenEvent::Notify(notice) => {
                    self.notices.push(notice);
                    report.notices_released += 1;
                }
            }
        }
        if report.seed_bank_changed {
            self.persist();
        }
        report
    }

    /// Drain notices emitted since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Queue a notice using the configured display duration.
    pub fn notify(&mut self, notice: Notice) {
        self.notices
            .push(notice.with_duration(self.config.notice_duration_ms));
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // Accessors -------------------------------------------------------------

    #[must_use]
    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    #[must_use]
    pub const fn state(&self) -> &GardenState {
        &self.state
    }

    #[must_use]
    pub fn seeds(&self) -> &[Seed] {
        &self.state.seeds
    }

    #[must_use]
    pub fn plants(&self) -> &[Plant] {
        &self.state.plants
    }

    #[must_use]
    pub const fn dex(&self) -> &Dex {
        &self.state.dex
    }

    #[must_use]
    pub const fn settings(&self) -> Settings {
        self.state.settings
    }

    #[must_use]
    pub const fn config(&self) -> &GardenConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Stream reserved for presentation shuffles.
    pub fn shuffle_rng(&mut self) -> &mut CountingRng<SmallRng> {
        self.rng.shuffle()
    }

    #[must_use]
    pub const fn rng(&self) -> &RngBundle {
        &self.rng
    }

    // Id generation ---------------------------------------------------------

    fn default_seeds(&self) -> Vec<Seed> {
        let now = self.now();
        (0..self.config.default_seed_count)
            .map(|idx| Seed {
                id: SeedId(format!("seed_{now}_{idx}")),
                tier: Tier::Basic,
                is_new: false,
            })
            .collect()
    }

    fn fresh_seed_id(&mut self, now: u64) -> SeedId {
        loop {
            let candidate = SeedId(format!("seed_{now}_{:08x}", self.rng.ids().r#gen::<u32>()));
            if !self.state.seeds.iter().any(|seed| seed.id == candidate) {
                return candidate;
            }
        }
    }

    fn fresh_plant_id(&mut self, now: u64) -> PlantId {
        loop {
            let candidate =
                PlantId(format!("plant_{now}_{:08x}", self.rng.ids().r#gen::<u32>()));
            if self.state.plant(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
