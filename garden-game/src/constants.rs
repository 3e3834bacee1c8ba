//! Centralized balance and presentation constants for the garden core.
//!
//! These values define the deterministic math for growth, harvest rolls and
//! the reveal animation. Keeping them together ensures that gameplay can only
//! be adjusted via code changes reviewed in version control.

// Time ---------------------------------------------------------------------
pub const MINUTE_MS: u64 = 60 * 1000;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;

// Seed bank and harvesting -------------------------------------------------
pub const MAX_SEEDS: usize = 5;
pub const DEFAULT_SEED_COUNT: usize = 5;
pub const MIN_COMPLETE_TIME_MS: u64 = 5 * MINUTE_MS;
pub const SEED_HIGHLIGHT_MS: u64 = 3_000;
pub const HARVEST_NOTICE_DELAY_MS: u64 = 2_000;
pub const NOTICE_DURATION_MS: u64 = 3_000;
pub const SPECIES_PER_TIER: u8 = 5;

// Growth stage thresholds (ms since growth started) -------------------------
pub const STAGE_SPROUT_MS: u64 = 20 * MINUTE_MS;
pub const STAGE_SEEDLING_MS: u64 = HOUR_MS;
pub const STAGE_YOUNG_PLANT_MS: u64 = 2 * HOUR_MS;
pub const STAGE_MATURE_PLANT_MS: u64 = 4 * HOUR_MS;
pub const STAGE_FULL_BLOOM_MS: u64 = 24 * HOUR_MS;

// Seed reward thresholds ----------------------------------------------------
pub const BASIC_TO_BASIC_BELOW: f64 = 0.50;
pub const RARE_TO_BASIC_BELOW: f64 = 0.25;
pub const RARE_TO_RARE_BELOW: f64 = 0.75;
pub const EXTINCT_TO_BASIC_BELOW: f64 = 0.25;
pub const EXTINCT_TO_RARE_BELOW: f64 = 0.50;

// Persistence ---------------------------------------------------------------
pub const STORAGE_NAMESPACE: &str = "pgarden:v1";
pub const STORAGE_SEEDS: &str = "seeds";
pub const STORAGE_PLANTS: &str = "plants";
pub const STORAGE_DEX: &str = "dex";
pub const STORAGE_SETTINGS: &str = "settings";

// Harvest reveal animation --------------------------------------------------
pub const ANIM_FRAME_MS: f64 = 150.0;
pub const ANIM_TOTAL_MS: u64 = 2_000;
pub const ANIM_CLEANUP_BUFFER_MS: u64 = 500;
pub const ANIM_FINAL_FRAMES: usize = 3;
pub const ANIM_EASE_SPLIT: f64 = 0.7;
pub const ANIM_MAX_SLOWDOWN: f64 = 3.0;
pub const ANIM_PULSE_RATE: f64 = 0.005;
pub const ANIM_PULSE_AMPLITUDE: f64 = 0.1;
pub const ANIM_GLOW_RADIUS: f64 = 40.0;
pub const ANIM_SPARKLE_COUNT: usize = 3;
pub const ANIM_SPARKLE_ORBIT: f64 = 35.0;
pub const ANIM_SPARKLE_SPIN_RATE: f64 = 0.002;
pub const ANIM_SPARKLE_TWINKLE_RATE: f64 = 0.01;
pub const ANIM_SPARKLE_BASE_SIZE: f64 = 2.0;
pub const ANIM_GLOW_ALPHA_SUFFIX: &str = "33";
pub const ANIM_IMAGE_SIZE: f64 = 70.0;
pub const ANIM_GLYPH_SIZE: f64 = 45.0;

// Garden rendering ----------------------------------------------------------
pub const PLANT_HIT_RADIUS: f64 = 30.0;
pub const HOVER_RING_RADIUS: f64 = 35.0;
pub const HOVER_RING_WIDTH: f64 = 3.0;
pub const HOVER_RING_COLOR: &str = "rgba(255, 255, 255, 0.5)";
pub const PLANT_GLYPH_SIZE: f64 = 40.0;
pub const PLANT_IMAGE_SIZE: f64 = 60.0;
pub const HARVESTED_ALPHA: f64 = 0.7;
pub const CHECKMARK_COLOR: &str = "#4caf50";
pub const CHECKMARK_WIDTH: f64 = 4.0;
pub const SPARKLE_COLOR: &str = "rgba(255, 255, 255, 0.8)";
pub const PLACEHOLDER_GLYPH: &str = "🌺";
pub const SKY_COLOR: &str = "#87ceeb";
pub const MEADOW_COLOR: &str = "#98fb98";

// Assets --------------------------------------------------------------------
pub const ASSET_ROOT: &str = "assets";
pub const BACKGROUND_ASSET: &str = "assets/garden.png";
pub const HARVEST_SOUND_ASSET: &str = "assets/harvest_sound.wav";
pub const HARVEST_SOUND_VOLUME: f64 = 0.5;
