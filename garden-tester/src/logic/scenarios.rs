//! Headless scenarios run against the garden core.
use garden_game::constants::{MINUTE_MS, PLACEHOLDER_GLYPH};
use garden_game::persist::load_snapshot;
use garden_game::{
    DrawCommand, Garden, GardenConfig, GardenSession, GrowthStage, HarvestRejection, LoadOutcome,
    ManualClock, MemoryStore, RecordingCanvas, RecordingPlayer, StaticImages, Tier,
    reward_distribution, roll_seed_reward,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Start of the simulated clock, a fixed wall time so ids are stable.
pub const SIM_EPOCH_MS: u64 = 1_700_000_000_000;
const REWARD_TRIALS: usize = 20_000;
const REWARD_TOLERANCE: f64 = 0.02;

type SimGarden = Garden<MemoryStore, ManualClock>;
pub type ScenarioCheck = fn(&ScenarioCtx) -> Result<(), String>;

#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub seed: u64,
    pub config: GardenConfig,
}

impl ScenarioCtx {
    fn open(&self) -> Result<(SimGarden, ManualClock, MemoryStore), String> {
        let clock = ManualClock::starting_at(SIM_EPOCH_MS);
        let store = MemoryStore::new();
        let garden = Garden::open(store.clone(), clock.clone(), self.config.clone(), self.seed)
            .map_err(|err| format!("config rejected: {err}"))?;
        Ok((garden, clock, store))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LogicScenario {
    pub key: &'static str,
    pub description: &'static str,
    pub check: ScenarioCheck,
}

macro_rules! ensure {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err(format!($($msg)+));
        }
    };
}

pub const CATALOG: &[LogicScenario] = &[
    LogicScenario {
        key: "smoke",
        description: "Plant one seed, grow it and harvest it",
        check: smoke,
    },
    LogicScenario {
        key: "lifecycle",
        description: "Grow every starter seed through each stage and harvest it",
        check: lifecycle,
    },
    LogicScenario {
        key: "early-harvest",
        description: "Harvests before start or before the minimum time change nothing",
        check: early_harvest,
    },
    LogicScenario {
        key: "capacity",
        description: "The seed bank never exceeds its capacity",
        check: capacity,
    },
    LogicScenario {
        key: "persistence",
        description: "Snapshots round-trip and corrupt slices reset the garden",
        check: persistence,
    },
    LogicScenario {
        key: "replay",
        description: "The same seed replays the same harvests",
        check: replay,
    },
    LogicScenario {
        key: "reward-distribution",
        description: "Seed reward frequencies match the tier thresholds",
        check: reward_sweep,
    },
    LogicScenario {
        key: "render-loop",
        description: "A harvest reveal plays out and hands back to the resting draw",
        check: render_loop,
    },
];

#[must_use]
pub fn find_scenario(key: &str) -> Option<&'static LogicScenario> {
    CATALOG.iter().find(|scenario| scenario.key == key)
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG
        .iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

fn grow_and_harvest(
    garden: &mut SimGarden,
    clock: &ManualClock,
    x: f64,
    title: &str,
) -> Result<garden_game::HarvestOutcome, String> {
    let seed = garden
        .consume_seed()
        .ok_or_else(|| "seed bank unexpectedly empty".to_string())?;
    let id = garden.plant_seed(x, 80.0, title, seed);
    ensure!(garden.start_growth(&id), "could not start {id}");
    clock.advance(garden.config().min_complete_ms);
    garden
        .complete_plant(&id)
        .map_err(|rejection| format!("harvest of {id} rejected: {rejection:?}"))
}

fn smoke(ctx: &ScenarioCtx) -> Result<(), String> {
    let (mut garden, clock, _) = ctx.open()?;
    let starters = garden.seeds().len();
    ensure!(
        starters == ctx.config.default_seed_count,
        "expected {} starter seeds, found {starters}",
        ctx.config.default_seed_count
    );
    let outcome = grow_and_harvest(&mut garden, &clock, 40.0, "Smoke test")?;
    ensure!(
        garden.dex().count(outcome.dex_key) == 1,
        "dex did not record {}",
        outcome.dex_key
    );
    Ok(())
}

fn lifecycle(ctx: &ScenarioCtx) -> Result<(), String> {
    let (mut garden, clock, _) = ctx.open()?;
    let mut harvested = 0usize;
    // Each harvest refills one slot, so the bank never runs dry here.
    for round in 0..ctx.config.default_seed_count {
        let seed = garden
            .consume_seed()
            .ok_or_else(|| format!("bank empty at round {round}"))?;
        let tier = seed.tier;
        #[allow(clippy::cast_precision_loss)]
        let id = garden.plant_seed(round as f64 * 60.0, 120.0, "Lifecycle", seed);
        garden.start_growth(&id);

        let mut previous = GrowthStage::Seed;
        for _ in 0..GrowthStage::ALL.len() {
            let plant = garden
                .plant(&id)
                .ok_or_else(|| format!("{id} vanished"))?;
            let stage = garden.growth_stage(plant);
            ensure!(stage >= previous, "{id} regressed from {previous} to {stage}");
            previous = stage;
            clock.advance(45 * MINUTE_MS);
        }
        let outcome = garden
            .complete_plant(&id)
            .map_err(|rejection| format!("{id}: {rejection:?}"))?;
        ensure!(outcome.tier == tier, "{id} harvested as {} not {tier}", outcome.tier);
        ensure!(
            garden.complete_plant(&id) == Err(HarvestRejection::AlreadyHarvested),
            "{id} harvested twice"
        );
        harvested += 1;
    }
    let recorded: u32 = garden.dex().iter().map(|(_, count)| count).sum();
    ensure!(
        usize::try_from(recorded).unwrap_or(usize::MAX) == harvested,
        "dex holds {recorded} harvests, expected {harvested}"
    );
    ensure!(
        garden.clear_harvested() == harvested,
        "clear did not remove every harvested plant"
    );
    ensure!(garden.plants().is_empty(), "clear left plants behind");
    Ok(())
}

fn early_harvest(ctx: &ScenarioCtx) -> Result<(), String> {
    let (mut garden, clock, _) = ctx.open()?;
    let seed = garden
        .consume_seed()
        .ok_or_else(|| "no starter seed".to_string())?;
    let id = garden.plant_seed(10.0, 10.0, "Too soon", seed);
    let before = garden.state().clone();

    clock.advance(ctx.config.min_complete_ms * 4);
    ensure!(
        garden.complete_plant(&id) == Err(HarvestRejection::NotStarted),
        "unstarted plant was not rejected"
    );
    garden.start_growth(&id);
    let started = garden.state().clone();
    clock.advance(ctx.config.min_complete_ms.saturating_sub(1));
    ensure!(
        matches!(
            garden.complete_plant(&id),
            Err(HarvestRejection::TooEarly { .. })
        ),
        "early harvest was not rejected"
    );
    ensure!(garden.state() == &started, "rejected harvest mutated state");
    ensure!(before.dex == started.dex, "dex changed before harvest");
    Ok(())
}

fn capacity(ctx: &ScenarioCtx) -> Result<(), String> {
    let (mut garden, clock, _) = ctx.open()?;
    let max = ctx.config.max_seeds;
    for tier in Tier::ALL {
        if garden.seeds().len() == max {
            ensure!(!garden.add_seed(tier, false), "full bank accepted a {tier} seed");
        }
    }
    for round in 0..40u32 {
        if garden.seeds().is_empty() {
            break;
        }
        grow_and_harvest(&mut garden, &clock, f64::from(round % 10) * 50.0, "Fill")?;
        garden.tick();
        ensure!(
            garden.seeds().len() <= max,
            "bank holds {} seeds, capacity {max}",
            garden.seeds().len()
        );
    }
    Ok(())
}

fn persistence(ctx: &ScenarioCtx) -> Result<(), String> {
    let (mut garden, clock, store) = ctx.open()?;
    grow_and_harvest(&mut garden, &clock, 30.0, "Persist")?;
    garden.set_sfx(false);
    let snapshot = load_snapshot(&store, &ctx.config).map_err(|err| err.to_string())?;
    ensure!(&snapshot.state == garden.state(), "stored state lags memory");

    let mut reopened = Garden::new(store.clone(), clock.clone(), ctx.config.clone(), ctx.seed)
        .map_err(|err| err.to_string())?;
    ensure!(
        reopened.load() == LoadOutcome::Restored,
        "reload was not a restore"
    );
    ensure!(reopened.state() == garden.state(), "reload differs from saved state");

    store.insert_raw(&ctx.config.storage_key("plants"), "{not json");
    ensure!(
        reopened.load() == LoadOutcome::Recovered,
        "corrupt plants slice was accepted"
    );
    ensure!(reopened.plants().is_empty(), "reset kept plants");
    let recovered = load_snapshot(&store, &ctx.config).map_err(|err| err.to_string())?;
    ensure!(
        recovered.state == *reopened.state(),
        "reset state was not written back"
    );
    Ok(())
}

fn replay(ctx: &ScenarioCtx) -> Result<(), String> {
    let run = || -> Result<Vec<String>, String> {
        let (mut garden, clock, _) = ctx.open()?;
        let mut log = Vec::new();
        for round in 0..6u32 {
            if garden.seeds().is_empty() {
                break;
            }
            let outcome = grow_and_harvest(&mut garden, &clock, f64::from(round) * 70.0, "Replay")?;
            log.push(format!("{}>{}", outcome.dex_key, outcome.reward_tier));
        }
        Ok(log)
    };
    let first = run()?;
    let second = run()?;
    ensure!(first == second, "replay diverged: {first:?} vs {second:?}");
    Ok(())
}

fn reward_sweep(ctx: &ScenarioCtx) -> Result<(), String> {
    for tier in Tier::ALL {
        let mut rng = ChaCha20Rng::seed_from_u64(ctx.seed);
        let mut counts = [0usize; 3];
        for _ in 0..REWARD_TRIALS {
            let slot = match roll_seed_reward(tier, &mut rng) {
                Tier::Basic => 0,
                Tier::Rare => 1,
                Tier::Extinct => 2,
            };
            counts[slot] += 1;
        }
        let expected = reward_distribution(tier);
        for (slot, count) in counts.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let observed = *count as f64 / REWARD_TRIALS as f64;
            ensure!(
                (observed - expected[slot]).abs() < REWARD_TOLERANCE,
                "{tier} -> {}: observed {observed:.4}, expected {:.4}",
                Tier::ALL[slot],
                expected[slot]
            );
        }
    }
    Ok(())
}

fn render_loop(ctx: &ScenarioCtx) -> Result<(), String> {
    let (garden, clock, _) = ctx.open()?;
    let mut session = GardenSession::new(garden, RecordingPlayer::default(), 800.0, 600.0);
    session.click(200.0, 200.0);
    let id = session
        .confirm_title("Render")
        .ok_or_else(|| "planting failed".to_string())?;
    session.start_growth(&id);
    clock.advance(ctx.config.min_complete_ms);
    session
        .harvest(&id)
        .map_err(|rejection| format!("{rejection:?}"))?;

    let mut canvas = RecordingCanvas::new();
    let mut images = StaticImages::none();
    let mut saw_glow = false;
    for _ in 0..400 {
        clock.advance(10);
        canvas.take();
        session.frame(&mut canvas, &mut images);
        saw_glow |= canvas.count(|cmd| matches!(cmd, DrawCommand::RadialGlow { .. })) > 0;
        if !session.renderer().animator().is_tracking(&id) {
            break;
        }
    }
    ensure!(saw_glow, "reveal never drew its glow");
    ensure!(
        !session.renderer().animator().is_tracking(&id),
        "reveal never finished"
    );
    ensure!(
        canvas.glyphs().contains(&PLACEHOLDER_GLYPH),
        "harvested plant did not fall back to its placeholder"
    );
    ensure!(
        session.with_audio(|audio| audio.player().played.len()) == 1,
        "harvest chime did not play exactly once"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(seed: u64) -> ScenarioCtx {
        ScenarioCtx {
            seed,
            config: GardenConfig::default(),
        }
    }

    #[test]
    fn catalog_keys_are_unique() {
        let mut keys: Vec<_> = CATALOG.iter().map(|scenario| scenario.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CATALOG.len());
        assert!(find_scenario("smoke").is_some());
        assert!(find_scenario("nope").is_none());
    }

    #[test]
    fn every_scenario_passes_on_defaults() {
        for scenario in CATALOG {
            for seed in [1, 1337] {
                assert_eq!((scenario.check)(&ctx(seed)), Ok(()), "{}", scenario.key);
            }
        }
    }

    #[test]
    fn invalid_config_fails_cleanly() {
        let bad = ScenarioCtx {
            seed: 1,
            config: GardenConfig {
                max_seeds: 0,
                ..GardenConfig::default()
            },
        };
        assert!(smoke(&bad).is_err());
    }
}
