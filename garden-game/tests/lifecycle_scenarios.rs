use garden_game::constants::{MAX_SEEDS, MIN_COMPLETE_TIME_MS, MINUTE_MS};
use garden_game::{
    Garden, GardenConfig, GrowthStage, HarvestRejection, LoadOutcome, ManualClock, MemoryStore,
    PlantId, SpeciesId, Tier,
};

const EPOCH: u64 = 1_720_000_000_000;

fn fresh_garden(seed: u64) -> (Garden<MemoryStore, ManualClock>, ManualClock) {
    let clock = ManualClock::starting_at(EPOCH);
    let mut garden =
        Garden::new(MemoryStore::new(), clock.clone(), GardenConfig::default(), seed).unwrap();
    assert_eq!(garden.load(), LoadOutcome::FirstRun);
    (garden, clock)
}

#[test]
fn fresh_install_plant_grow_and_harvest() {
    let (mut garden, clock) = fresh_garden(2024);
    assert_eq!(garden.seeds().len(), 5);
    assert!(garden.seeds().iter().all(|seed| seed.tier == Tier::Basic));

    let seed = garden.consume_seed().unwrap();
    let id = garden.plant_seed(10.0, 10.0, "Write report", seed);
    assert_eq!(garden.plants().len(), 1);
    let plant = garden.plant(&id).unwrap();
    assert!(!plant.is_growing());
    assert_eq!(garden.growth_stage(plant), GrowthStage::Seed);

    assert!(garden.start_growth(&id));
    assert!(garden.plant(&id).unwrap().is_growing());

    clock.advance(4 * MINUTE_MS);
    assert!(matches!(
        garden.complete_plant(&id),
        Err(HarvestRejection::TooEarly { .. })
    ));
    assert!(!garden.plant(&id).unwrap().is_harvested());

    clock.advance(MINUTE_MS);
    let outcome = garden.complete_plant(&id).unwrap();
    assert_eq!(outcome.tier, Tier::Basic);
    assert_eq!(outcome.dex_key.tier, Tier::Basic);
    let key = format!("basic:{}", outcome.dex_key.index);
    let parsed: SpeciesId = key.parse().unwrap();
    assert_eq!(garden.dex().count(parsed), 1);
    assert_eq!(outcome.position.x, 10.0);
}

#[test]
fn full_bank_refuses_any_tier() {
    let (mut garden, _) = fresh_garden(1);
    assert_eq!(garden.seeds().len(), MAX_SEEDS);
    for tier in Tier::ALL {
        assert!(!garden.add_seed(tier, false));
        assert_eq!(garden.seeds().len(), MAX_SEEDS);
    }
}

#[test]
fn removing_unknown_plant_is_a_no_op() {
    let (mut garden, _) = fresh_garden(1);
    let seed = garden.consume_seed().unwrap();
    garden.plant_seed(1.0, 2.0, "Keep", seed);
    let before = garden.plants().to_vec();
    assert!(!garden.remove_plant(&PlantId::from("plant_0_missing")));
    assert_eq!(garden.plants(), before.as_slice());
}

#[test]
fn harvest_before_start_never_marks_harvested() {
    let (mut garden, clock) = fresh_garden(5);
    let seed = garden.consume_seed().unwrap();
    let id = garden.plant_seed(0.0, 0.0, "Idle", seed);
    clock.advance(48 * 60 * MINUTE_MS);
    assert_eq!(garden.complete_plant(&id), Err(HarvestRejection::NotStarted));
    assert!(!garden.plant(&id).unwrap().is_harvested());
    assert_eq!(garden.growth_stage(garden.plant(&id).unwrap()), GrowthStage::Seed);
}

#[test]
fn minimum_growth_boundary_is_exact() {
    let (mut garden, clock) = fresh_garden(6);
    let seed = garden.consume_seed().unwrap();
    let id = garden.plant_seed(0.0, 0.0, "Edge", seed);
    garden.start_growth(&id);
    clock.advance(MIN_COMPLETE_TIME_MS - 1);
    assert_eq!(
        garden.complete_plant(&id),
        Err(HarvestRejection::TooEarly { remaining_ms: 1 })
    );
    clock.advance(1);
    assert!(garden.complete_plant(&id).is_ok());
}

#[test]
fn repeated_harvest_is_idempotent() {
    let (mut garden, clock) = fresh_garden(77);
    let seed = garden.consume_seed().unwrap();
    let id = garden.plant_seed(0.0, 0.0, "Once", seed);
    garden.start_growth(&id);
    clock.advance(MIN_COMPLETE_TIME_MS);
    let outcome = garden.complete_plant(&id).unwrap();
    let seeds_after_first = garden.seeds().to_vec();
    let dex_after_first = garden.dex().clone();

    for _ in 0..3 {
        clock.advance(MINUTE_MS);
        assert_eq!(
            garden.complete_plant(&id),
            Err(HarvestRejection::AlreadyHarvested)
        );
    }
    assert_eq!(garden.dex(), &dex_after_first);
    assert_eq!(garden.dex().count(outcome.dex_key), 1);
    assert_eq!(garden.seeds().len(), seeds_after_first.len());
}

#[test]
fn growth_stage_is_monotonic_for_a_growing_plant() {
    let (mut garden, clock) = fresh_garden(8);
    let seed = garden.consume_seed().unwrap();
    let id = garden.plant_seed(0.0, 0.0, "Watch", seed);
    garden.start_growth(&id);
    let mut previous = GrowthStage::Seed;
    for _ in 0..(30 * 6) {
        clock.advance(10 * MINUTE_MS);
        let stage = garden.growth_stage(garden.plant(&id).unwrap());
        assert!(stage >= previous);
        previous = stage;
    }
    assert_eq!(previous, GrowthStage::FullBloom);
}

#[test]
fn same_seed_replays_same_harvests() {
    let run = |seed: u64| {
        let (mut garden, clock) = fresh_garden(seed);
        let mut species = Vec::new();
        for round in 0..4 {
            let Some(seed) = garden.consume_seed() else {
                break;
            };
            let id = garden.plant_seed(f64::from(round) * 80.0, 40.0, "Repeat", seed);
            garden.start_growth(&id);
            clock.advance(MIN_COMPLETE_TIME_MS);
            let outcome = garden.complete_plant(&id).unwrap();
            species.push((outcome.dex_key, outcome.reward_tier));
        }
        species
    };
    assert_eq!(run(99), run(99));
}
