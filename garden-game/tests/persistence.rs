use garden_game::constants::MIN_COMPLETE_TIME_MS;
use garden_game::persist::{load_snapshot, save_snapshot};
use garden_game::{
    Garden, GardenConfig, KeyValueStore, LoadOutcome, ManualClock, MemoryStore, PlantStatus, Tier,
};

fn played_garden(store: &MemoryStore, clock: &ManualClock) -> Garden<MemoryStore, ManualClock> {
    let mut garden =
        Garden::open(store.clone(), clock.clone(), GardenConfig::default(), 31).unwrap();
    let first = garden.consume_seed().unwrap();
    let harvested = garden.plant_seed(40.0, 50.0, "Inbox zero", first);
    let second = garden.consume_seed().unwrap();
    let growing = garden.plant_seed(90.0, 50.0, "Gym", second);
    garden.start_growth(&harvested);
    clock.advance(MIN_COMPLETE_TIME_MS);
    garden.complete_plant(&harvested).unwrap();
    garden.start_growth(&growing);
    garden.set_animations(false);
    garden
}

#[test]
fn save_then_load_reproduces_every_slice() {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_at(1_000_000);
    let garden = played_garden(&store, &clock);
    garden.save().unwrap();

    let mut reopened =
        Garden::new(store.clone(), clock.clone(), GardenConfig::default(), 0).unwrap();
    assert_eq!(reopened.load(), LoadOutcome::Restored);
    assert_eq!(reopened.state(), garden.state());
    assert!(!reopened.settings().animations);
    assert!(matches!(
        reopened.plants()[0].status,
        PlantStatus::Harvested { .. }
    ));
}

#[test]
fn every_mutation_is_persisted_immediately() {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_at(500);
    let garden = played_garden(&store, &clock);
    let snapshot = load_snapshot(&store, garden.config()).unwrap();
    assert_eq!(&snapshot.state, garden.state());
}

#[test]
fn emptied_bank_is_not_mistaken_for_first_run() {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_at(0);
    let mut garden = Garden::open(store.clone(), clock.clone(), GardenConfig::default(), 2).unwrap();
    while garden.consume_seed().is_some() {}

    let mut reopened = Garden::new(store, clock, GardenConfig::default(), 2).unwrap();
    assert_eq!(reopened.load(), LoadOutcome::Restored);
    assert!(reopened.seeds().is_empty());
}

#[test]
fn corrupt_dex_resets_everything() {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_at(0);
    played_garden(&store, &clock);
    store.insert_raw("pgarden:v1:dex", r#"{"basic:9":1}"#);

    let mut reopened = Garden::new(store.clone(), clock, GardenConfig::default(), 2).unwrap();
    assert_eq!(reopened.load(), LoadOutcome::Recovered);
    assert!(reopened.plants().is_empty());
    assert!(reopened.dex().is_empty());
    assert_eq!(reopened.seeds().len(), 5);
    assert!(reopened.seeds().iter().all(|seed| seed.tier == Tier::Basic));
    assert!(reopened.settings().animations);
}

#[test]
fn custom_namespace_isolates_gardens() {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_at(0);
    let work = GardenConfig {
        storage_namespace: "pgarden:work".to_string(),
        ..GardenConfig::default()
    };
    let mut garden = Garden::open(store.clone(), clock.clone(), work.clone(), 1).unwrap();
    garden.consume_seed();
    assert!(store.get("pgarden:work:seeds").unwrap().is_some());
    assert!(store.get("pgarden:v1:seeds").unwrap().is_none());

    let loaded = load_snapshot(&store, &work).unwrap();
    assert_eq!(loaded.state.seeds.len(), 4);
    save_snapshot(&store, &GardenConfig::default(), &loaded.state).unwrap();
    assert!(store.get("pgarden:v1:seeds").unwrap().is_some());
}

#[test]
fn write_failures_do_not_interrupt_play() {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_at(0);
    let mut garden = Garden::open(store.clone(), clock.clone(), GardenConfig::default(), 3).unwrap();
    let persisted = store.raw("pgarden:v1:seeds");
    store.set_read_only(true);
    garden.consume_seed().unwrap();
    assert_eq!(garden.seeds().len(), 4);
    assert_eq!(store.raw("pgarden:v1:seeds"), persisted);

    store.set_read_only(false);
    garden.save().unwrap();
    assert_ne!(store.raw("pgarden:v1:seeds"), persisted);
}

#[test]
fn gardens_saved_in_the_flat_layout_are_restored() {
    let store = MemoryStore::new();
    store.insert_raw(
        "pgarden:v1:plants",
        r#"[
            {"id":"plant_1_0.3","title":"t","tier":"basic","x":10,"y":10,"plantedAt":1,"isGrowing":true,"startTime":2},
            {"id":"plant_4_0.8","title":"done","tier":"rare","x":80,"y":40,"plantedAt":4,"isGrowing":true,"startTime":5,
             "harvested":true,"harvestedAt":9,"harvestedType":2,"harvestedPlant":{"id":2}}
        ]"#,
    );
    store.insert_raw(
        "pgarden:v1:seeds",
        r#"[{"id":"seed_7_0.1","tier":"rare","isNew":false}]"#,
    );
    store.insert_raw("pgarden:v1:dex", r#"{"rare:2":1}"#);
    store.insert_raw("pgarden:v1:settings", r#"{"sfx":false,"animations":true}"#);

    let mut garden = Garden::new(
        store.clone(),
        ManualClock::starting_at(100),
        GardenConfig::default(),
        4,
    )
    .unwrap();
    assert_eq!(garden.load(), LoadOutcome::Restored);
    assert_eq!(garden.plants().len(), 2);
    assert_eq!(garden.plants()[0].status, PlantStatus::Growing { started_at: 2 });
    assert!(matches!(
        garden.plants()[1].status,
        PlantStatus::Harvested { harvested_at: 9, .. }
    ));
    assert_eq!(garden.seeds().len(), 1);
    assert_eq!(garden.seeds()[0].tier, Tier::Rare);
    assert!(!garden.settings().sfx);

    // The next save rewrites the plants in the current layout.
    garden.save().unwrap();
    let rewritten = store.raw("pgarden:v1:plants").unwrap();
    assert!(rewritten.contains("\"position\""));
    assert!(!rewritten.contains("isGrowing"));
}
