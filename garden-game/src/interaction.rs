//! Pointer routing and the small view models shown around the canvas.
use serde::Serialize;

use crate::KeyValueStore;
use crate::clock::Clock;
use crate::constants::MINUTE_MS;
use crate::garden::Garden;
use crate::model::{Plant, PlantId, Position};

/// What a click on the garden surface means.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickTarget {
    /// A growing or dormant plant was hit; open its popover.
    Plant(PlantId),
    /// A harvested plant was hit; nothing happens.
    Harvested,
    /// Empty ground with seeds available; ask for a task title.
    Ground(Position),
    /// Empty ground but the bank is empty.
    NoSeeds,
}

#[must_use]
pub fn route_click<S: KeyValueStore, C: Clock>(garden: &Garden<S, C>, x: f64, y: f64) -> ClickTarget {
    match garden.plant_at(x, y) {
        Some(plant) if plant.is_harvested() => ClickTarget::Harvested,
        Some(plant) => ClickTarget::Plant(plant.id.clone()),
        None if garden.seeds().is_empty() => ClickTarget::NoSeeds,
        None => ClickTarget::Ground(Position::new(x, y)),
    }
}

/// Plant under the pointer for hover purposes; harvested plants are ignored.
#[must_use]
pub fn hover_target<S: KeyValueStore, C: Clock>(
    garden: &Garden<S, C>,
    x: f64,
    y: f64,
) -> Option<PlantId> {
    garden
        .plant_at(x, y)
        .filter(|plant| !plant.is_harvested())
        .map(|plant| plant.id.clone())
}

/// `"<title> (<stage label>)"`.
#[must_use]
pub fn tooltip_text(plant: &Plant, now: u64) -> String {
    format!("{} ({})", plant.title, plant.growth_stage_at(now).label())
}

pub const START_LABEL: &str = "▶️ Start Growing";
pub const HARVEST_READY_LABEL: &str = "🌸 Harvest Plant";

/// Popover state for a selected plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopoverView {
    pub plant_id: String,
    pub title: String,
    pub stage_label: &'static str,
    /// Dormant plants offer "start"; growing plants offer "harvest".
    pub show_start: bool,
    pub show_harvest: bool,
    pub harvest_enabled: bool,
    /// Whole minutes left before harvest, rounded up.
    pub remaining_minutes: Option<u64>,
    pub start_label: &'static str,
    pub harvest_label: String,
}

#[must_use]
pub fn popover_view(plant: &Plant, now: u64, min_complete_ms: u64) -> PopoverView {
    let remaining = plant.harvest_ready_in(now, min_complete_ms);
    let remaining_minutes = remaining
        .filter(|ms| *ms > 0)
        .map(|ms| ms.div_ceil(MINUTE_MS));
    let harvest_label = remaining_minutes.map_or_else(
        || HARVEST_READY_LABEL.to_string(),
        |minutes| format!("🌸 Harvest ({minutes}m)"),
    );
    PopoverView {
        plant_id: plant.id.to_string(),
        title: plant.title.clone(),
        stage_label: plant.growth_stage_at(now).label(),
        show_start: !plant.is_growing(),
        show_harvest: plant.is_growing(),
        harvest_enabled: remaining == Some(0),
        remaining_minutes,
        start_label: START_LABEL,
        harvest_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GardenConfig;
    use crate::constants::MIN_COMPLETE_TIME_MS;
    use crate::model::PlantStatus;
    use crate::species::Tier;

    fn plant(status: PlantStatus) -> Plant {
        Plant {
            id: PlantId::from("p"),
            title: "Write report".to_string(),
            tier: Tier::Basic,
            position: Position::new(0.0, 0.0),
            planted_at: 0,
            status,
        }
    }

    #[test]
    fn dormant_popover_offers_start() {
        let view = popover_view(&plant(PlantStatus::Dormant), 0, MIN_COMPLETE_TIME_MS);
        assert!(view.show_start);
        assert!(!view.show_harvest);
        assert!(!view.harvest_enabled);
        assert_eq!(view.remaining_minutes, None);
    }

    #[test]
    fn growing_popover_rounds_remaining_minutes_up() {
        let growing = plant(PlantStatus::Growing { started_at: 0 });
        let view = popover_view(&growing, 61_000, MIN_COMPLETE_TIME_MS);
        assert!(view.show_harvest);
        assert!(!view.harvest_enabled);
        assert_eq!(view.remaining_minutes, Some(4));
        assert_eq!(view.harvest_label, "🌸 Harvest (4m)");

        let ready = popover_view(&growing, MIN_COMPLETE_TIME_MS, MIN_COMPLETE_TIME_MS);
        assert!(ready.harvest_enabled);
        assert_eq!(ready.harvest_label, HARVEST_READY_LABEL);
    }

    #[test]
    fn tooltip_names_stage() {
        assert_eq!(
            tooltip_text(&plant(PlantStatus::Dormant), 0),
            "Write report (Seed)"
        );
    }

    #[test]
    fn clicks_route_by_hit_and_bank() {
        use crate::clock::ManualClock;
        use crate::persist::MemoryStore;

        let clock = ManualClock::starting_at(0);
        let mut garden =
            Garden::open(MemoryStore::new(), clock.clone(), GardenConfig::default(), 2).unwrap();
        assert_eq!(
            route_click(&garden, 5.0, 5.0),
            ClickTarget::Ground(Position::new(5.0, 5.0))
        );
        let seed = garden.consume_seed().unwrap();
        let id = garden.plant_seed(100.0, 100.0, "A", seed);
        assert_eq!(route_click(&garden, 110.0, 100.0), ClickTarget::Plant(id.clone()));
        assert_eq!(hover_target(&garden, 110.0, 100.0), Some(id.clone()));

        garden.start_growth(&id);
        clock.advance(MIN_COMPLETE_TIME_MS);
        garden.complete_plant(&id).unwrap();
        assert_eq!(route_click(&garden, 100.0, 100.0), ClickTarget::Harvested);
        assert_eq!(hover_target(&garden, 100.0, 100.0), None);

        while garden.consume_seed().is_some() {}
        assert_eq!(route_click(&garden, 5.0, 5.0), ClickTarget::NoSeeds);
    }
}
