//! UI-facing flows that combine the garden, the renderer and audio.
use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::KeyValueStore;
use crate::assets::ImageCache;
use crate::audio::{AudioManager, Sound, SoundPlayer};
use crate::canvas::Canvas;
use crate::clock::Clock;
use crate::garden::{Garden, HarvestOutcome, HarvestRejection, SeedBankView, TickReport};
use crate::interaction::{self, ClickTarget, PopoverView};
use crate::model::{PlantId, Position};
use crate::notice::{MSG_EMPTY_TITLE, MSG_GROWTH_STARTED, MSG_NO_SEEDS, MSG_PLANTED, MSG_RESET, Notice};
use crate::render::GardenRenderer;

/// Outcome of one display frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub tick: TickReport,
    pub reveals_finished: Vec<PlantId>,
}

/// Hover feedback for the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverView {
    pub plant_id: PlantId,
    pub tooltip: String,
}

/// One open garden view: owns the garden plus transient UI selection.
#[derive(Debug)]
pub struct GardenSession<S, C, P> {
    garden: Garden<S, C>,
    renderer: GardenRenderer,
    audio: Rc<RefCell<AudioManager<P>>>,
    pending_plant: Option<Position>,
    selected: Option<PlantId>,
}

impl<S, C, P> GardenSession<S, C, P>
where
    S: KeyValueStore,
    C: Clock,
    P: SoundPlayer + 'static,
{
    /// Wrap a loaded garden. The audio switch follows the sfx setting.
    #[must_use]
    pub fn new(garden: Garden<S, C>, player: P, width: f64, height: f64) -> Self {
        let mut audio = AudioManager::new(player);
        audio.set_enabled(garden.settings().sfx);
        Self {
            garden,
            renderer: GardenRenderer::new(width, height),
            audio: Rc::new(RefCell::new(audio)),
            pending_plant: None,
            selected: None,
        }
    }

    // Pointer ---------------------------------------------------------------

    /// Route a click or tap at `(x, y)`.
    pub fn click(&mut self, x: f64, y: f64) -> ClickTarget {
        let target = interaction::route_click(&self.garden, x, y);
        match &target {
            ClickTarget::Plant(id) => {
                self.selected = Some(id.clone());
                self.renderer.set_hovered(None);
            }
            ClickTarget::Ground(position) => self.pending_plant = Some(*position),
            ClickTarget::NoSeeds => self.garden.notify(Notice::error(MSG_NO_SEEDS)),
            ClickTarget::Harvested => {}
        }
        target
    }

    /// Update hover state for a pointer move.
    pub fn hover(&mut self, x: f64, y: f64) -> Option<HoverView> {
        let target = interaction::hover_target(&self.garden, x, y);
        self.renderer.set_hovered(target.clone());
        let id = target?;
        let plant = self.garden.plant(&id)?;
        Some(HoverView {
            tooltip: interaction::tooltip_text(plant, self.garden.now()),
            plant_id: id,
        })
    }

    pub fn pointer_leave(&mut self) {
        self.renderer.set_hovered(None);
    }

    // Planting --------------------------------------------------------------

    /// Plant the oldest seed at the pending position with `title`.
    ///
    /// An empty title keeps the pending position so the prompt can retry.
    pub fn confirm_title(&mut self, title: &str) -> Option<PlantId> {
        let title = title.trim();
        if title.is_empty() {
            self.garden.notify(Notice::error(MSG_EMPTY_TITLE));
            return None;
        }
        let position = self.pending_plant.take()?;
        let seed = self.garden.consume_seed()?;
        let id = self.garden.plant_seed(position.x, position.y, title, seed);
        self.garden.notify(Notice::success(MSG_PLANTED));
        Some(id)
    }

    pub fn cancel_title(&mut self) {
        self.pending_plant = None;
    }

    #[must_use]
    pub const fn pending_plant(&self) -> Option<Position> {
        self.pending_plant
    }

    // Popover actions -------------------------------------------------------

    #[must_use]
    pub fn selected(&self) -> Option<&PlantId> {
        self.selected.as_ref()
    }

    pub fn close_popover(&mut self) {
        self.selected = None;
    }

    #[must_use]
    pub fn popover(&self) -> Option<PopoverView> {
        let plant = self.garden.plant(self.selected.as_ref()?)?;
        Some(interaction::popover_view(
            plant,
            self.garden.now(),
            self.garden.config().min_complete_ms,
        ))
    }

    pub fn start_growth(&mut self, id: &PlantId) -> bool {
        if !self.garden.start_growth(id) {
            return false;
        }
        self.garden.notify(Notice::success(MSG_GROWTH_STARTED));
        self.selected = None;
        true
    }

    /// Harvest and present the result: a reveal that chimes when it lands,
    /// or an immediate chime when animations are off.
    ///
    /// # Errors
    ///
    /// Propagates the garden's `HarvestRejection`.
    pub fn harvest(&mut self, id: &PlantId) -> Result<HarvestOutcome, HarvestRejection> {
        let outcome = self.garden.complete_plant(id)?;
        if self.garden.settings().animations {
            let audio = Rc::clone(&self.audio);
            let now = self.garden.now();
            self.renderer.animator_mut().start_animation(
                outcome.plant_id.clone(),
                outcome.position,
                outcome.tier,
                outcome.final_species,
                now,
                self.garden.shuffle_rng(),
                Some(Box::new(move || {
                    audio.borrow_mut().play(Sound::Harvest);
                })),
            );
        } else {
            self.audio.borrow_mut().play(Sound::Harvest);
        }
        self.selected = None;
        Ok(outcome)
    }

    /// Remove a plant; its seed is not returned.
    pub fn remove(&mut self, id: &PlantId) -> bool {
        self.renderer.animator_mut().cancel_animation(id);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.garden.remove_plant(id)
    }

    pub fn clear_harvested(&mut self) -> usize {
        self.garden.clear_harvested()
    }

    /// Wipe progress and stop every reveal.
    pub fn reset(&mut self) {
        self.renderer.animator_mut().cancel_all();
        self.pending_plant = None;
        self.selected = None;
        self.renderer.set_hovered(None);
        self.garden.reset();
        self.garden.notify(Notice::success(MSG_RESET));
    }

    // Settings --------------------------------------------------------------

    pub fn set_sfx(&mut self, enabled: bool) {
        self.garden.set_sfx(enabled);
        self.audio.borrow_mut().set_enabled(enabled);
    }

    pub fn set_animations(&mut self, enabled: bool) {
        self.garden.set_animations(enabled);
    }

    pub fn set_volume(&mut self, sound: Sound, volume: f64) {
        self.audio.borrow_mut().set_volume(sound, volume);
    }

    // Frame loop ------------------------------------------------------------

    /// Fire due timers, then draw one frame.
    pub fn frame<K, I>(&mut self, canvas: &mut K, images: &mut I) -> FrameReport
    where
        K: Canvas + ?Sized,
        I: ImageCache + ?Sized,
    {
        let tick = self.garden.tick();
        let reveals_finished = self.renderer.frame(&self.garden, canvas, images);
        FrameReport {
            tick,
            reveals_finished,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.renderer.resize(width, height);
    }

    // Views -----------------------------------------------------------------

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.garden.take_notices()
    }

    #[must_use]
    pub fn seed_bank(&self) -> SeedBankView {
        self.garden.seed_bank()
    }

    #[must_use]
    pub const fn garden(&self) -> &Garden<S, C> {
        &self.garden
    }

    pub fn garden_mut(&mut self) -> &mut Garden<S, C> {
        &mut self.garden
    }

    #[must_use]
    pub const fn renderer(&self) -> &GardenRenderer {
        &self.renderer
    }

    /// Run `f` against the audio manager.
    pub fn with_audio<R>(&self, f: impl FnOnce(&AudioManager<P>) -> R) -> R {
        f(&self.audio.borrow())
    }
}
