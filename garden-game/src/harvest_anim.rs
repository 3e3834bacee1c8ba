//! Slot-machine style reveal played once per harvest.
//!
//! Animations are purely presentational: they read species records and fire
//! a completion hook, but never touch garden state.
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;
use std::f64::consts::TAU;
use std::fmt;

use crate::assets::ImageCache;
use crate::canvas::Canvas;
use crate::constants::{
    ANIM_CLEANUP_BUFFER_MS, ANIM_EASE_SPLIT, ANIM_FINAL_FRAMES, ANIM_FRAME_MS,
    ANIM_GLOW_ALPHA_SUFFIX, ANIM_GLOW_RADIUS, ANIM_GLYPH_SIZE, ANIM_IMAGE_SIZE, ANIM_MAX_SLOWDOWN,
    ANIM_PULSE_AMPLITUDE, ANIM_PULSE_RATE, ANIM_SPARKLE_BASE_SIZE, ANIM_SPARKLE_COUNT,
    ANIM_SPARKLE_ORBIT, ANIM_SPARKLE_SPIN_RATE, ANIM_SPARKLE_TWINKLE_RATE, ANIM_TOTAL_MS,
    PLACEHOLDER_GLYPH, PLANT_GLYPH_SIZE, PLANT_IMAGE_SIZE, SPARKLE_COLOR,
};
use crate::model::{PlantId, Position};
use crate::render::draw_checkmark;
use crate::species::{Species, Tier, icon_path};

/// Fired once when a reveal lands on its final frame.
pub type CompletionHook = Box<dyn FnOnce()>;

/// Number of frames in a reveal sequence.
#[must_use]
pub fn frame_count() -> usize {
    // 2000 / 150 truncates to 13.
    (ANIM_TOTAL_MS as f64 / ANIM_FRAME_MS) as usize
}

/// Delay before leaving `frame_index`: a linear ramp from half speed to full
/// speed, then a quadratic slowdown to four times the base frame time.
#[must_use]
pub fn frame_duration(frame_index: usize) -> f64 {
    let progress = frame_index as f64 / frame_count() as f64;
    if progress < ANIM_EASE_SPLIT {
        ANIM_FRAME_MS * (0.5 + progress * 0.5)
    } else {
        let tail = (progress - ANIM_EASE_SPLIT) / (1.0 - ANIM_EASE_SPLIT);
        ANIM_FRAME_MS * (1.0 + tail * tail * ANIM_MAX_SLOWDOWN)
    }
}

/// Build the reveal sequence: shuffled candidates, then the final species.
pub fn build_frames<R: Rng + ?Sized>(
    tier: Tier,
    final_species: &'static Species,
    rng: &mut R,
) -> SmallVec<[&'static Species; 16]> {
    let mut candidates: SmallVec<[&'static Species; 5]> = tier.species().iter().collect();
    candidates.shuffle(rng);
    let total = frame_count();
    let lead = total.saturating_sub(ANIM_FINAL_FRAMES);
    let mut frames: SmallVec<[&'static Species; 16]> = (0..lead)
        .map(|idx| candidates[idx % candidates.len()])
        .collect();
    frames.extend(std::iter::repeat_n(final_species, total - lead));
    frames
}

struct Reveal {
    plant_id: PlantId,
    position: Position,
    tier: Tier,
    frames: SmallVec<[&'static Species; 16]>,
    current_frame: usize,
    started_at: u64,
    last_frame_at: u64,
    complete: bool,
    on_complete: Option<CompletionHook>,
}

impl fmt::Debug for Reveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reveal")
            .field("plant_id", &self.plant_id)
            .field("tier", &self.tier)
            .field("current_frame", &self.current_frame)
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}

impl Reveal {
    fn shown_species(&self) -> Option<&'static Species> {
        let last = self.frames.len().checked_sub(1)?;
        self.frames.get(self.current_frame.min(last)).copied()
    }
}

/// Active reveals in start order.
#[derive(Debug, Default)]
pub struct HarvestAnimator {
    reveals: Vec<Reveal>,
}

impl HarvestAnimator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the reveal for `plant_id`.
    pub fn start_animation<R: Rng + ?Sized>(
        &mut self,
        plant_id: PlantId,
        position: Position,
        tier: Tier,
        final_species: &'static Species,
        now: u64,
        rng: &mut R,
        on_complete: Option<CompletionHook>,
    ) {
        let reveal = Reveal {
            frames: build_frames(tier, final_species, rng),
            plant_id,
            position,
            tier,
            current_frame: 0,
            started_at: now,
            last_frame_at: now,
            complete: false,
            on_complete,
        };
        if let Some(slot) = self
            .reveals
            .iter_mut()
            .find(|existing| existing.plant_id == reveal.plant_id)
        {
            *slot = reveal;
        } else {
            self.reveals.push(reveal);
        }
    }

    /// Advance every running reveal by at most one frame and drop finished
    /// ones once their grace period has passed. Returns the plants whose
    /// reveal completed during this call.
    pub fn update(&mut self, now: u64) -> Vec<PlantId> {
        let mut finished = Vec::new();
        for reveal in self.reveals.iter_mut().filter(|reveal| !reveal.complete) {
            let waited = now.saturating_sub(reveal.last_frame_at) as f64;
            if waited < frame_duration(reveal.current_frame) {
                continue;
            }
            reveal.current_frame += 1;
            reveal.last_frame_at = now;
            if reveal.current_frame >= reveal.frames.len() {
                reveal.complete = true;
                finished.push(reveal.plant_id.clone());
                if let Some(hook) = reveal.on_complete.take() {
                    hook();
                }
            }
        }
        let expiry = ANIM_TOTAL_MS + ANIM_CLEANUP_BUFFER_MS;
        self.reveals
            .retain(|reveal| !(reveal.complete && now.saturating_sub(reveal.started_at) > expiry));
        finished
    }

    /// Draw every reveal still held, including finished ones awaiting cleanup.
    pub fn render<C, I>(&self, canvas: &mut C, images: &mut I, now: u64)
    where
        C: Canvas + ?Sized,
        I: ImageCache + ?Sized,
    {
        let t = now as f64;
        for reveal in &self.reveals {
            let Some(species) = reveal.shown_species() else {
                continue;
            };
            let Position { x, y } = reveal.position;
            canvas.save();

            if !reveal.complete {
                let pulse = 1.0 + (t * ANIM_PULSE_RATE).sin() * ANIM_PULSE_AMPLITUDE;
                canvas.translate(x, y);
                canvas.scale(pulse, pulse);
                canvas.translate(-x, -y);
                let glow = format!("{}{ANIM_GLOW_ALPHA_SUFFIX}", reveal.tier.color());
                canvas.fill_radial_glow(x, y, ANIM_GLOW_RADIUS, &glow);
            }

            let path = icon_path(reveal.tier, species);
            if images.is_ready(&path) {
                let size = if reveal.complete {
                    PLANT_IMAGE_SIZE
                } else {
                    ANIM_IMAGE_SIZE
                };
                canvas.draw_image(&path, x - size / 2.0, y - size / 2.0, size, size);
            } else {
                let size = if reveal.complete {
                    PLANT_GLYPH_SIZE
                } else {
                    ANIM_GLYPH_SIZE
                };
                canvas.draw_glyph(PLACEHOLDER_GLYPH, x, y, size);
            }

            if reveal.complete {
                draw_checkmark(canvas, x, y);
            } else {
                for idx in 0..ANIM_SPARKLE_COUNT {
                    let phase = idx as f64;
                    let angle = (t * ANIM_SPARKLE_SPIN_RATE
                        + phase * TAU / ANIM_SPARKLE_COUNT as f64)
                        % TAU;
                    let size =
                        ANIM_SPARKLE_BASE_SIZE + (t * ANIM_SPARKLE_TWINKLE_RATE + phase).sin();
                    canvas.fill_circle(
                        x + angle.cos() * ANIM_SPARKLE_ORBIT,
                        y + angle.sin() * ANIM_SPARKLE_ORBIT,
                        size,
                        SPARKLE_COLOR,
                    );
                }
            }

            canvas.restore();
        }
    }

    /// Whether a reveal for `plant_id` is still running.
    #[must_use]
    pub fn is_animating(&self, plant_id: &PlantId) -> bool {
        self.reveals
            .iter()
            .any(|reveal| &reveal.plant_id == plant_id && !reveal.complete)
    }

    /// Whether a record (running or awaiting cleanup) exists.
    #[must_use]
    pub fn is_tracking(&self, plant_id: &PlantId) -> bool {
        self.reveals.iter().any(|reveal| &reveal.plant_id == plant_id)
    }

    /// Frame index and species currently shown for `plant_id`.
    #[must_use]
    pub fn current_frame(&self, plant_id: &PlantId) -> Option<(usize, &'static Species)> {
        let reveal = self
            .reveals
            .iter()
            .find(|reveal| &reveal.plant_id == plant_id)?;
        Some((reveal.current_frame, reveal.shown_species()?))
    }

    /// Drop one reveal without firing its hook.
    pub fn cancel_animation(&mut self, plant_id: &PlantId) -> bool {
        let before = self.reveals.len();
        self.reveals.retain(|reveal| &reveal.plant_id != plant_id);
        before != self.reveals.len()
    }

    /// Drop every reveal without firing hooks.
    pub fn cancel_all(&mut self) {
        self.reveals.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reveals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reveals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticImages;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::species::SpeciesId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::cell::Cell;
    use std::rc::Rc;

    fn phoenix() -> &'static Species {
        SpeciesId::new(Tier::Rare, 3).unwrap().species()
    }

    fn started(hook: Option<CompletionHook>) -> (HarvestAnimator, PlantId) {
        let mut animator = HarvestAnimator::new();
        let id = PlantId::from("plant_1");
        let mut rng = SmallRng::seed_from_u64(5);
        animator.start_animation(
            id.clone(),
            Position::new(50.0, 60.0),
            Tier::Rare,
            phoenix(),
            0,
            &mut rng,
            hook,
        );
        (animator, id)
    }

    /// Step one ms at a time until the reveal finishes.
    fn run_to_completion(animator: &mut HarvestAnimator, id: &PlantId) -> u64 {
        let mut now = 0;
        while animator.is_animating(id) {
            now += 1;
            animator.update(now);
            assert!(now < 10_000, "reveal never finished");
        }
        now
    }

    #[test]
    fn sequence_ends_on_final_species() {
        let mut rng = SmallRng::seed_from_u64(1);
        let frames = build_frames(Tier::Rare, phoenix(), &mut rng);
        assert_eq!(frames.len(), 13);
        assert!(frames[10..].iter().all(|frame| *frame == phoenix()));
        for idx in 0..5 {
            assert_eq!(frames[idx], frames[idx + 5]);
        }
        assert!(frames.iter().all(|frame| Tier::Rare.species().contains(frame)));
    }

    #[test]
    fn easing_ramps_then_slows() {
        assert!((frame_duration(0) - 75.0).abs() < 1e-9);
        assert!(frame_duration(5) < frame_duration(8));
        assert!((frame_duration(13) - 600.0).abs() < 1e-9);
        let mut previous = 0.0;
        for idx in 0..13 {
            let delay = frame_duration(idx);
            assert!(delay > previous);
            previous = delay;
        }
    }

    #[test]
    fn hook_fires_exactly_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let (mut animator, id) = started(Some(Box::new(move || counter.set(counter.get() + 1))));
        let finished_at = run_to_completion(&mut animator, &id);
        assert_eq!(calls.get(), 1);
        assert!(animator.is_tracking(&id));
        animator.update(finished_at + 1);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn only_one_frame_advances_per_update() {
        let (mut animator, id) = started(None);
        animator.update(5_000);
        assert_eq!(animator.current_frame(&id).unwrap().0, 1);
    }

    #[test]
    fn finished_reveals_linger_until_grace_period() {
        let (mut animator, id) = started(None);
        run_to_completion(&mut animator, &id);
        animator.update(2_500);
        assert!(animator.is_tracking(&id));
        animator.update(2_501);
        assert!(!animator.is_tracking(&id));
    }

    #[test]
    fn cancel_skips_hook() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let (mut animator, id) = started(Some(Box::new(move || counter.set(1))));
        assert!(animator.cancel_animation(&id));
        animator.update(10_000);
        assert_eq!(calls.get(), 0);
        assert!(animator.is_empty());
    }

    #[test]
    fn running_reveal_draws_glow_placeholder_and_sparkles() {
        let (animator, _) = started(None);
        let mut canvas = RecordingCanvas::new();
        let mut images = StaticImages::none();
        animator.render(&mut canvas, &mut images, 0);
        assert_eq!(canvas.glyphs(), vec![PLACEHOLDER_GLYPH]);
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::RadialGlow { color, .. } if color == "#5e35b133")),
            1
        );
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::FillCircle { .. })),
            3
        );
        assert_eq!(images.requested().len(), 1);
    }

    #[test]
    fn finished_reveal_shows_final_image_and_checkmark() {
        let (mut animator, id) = started(None);
        let done = run_to_completion(&mut animator, &id);
        let mut canvas = RecordingCanvas::new();
        let mut images = StaticImages::all();
        animator.render(&mut canvas, &mut images, done);
        assert_eq!(canvas.images(), vec!["assets/rare/phoenix_bloom.png"]);
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::Polyline { .. })),
            1
        );
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::RadialGlow { .. })),
            0
        );
    }
}
