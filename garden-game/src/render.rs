//! Per-frame drawing of the garden and in-flight reveals.
use crate::KeyValueStore;
use crate::assets::ImageCache;
use crate::canvas::Canvas;
use crate::clock::Clock;
use crate::constants::{
    BACKGROUND_ASSET, CHECKMARK_COLOR, CHECKMARK_WIDTH, HARVESTED_ALPHA, HOVER_RING_COLOR,
    HOVER_RING_RADIUS, HOVER_RING_WIDTH, MEADOW_COLOR, PLACEHOLDER_GLYPH, PLANT_GLYPH_SIZE,
    PLANT_IMAGE_SIZE, SKY_COLOR,
};
use crate::garden::Garden;
use crate::harvest_anim::HarvestAnimator;
use crate::model::{Plant, PlantId};

/// Checkmark overlay drawn on harvested plants.
pub fn draw_checkmark<C: Canvas + ?Sized>(canvas: &mut C, x: f64, y: f64) {
    canvas.stroke_polyline(
        &[(x - 10.0, y), (x - 2.0, y + 8.0), (x + 12.0, y - 8.0)],
        CHECKMARK_COLOR,
        CHECKMARK_WIDTH,
    );
}

/// Owns the reveal animator and hover state; draws one frame per call.
#[derive(Debug, Default)]
pub struct GardenRenderer {
    animator: HarvestAnimator,
    hovered: Option<PlantId>,
    width: f64,
    height: f64,
}

impl GardenRenderer {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Logical (CSS pixel) size of the surface.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn set_hovered(&mut self, plant: Option<PlantId>) {
        self.hovered = plant;
    }

    #[must_use]
    pub const fn hovered(&self) -> Option<&PlantId> {
        self.hovered.as_ref()
    }

    #[must_use]
    pub const fn animator(&self) -> &HarvestAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut HarvestAnimator {
        &mut self.animator
    }

    /// Clear, draw the background, advance reveals, draw resting plants and
    /// then reveals on top. Returns plants whose reveal finished this frame.
    pub fn frame<S, T, K, I>(
        &mut self,
        garden: &Garden<S, T>,
        canvas: &mut K,
        images: &mut I,
    ) -> Vec<PlantId>
    where
        S: KeyValueStore,
        T: Clock,
        K: Canvas + ?Sized,
        I: ImageCache + ?Sized,
    {
        let now = garden.now();
        canvas.clear(self.width, self.height);
        self.draw_background(canvas, images);

        let finished = self.animator.update(now);

        for plant in garden.plants() {
            if !self.animator.is_tracking(&plant.id) {
                self.draw_plant(canvas, images, plant, now);
            }
        }

        self.animator.render(canvas, images, now);
        finished
    }

    fn draw_background<K, I>(&self, canvas: &mut K, images: &mut I)
    where
        K: Canvas + ?Sized,
        I: ImageCache + ?Sized,
    {
        if images.is_ready(BACKGROUND_ASSET) {
            canvas.draw_image(BACKGROUND_ASSET, 0.0, 0.0, self.width, self.height);
        } else {
            canvas.fill_vertical_gradient(
                0.0,
                0.0,
                self.width,
                self.height,
                SKY_COLOR,
                MEADOW_COLOR,
            );
        }
    }

    fn draw_plant<K, I>(&self, canvas: &mut K, images: &mut I, plant: &Plant, now: u64)
    where
        K: Canvas + ?Sized,
        I: ImageCache + ?Sized,
    {
        let x = plant.position.x;
        let y = plant.position.y;

        match plant.status.harvested_species() {
            Some(species) => {
                canvas.save();
                canvas.set_alpha(HARVESTED_ALPHA);
                let path = species.icon_path();
                if images.is_ready(&path) {
                    let half = PLANT_IMAGE_SIZE / 2.0;
                    canvas.draw_image(&path, x - half, y - half, PLANT_IMAGE_SIZE, PLANT_IMAGE_SIZE);
                } else {
                    canvas.draw_glyph(PLACEHOLDER_GLYPH, x, y, PLANT_GLYPH_SIZE);
                }
                draw_checkmark(canvas, x, y);
                canvas.restore();
            }
            None => {
                if self.hovered.as_ref() == Some(&plant.id) {
                    canvas.stroke_circle(x, y, HOVER_RING_RADIUS, HOVER_RING_COLOR, HOVER_RING_WIDTH);
                }
                let stage = plant.growth_stage_at(now);
                canvas.draw_glyph(stage.glyph(), x, y, PLANT_GLYPH_SIZE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::StaticImages;
    use crate::canvas::{DrawCommand, RecordingCanvas};
    use crate::clock::ManualClock;
    use crate::config::GardenConfig;
    use crate::constants::{HOUR_MS, MIN_COMPLETE_TIME_MS};
    use crate::persist::MemoryStore;

    fn garden() -> (Garden<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::starting_at(1_000);
        let garden =
            Garden::open(MemoryStore::new(), clock.clone(), GardenConfig::default(), 4).unwrap();
        (garden, clock)
    }

    #[test]
    fn background_falls_back_to_gradient() {
        let (garden, _) = garden();
        let mut renderer = GardenRenderer::new(400.0, 300.0);
        let mut canvas = RecordingCanvas::new();
        renderer.frame(&garden, &mut canvas, &mut StaticImages::none());
        assert_eq!(
            canvas.commands[0],
            DrawCommand::Clear {
                width: 400.0,
                height: 300.0
            }
        );
        assert!(matches!(
            canvas.commands[1],
            DrawCommand::VerticalGradient { ref top, ref bottom, .. } if top == SKY_COLOR && bottom == MEADOW_COLOR
        ));

        let mut canvas = RecordingCanvas::new();
        renderer.frame(&garden, &mut canvas, &mut StaticImages::all());
        assert_eq!(canvas.images(), vec![BACKGROUND_ASSET]);
    }

    #[test]
    fn plants_draw_their_stage_glyph_and_hover_ring() {
        let (mut garden, clock) = garden();
        let seed = garden.consume_seed().unwrap();
        let id = garden.plant_seed(20.0, 20.0, "Stretch", seed);
        garden.start_growth(&id);
        clock.advance(HOUR_MS);

        let mut renderer = GardenRenderer::new(100.0, 100.0);
        renderer.set_hovered(Some(id));
        let mut canvas = RecordingCanvas::new();
        renderer.frame(&garden, &mut canvas, &mut StaticImages::none());
        assert_eq!(canvas.glyphs(), vec!["🌿"]);
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::StrokeCircle { radius, .. } if *radius == HOVER_RING_RADIUS)),
            1
        );
    }

    #[test]
    fn harvested_plants_are_faded_with_checkmark() {
        let (mut garden, clock) = garden();
        let seed = garden.consume_seed().unwrap();
        let id = garden.plant_seed(20.0, 20.0, "Stretch", seed);
        garden.start_growth(&id);
        clock.advance(MIN_COMPLETE_TIME_MS);
        let outcome = garden.complete_plant(&id).unwrap();

        let mut renderer = GardenRenderer::new(100.0, 100.0);
        renderer.set_hovered(Some(id));
        let mut canvas = RecordingCanvas::new();
        renderer.frame(&garden, &mut canvas, &mut StaticImages::all());
        assert!(canvas.commands.contains(&DrawCommand::Alpha(HARVESTED_ALPHA)));
        assert!(canvas.images().contains(&outcome.dex_key.icon_path().as_str()));
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::StrokeCircle { .. })),
            0
        );
        assert_eq!(
            canvas.count(|cmd| matches!(cmd, DrawCommand::Polyline { .. })),
            1
        );
    }
}
