//! Browser canvas and image backends for the render loop.
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use garden_game::{Canvas, ImageCache};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug)]
struct ImageSlot {
    element: HtmlImageElement,
    state: Rc<Cell<LoadState>>,
}

/// Shared image handles keyed by asset path.
///
/// Clones share the same slots, so the surface can draw whatever the render
/// loop has confirmed as ready.
#[derive(Debug, Clone, Default)]
pub struct ImageLoader {
    slots: Rc<RefCell<HashMap<String, ImageSlot>>>,
}

impl ImageLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading every path that has not been requested yet.
    pub fn preload<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        for path in paths {
            self.request(path.as_ref());
        }
    }

    fn request(&self, path: &str) {
        if self.slots.borrow().contains_key(path) {
            return;
        }
        let element = match HtmlImageElement::new() {
            Ok(element) => element,
            Err(err) => {
                log::warn!("Failed to create image for {path}: {}", dom::js_error_message(&err));
                return;
            }
        };
        let state = Rc::new(Cell::new(LoadState::Pending));

        let loaded = Rc::clone(&state);
        let loaded_path = path.to_string();
        let on_load = Closure::once(move || {
            loaded.set(LoadState::Ready);
            log::debug!("Loaded image: {loaded_path}");
        });
        let failed = Rc::clone(&state);
        let failed_path = path.to_string();
        let on_error = Closure::once(move || {
            failed.set(LoadState::Failed);
            log::warn!("Failed to load image: {failed_path}");
        });
        element.set_onload(Some(on_load.as_ref().unchecked_ref()));
        element.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_load.forget();
        on_error.forget();
        element.set_src(path);

        self.slots
            .borrow_mut()
            .insert(path.to_string(), ImageSlot { element, state });
    }

    fn ready_element(&self, path: &str) -> Option<HtmlImageElement> {
        self.slots
            .borrow()
            .get(path)
            .filter(|slot| slot.state.get() == LoadState::Ready)
            .map(|slot| slot.element.clone())
    }

    /// Number of images that finished loading.
    #[must_use]
    pub fn ready_count(&self) -> usize {
        self.slots
            .borrow()
            .values()
            .filter(|slot| slot.state.get() == LoadState::Ready)
            .count()
    }
}

impl ImageCache for ImageLoader {
    fn is_ready(&mut self, path: &str) -> bool {
        self.request(path);
        self.ready_element(path).is_some()
    }
}

/// [`Canvas`] over a 2D rendering context.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: ImageLoader,
}

fn report(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        log::debug!("canvas {op} failed: {}", dom::js_error_message(&err));
    }
}

impl CanvasSurface {
    /// Wrap the 2D context of `canvas`.
    ///
    /// # Errors
    /// Returns an error if the browser refuses a 2D context.
    pub fn from_canvas(canvas: &HtmlCanvasElement, images: ImageLoader) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx, images })
    }

    /// Reset the transform to the device pixel ratio.
    pub fn set_pixel_ratio(&self, ratio: f64) {
        report(
            "set_transform",
            self.ctx.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0),
        );
    }

    fn circle_path(&self, x: f64, y: f64, radius: f64) {
        self.ctx.begin_path();
        report("arc", self.ctx.arc(x, y, radius, 0.0, TAU));
    }
}

impl Canvas for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn translate(&mut self, x: f64, y: f64) {
        report("translate", self.ctx.translate(x, y));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        report("scale", self.ctx.scale(sx, sy));
    }

    fn fill_vertical_gradient(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        top: &str,
        bottom: &str,
    ) {
        let gradient = self.ctx.create_linear_gradient(x, y, x, y + height);
        report("add_color_stop", gradient.add_color_stop(0.0, top));
        report("add_color_stop", gradient.add_color_stop(1.0, bottom));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x, y, width, height);
    }

    fn fill_radial_glow(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius) {
            Ok(gradient) => gradient,
            Err(err) => {
                report("create_radial_gradient", Err(err));
                return;
            }
        };
        report("add_color_stop", gradient.add_color_stop(0.0, color));
        report("add_color_stop", gradient.add_color_stop(1.0, "transparent"));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(x, y, radius);
        self.ctx.fill();
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.circle_path(x, y, radius);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.circle_path(x, y, radius);
        self.ctx.stroke();
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
        let Some(((first_x, first_y), rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
        self.ctx.begin_path();
        self.ctx.move_to(*first_x, *first_y);
        for (x, y) in rest {
            self.ctx.line_to(*x, *y);
        }
        self.ctx.stroke();
    }

    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64, size: f64) {
        self.ctx.set_font(&format!("{size}px serif"));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        report("fill_text", self.ctx.fill_text(glyph, x, y));
    }

    fn draw_image(&mut self, path: &str, x: f64, y: f64, width: f64, height: f64) {
        let Some(element) = self.images.ready_element(path) else {
            return;
        };
        report(
            "draw_image",
            self.ctx
                .draw_image_with_html_image_element_and_dw_and_dh(&element, x, y, width, height),
        );
    }
}
