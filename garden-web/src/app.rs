//! JavaScript-facing garden controller.
//!
//! `GardenApp` owns the session, drives the frame loop with
//! `requestAnimationFrame`, and routes pointer input from the canvas. The
//! surrounding page (seed bank, dex, toasts, title prompt, popover) polls the
//! JSON views exposed here and listens for [`ShellEvent`] names through the
//! callback given to [`GardenApp::on_event`].
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use garden_game::{
    ClickTarget, Garden, GardenConfig, GardenSession, Notice, PlantId, Sound, preload_paths,
};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent};

use crate::audio::HtmlAudioPlayer;
use crate::canvas::{CanvasSurface, ImageLoader};
use crate::clock::BrowserClock;
use crate::dom;
use crate::storage::LocalStorageStore;

type WebSession = GardenSession<LocalStorageStore, BrowserClock, HtmlAudioPlayer>;

/// Notifications pushed to the page's event callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// Empty ground was clicked; ask for a task title.
    PromptTitle,
    /// A plant was selected; show its popover.
    OpenPopover,
    /// The hovered plant or tooltip text changed.
    Hover,
    /// Seeds, plants, dex or notices changed; refresh the HUD.
    Changed,
}

impl ShellEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PromptTitle => "prompt-title",
            Self::OpenPopover => "open-popover",
            Self::Hover => "hover",
            Self::Changed => "changed",
        }
    }

    /// Events raised by a click on the garden surface.
    #[must_use]
    pub fn for_click(target: &ClickTarget) -> Vec<Self> {
        match target {
            ClickTarget::Plant(_) => vec![Self::OpenPopover],
            ClickTarget::Ground(_) => vec![Self::PromptTitle],
            ClickTarget::NoSeeds => vec![Self::Changed],
            ClickTarget::Harvested => Vec::new(),
        }
    }
}

/// Tooltip state for the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipView {
    pub plant_id: PlantId,
    pub text: String,
    pub client_x: f64,
    pub client_y: f64,
}

/// Resolve a sound name coming from the page.
#[must_use]
pub fn parse_sound(name: &str) -> Option<Sound> {
    Sound::ALL.into_iter().find(|sound| sound.as_str() == name)
}

/// Backing-store size for a CSS box at the given pixel ratio.
#[must_use]
pub fn backing_size(css_width: f64, css_height: f64, ratio: f64) -> (u32, u32) {
    let scale = |value: f64| {
        let scaled = (value * ratio).round();
        if scaled.is_finite() && scaled > 0.0 {
            scaled.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    };
    (scale(css_width), scale(css_height))
}

struct Shell {
    session: WebSession,
    surface: CanvasSurface,
    images: ImageLoader,
    canvas: HtmlCanvasElement,
    tooltip: Option<TooltipView>,
}

impl Shell {
    fn local_point(&self, client_x: f64, client_y: f64) -> (f64, f64) {
        let rect = self.canvas.get_bounding_client_rect();
        (client_x - rect.left(), client_y - rect.top())
    }

    fn fit_to_layout(&mut self) {
        let rect = self.canvas.get_bounding_client_rect();
        let ratio = dom::device_pixel_ratio();
        let (width, height) = backing_size(rect.width(), rect.height(), ratio);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.surface.set_pixel_ratio(ratio);
        self.session.resize(rect.width(), rect.height());
    }

    fn set_cursor(&self, pointer: bool) {
        let cursor = if pointer { "pointer" } else { "crosshair" };
        let _ = self.canvas.style().set_property("cursor", cursor);
    }

    fn click(&mut self, client_x: f64, client_y: f64) -> Vec<ShellEvent> {
        let (x, y) = self.local_point(client_x, client_y);
        let target = self.session.click(x, y);
        if matches!(target, ClickTarget::Plant(_)) {
            self.tooltip = None;
        }
        ShellEvent::for_click(&target)
    }

    fn hover(&mut self, client_x: f64, client_y: f64) -> Vec<ShellEvent> {
        let (x, y) = self.local_point(client_x, client_y);
        let next = self.session.hover(x, y).map(|view| TooltipView {
            plant_id: view.plant_id,
            text: view.tooltip,
            client_x,
            client_y,
        });
        self.set_cursor(next.is_some());
        if next == self.tooltip {
            return Vec::new();
        }
        self.tooltip = next;
        vec![ShellEvent::Hover]
    }

    fn leave(&mut self) -> Vec<ShellEvent> {
        self.session.pointer_leave();
        self.set_cursor(false);
        if self.tooltip.take().is_some() {
            vec![ShellEvent::Hover]
        } else {
            Vec::new()
        }
    }

    fn frame(&mut self) -> Vec<ShellEvent> {
        let report = self.session.frame(&mut self.surface, &mut self.images);
        if report.tick.seed_bank_changed
            || report.tick.notices_released > 0
            || !report.reveals_finished.is_empty()
        {
            vec![ShellEvent::Changed]
        } else {
            Vec::new()
        }
    }
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

type EventSink = Rc<RefCell<Option<js_sys::Function>>>;

fn dispatch(sink: &EventSink, events: Vec<ShellEvent>) {
    let Some(callback) = sink.borrow().clone() else {
        return;
    };
    for event in events {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(event.as_str())) {
            log::warn!("garden event handler failed: {}", dom::js_error_message(&err));
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// The garden bound to one `<canvas>` element.
#[wasm_bindgen]
pub struct GardenApp {
    shell: Rc<RefCell<Shell>>,
    sink: EventSink,
    listeners: Vec<Listener>,
    frame: FrameCallback,
    frame_handle: Rc<Cell<Option<i32>>>,
}

#[wasm_bindgen]
impl GardenApp {
    /// Open the saved garden and bind it to the canvas with id `canvas_id`.
    ///
    /// `config` may be `undefined` for defaults or an object overriding any
    /// [`GardenConfig`] field.
    ///
    /// # Errors
    /// Returns an error when the canvas, `localStorage` or the config is unusable.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config: JsValue) -> Result<GardenApp, JsValue> {
        let config: GardenConfig = if config.is_undefined() || config.is_null() {
            GardenConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let canvas = dom::canvas_by_id(canvas_id)?;
        let store = LocalStorageStore::open().map_err(|err| JsValue::from_str(&err.to_string()))?;
        let seed = dom::now_ms() ^ (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64;
        let garden = Garden::open(store, BrowserClock, config, seed)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let images = ImageLoader::new();
        images.preload(preload_paths());
        let surface = CanvasSurface::from_canvas(&canvas, images.clone())?;
        let rect = canvas.get_bounding_client_rect();
        let session = GardenSession::new(garden, HtmlAudioPlayer, rect.width(), rect.height());

        let mut shell = Shell {
            session,
            surface,
            images,
            canvas,
            tooltip: None,
        };
        shell.fit_to_layout();
        shell.set_cursor(false);

        let mut app = Self {
            shell: Rc::new(RefCell::new(shell)),
            sink: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
            frame_handle: Rc::new(Cell::new(None)),
        };
        app.bind_pointer_events()?;
        log::info!("garden ready on #{canvas_id}");
        Ok(app)
    }

    /// Register `callback(eventName)` for shell notifications.
    pub fn on_event(&self, callback: js_sys::Function) {
        *self.sink.borrow_mut() = Some(callback);
    }

    /// Start the frame loop. Calling it twice keeps a single loop.
    ///
    /// # Errors
    /// Returns an error if `requestAnimationFrame` is unavailable.
    pub fn start(&self) -> Result<(), JsValue> {
        if self.frame_handle.get().is_some() {
            return Ok(());
        }
        let shell = Rc::clone(&self.shell);
        let sink = Rc::clone(&self.sink);
        let next = Rc::clone(&self.frame);
        let handle = Rc::clone(&self.frame_handle);
        let tick = Closure::wrap(Box::new(move |_timestamp: f64| {
            let events = shell.borrow_mut().frame();
            dispatch(&sink, events);
            handle.set(next.borrow().as_ref().and_then(request_frame));
        }) as Box<dyn FnMut(f64)>);
        let first = request_frame(&tick).ok_or_else(|| JsValue::from_str("requestAnimationFrame unavailable"))?;
        self.frame_handle.set(Some(first));
        *self.frame.borrow_mut() = Some(tick);
        Ok(())
    }

    /// Stop the frame loop.
    pub fn stop(&self) {
        if let Some(handle) = self.frame_handle.take()
            && let Some(win) = dom::window()
        {
            let _ = win.cancel_animation_frame(handle);
        }
        self.frame.borrow_mut().take();
    }

    /// Plant the oldest seed at the pending spot. Returns the new plant id.
    pub fn confirm_title(&self, title: &str) -> Option<String> {
        let planted = self.shell.borrow_mut().session.confirm_title(title);
        dispatch(&self.sink, vec![ShellEvent::Changed]);
        planted.map(|id| id.to_string())
    }

    pub fn cancel_title(&self) {
        self.shell.borrow_mut().session.cancel_title();
    }

    pub fn has_pending_plant(&self) -> bool {
        self.shell.borrow().session.pending_plant().is_some()
    }

    pub fn close_popover(&self) {
        self.shell.borrow_mut().session.close_popover();
    }

    pub fn start_growth(&self, plant_id: &str) -> bool {
        let started = self
            .shell
            .borrow_mut()
            .session
            .start_growth(&PlantId::from(plant_id));
        dispatch(&self.sink, vec![ShellEvent::Changed]);
        started
    }

    /// Harvest a plant. Rejections surface as notices.
    pub fn harvest(&self, plant_id: &str) -> bool {
        let outcome = self
            .shell
            .borrow_mut()
            .session
            .harvest(&PlantId::from(plant_id));
        dispatch(&self.sink, vec![ShellEvent::Changed]);
        outcome.is_ok()
    }

    pub fn remove_plant(&self, plant_id: &str) -> bool {
        let removed = self
            .shell
            .borrow_mut()
            .session
            .remove(&PlantId::from(plant_id));
        dispatch(&self.sink, vec![ShellEvent::Changed]);
        removed
    }

    pub fn clear_harvested(&self) -> usize {
        let cleared = self.shell.borrow_mut().session.clear_harvested();
        dispatch(&self.sink, vec![ShellEvent::Changed]);
        cleared
    }

    pub fn reset(&self) {
        self.shell.borrow_mut().session.reset();
        dispatch(&self.sink, vec![ShellEvent::Changed]);
    }

    pub fn set_sfx(&self, enabled: bool) {
        self.shell.borrow_mut().session.set_sfx(enabled);
    }

    pub fn set_animations(&self, enabled: bool) {
        self.shell.borrow_mut().session.set_animations(enabled);
    }

    /// Set the volume of a named sound. Unknown names are ignored.
    pub fn set_volume(&self, sound: &str, volume: f64) -> bool {
        let Some(sound) = parse_sound(sound) else {
            return false;
        };
        self.shell.borrow_mut().session.set_volume(sound, volume);
        true
    }

    /// Re-read the canvas layout after a resize.
    pub fn resize(&self) {
        self.shell.borrow_mut().fit_to_layout();
    }

    /// Drain pending toasts as `[{ level, message, durationMs }]`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn take_notices(&self) -> Result<JsValue, JsValue> {
        let notices: Vec<Notice> = self.shell.borrow_mut().session.take_notices();
        to_js(&notices)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn seed_bank(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shell.borrow().session.seed_bank())
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn dex(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shell.borrow().session.garden().dex().sections())
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn popover(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shell.borrow().session.popover())
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn tooltip(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shell.borrow().tooltip)
    }

    /// # Errors
    /// Returns an error if serialization fails.
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(&self.shell.borrow().session.garden().settings())
    }
}

impl GardenApp {
    fn bind_pointer_events(&mut self) -> Result<(), JsValue> {
        let target: EventTarget = self.shell.borrow().canvas.clone().into();

        self.listen(&target, "click", |shell, event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return Vec::new();
            };
            shell.click(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
        })?;
        self.listen(&target, "mousemove", |shell, event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return Vec::new();
            };
            shell.hover(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
        })?;
        self.listen(&target, "mouseleave", |shell, _| shell.leave())?;
        self.listen(&target, "touchstart", |shell, event| {
            event.prevent_default();
            let Some(touch) = event
                .dyn_ref::<TouchEvent>()
                .and_then(|touch| touch.touches().get(0))
            else {
                return Vec::new();
            };
            shell.click(f64::from(touch.client_x()), f64::from(touch.client_y()))
        })?;

        if let Some(win) = dom::window() {
            let win: EventTarget = win.into();
            self.listen(&win, "resize", |shell, _| {
                shell.fit_to_layout();
                Vec::new()
            })?;
        }
        Ok(())
    }

    fn listen<F>(&mut self, target: &EventTarget, kind: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: Fn(&mut Shell, &Event) -> Vec<ShellEvent> + 'static,
    {
        let shell = Rc::clone(&self.shell);
        let sink = Rc::clone(&self.sink);
        let callback = Closure::wrap(Box::new(move |event: Event| {
            let events = handler(&mut shell.borrow_mut(), &event);
            dispatch(&sink, events);
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }
}

impl Drop for GardenApp {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
    dom::window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}
