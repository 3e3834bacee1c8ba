//! Sound playback through `HTMLAudioElement`.
use garden_game::SoundPlayer;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::HtmlAudioElement;

use crate::dom;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("could not play `{asset}`: {message}")]
pub struct PlaybackError {
    pub asset: String,
    pub message: String,
}

/// Starts a fresh audio element per request so chimes may overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlAudioPlayer;

impl SoundPlayer for HtmlAudioPlayer {
    type Error = PlaybackError;

    fn play(&mut self, asset: &str, volume: f64) -> Result<(), Self::Error> {
        let failed = |err: &JsValue| PlaybackError {
            asset: asset.to_string(),
            message: dom::js_error_message(err),
        };
        let element = HtmlAudioElement::new_with_src(asset).map_err(|err| failed(&err))?;
        element.set_volume(volume.clamp(0.0, 1.0));
        let promise = element.play().map_err(|err| failed(&err))?;

        // Autoplay refusals arrive asynchronously.
        let name = asset.to_string();
        let on_reject = Closure::once(move |err: JsValue| {
            log::warn!("Failed to play sound {name}: {}", dom::js_error_message(&err));
        });
        let _ = promise.catch(&on_reject);
        on_reject.forget();
        Ok(())
    }
}
