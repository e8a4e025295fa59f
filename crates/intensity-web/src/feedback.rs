use crate::audio::ClickAudio;
use crate::bridge;
use crate::constants::PULSE_NODE_ID;
use intensity_core::constants::{IDLE_OPACITY, IDLE_SCALE, PULSE_OPACITY, PULSE_SCALE};
use intensity_core::{ClickCue, FeedbackSink, HapticStrength};
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn pulse_node() -> Option<web::HtmlElement> {
    web::window()?
        .document()?
        .get_element_by_id(PULSE_NODE_ID)?
        .dyn_into::<web::HtmlElement>()
        .ok()
}

fn apply_pulse_style(el: &web::HtmlElement, scale: f32, opacity: f32) {
    let style = el.style();
    _ = style.set_property("opacity", &opacity.to_string());
    _ = style.set_property("transform", &format!("scale({})", scale));
}

/// Browser sink: Capacitor haptics, WebAudio click, DOM pulse.
#[derive(Default)]
pub struct WebFeedback {
    audio: ClickAudio,
}

impl FeedbackSink for WebFeedback {
    fn haptic_pulse(&mut self, strength: HapticStrength) {
        bridge::haptic_impact(strength);
    }

    fn play_click(&mut self, cue: &ClickCue) {
        self.audio.play(cue);
    }

    fn visual_pulse(&mut self, hold: Duration) {
        let Some(el) = pulse_node() else {
            return;
        };
        apply_pulse_style(&el, PULSE_SCALE, PULSE_OPACITY);
        // overlapping resets all land on the same idle style
        let reset = Closure::once_into_js(move || apply_pulse_style(&el, IDLE_SCALE, IDLE_OPACITY));
        if let Some(w) = web::window() {
            _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                reset.unchecked_ref(),
                hold.as_millis() as i32,
            );
        }
    }
}
