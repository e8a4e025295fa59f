#![cfg(target_arch = "wasm32")]
mod app;
mod audio;
mod bridge;
mod constants;
mod dom;
mod events;
mod feedback;
mod input;
mod spawn;
mod ui;

use crate::app::App;
use crate::bridge::CapacitorBridge;
use crate::constants::{DIAL_ID, MODE_BUTTON_SELECTOR, TRACK_ID};
use crate::feedback::WebFeedback;
use crate::spawn::WebSpawner;
use intensity_core::{
    split_pairs, ControlConfig, ControlSurface, HardwareAdapter, TickFeedback, ViewMode,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("intensity-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

/// `?thud=0&geometry=resample` style overrides from the page URL.
fn load_config(window: &web::Window) -> ControlConfig {
    let mut config = ControlConfig::default();
    let search = window.location().search().unwrap_or_default();
    let query = search.trim_start_matches('?');
    let errors = config.apply_pairs(split_pairs(query.split('&')));
    if !errors.is_empty() {
        log::warn!("[config] {} override(s) ignored", errors.len());
    }
    config
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let dial = document
        .get_element_by_id(DIAL_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", DIAL_ID))?;
    let track = document
        .get_element_by_id(TRACK_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", TRACK_ID))?;

    let config = load_config(&window);
    let poll_ms = i32::try_from(config.telemetry_interval.as_millis()).unwrap_or(i32::MAX);
    log::info!(
        "[config] thud={} sampling={:?} arc={} poll={}ms",
        config.feedback.include_thud,
        config.sampling,
        config.dial.span_deg,
        poll_ms
    );

    let spawner = Rc::new(WebSpawner::default());
    let adapter = HardwareAdapter::new(
        Rc::new(CapacitorBridge::detect()),
        spawner.clone(),
        config.overrides.clone(),
    );
    let feedback = TickFeedback::new(config.feedback.clone(), Box::new(WebFeedback::default()));
    let app = App {
        surface: Rc::new(RefCell::new(ControlSurface::new(config, feedback, adapter))),
        document: document.clone(),
    };
    {
        let app = app.clone();
        spawner.set_on_settle(move || app.render());
    }

    events::wire_input_handlers(events::InputWiring {
        app: app.clone(),
        dial,
        track,
    });
    events::wire_global_keydown(app.clone());
    {
        let app = app.clone();
        dom::add_click_listeners(&document, MODE_BUTTON_SELECTOR, move |el| {
            let Some(mode) = el.get_attribute("data-mode").and_then(|m| ViewMode::parse(&m)) else {
                return;
            };
            app.surface.borrow_mut().set_mode(mode);
            app.render();
        });
    }

    // telemetry poll runs for the page lifetime
    {
        let app = app.clone();
        let tick = Closure::wrap(Box::new(move || {
            if let Ok(s) = app.surface.try_borrow() {
                s.hardware().poll_telemetry();
            }
        }) as Box<dyn FnMut()>);
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                poll_ms,
            )
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
        tick.forget();
    }

    app.surface.borrow().hardware().initialize();
    app.render();
    Ok(())
}
