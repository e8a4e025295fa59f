use crate::app::App;
use crate::constants::INFO_ID;
use crate::dom;
use intensity_core::{key_action, Intensity, KeyAction};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

fn run_deep_scan(app: &App) {
    let pending = app.surface.borrow().hardware().deep_scan();
    let document = app.document.clone();
    spawn_local(async move {
        match pending.await {
            Ok(result) => {
                log::info!("[hw] deep scan: {}", result);
                dom::set_text(&document, INFO_ID, &result);
            }
            Err(e) => log::warn!("[hw] deep scan failed: {}", e),
        }
    });
}

fn run_dump(app: &App) {
    let pending = {
        let surface = app.surface.borrow();
        let camera = surface.hardware().default_camera_id();
        log::info!("[hw] dumping characteristics of camera {}", camera);
        surface.hardware().dump_characteristics(&camera)
    };
    spawn_local(async move {
        match pending.await {
            Ok(lines) => {
                for line in &lines {
                    log::info!("[hw] {}", line);
                }
            }
            Err(e) => log::warn!("[hw] dump failed: {}", e),
        }
    });
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, app: &App) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let Some(action) = key_action(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::Nudge(delta) => app.surface.borrow_mut().nudge(delta),
        KeyAction::Jump(v) => app.surface.borrow_mut().set_value(Intensity::new(v)),
        KeyAction::ToggleMode => app.surface.borrow_mut().toggle_mode(),
        KeyAction::DeepScan => {
            run_deep_scan(app);
            return;
        }
        KeyAction::DumpCharacteristics => {
            run_dump(app);
            return;
        }
    }
    ev.prevent_default();
    app.render();
}

pub fn wire_global_keydown(app: App) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &app);
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
