use crate::app::App;
use crate::input;
use intensity_core::{GestureState, ViewMode};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub app: App,
    pub dial: web::Element,
    pub track: web::Element,
}

impl InputWiring {
    fn element(&self, surface: ViewMode) -> &web::Element {
        match surface {
            ViewMode::Dial => &self.dial,
            ViewMode::Track => &self.track,
        }
    }
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w, ViewMode::Dial);
    wire_pointerdown(&w, ViewMode::Track);
    wire_pointermove(&w);
    wire_pointerup(&w, "pointerup");
    wire_pointerup(&w, "pointercancel");
}

fn wire_pointerdown(w: &InputWiring, surface: ViewMode) {
    let w = w.clone();
    let el = w.element(surface).clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let el = w.element(surface);
        let bounds = input::element_bounds(el);
        let pos = input::pointer_client_pos(&ev);
        let accepted = w
            .app
            .surface
            .borrow_mut()
            .pointer_down(surface, ev.pointer_id(), pos, bounds);
        if !accepted {
            return;
        }
        ev.prevent_default();
        _ = el.set_pointer_capture(ev.pointer_id());
        w.app.render_intensity();
    }) as Box<dyn FnMut(_)>);

    _ = el.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    closure.forget();
}

// Moves and releases are heard on the window so a drag survives leaving the surface.
fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let session = match w.app.surface.borrow().gesture() {
            GestureState::Dragging(s) if s.pointer_id == ev.pointer_id() => *s,
            _ => return,
        };
        ev.prevent_default();
        let el = w.element(session.surface).clone();
        let pos = input::pointer_client_pos(&ev);
        let moved = w
            .app
            .surface
            .borrow_mut()
            .pointer_move(ev.pointer_id(), pos, || input::element_bounds(&el));
        if moved.is_some() {
            w.app.render_intensity();
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

fn wire_pointerup(w: &InputWiring, event: &str) {
    let w = w.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let ended = w.app.surface.borrow_mut().pointer_up(ev.pointer_id());
        if ended {
            for el in [&w.dial, &w.track] {
                if el.has_pointer_capture(ev.pointer_id()) {
                    _ = el.release_pointer_capture(ev.pointer_id());
                }
            }
        }
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
