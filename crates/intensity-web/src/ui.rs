use crate::constants::{
    ARC_FILL_ID, ARC_RADIUS_PX, BEAM_ID, DIAL_CSS_ROTATION_DEG, DIAL_ID, DIAL_VIEW_ID, INFO_ID,
    KNOB_ID, MODE_BUTTON_SELECTOR, STATUS_ID, STEP_SELECTOR, TRACK_VIEW_ID,
};
use crate::dom;
use intensity_core::{ControlSurface, DialArc, HardwareView, Intensity, ViewMode};
use wasm_bindgen::JsCast;
use web_sys as web;

fn set_class(el: &web::Element, class: &str, on: bool) {
    _ = el.class_list().toggle_with_force(class, on);
}

fn render_dial(document: &web::Document, value: Intensity, arc: &DialArc) {
    if let Some(dial) = dom::html_element(document, DIAL_ID) {
        let deg = arc.indicator_angle_deg(value) + DIAL_CSS_ROTATION_DEG;
        _ = dial
            .style()
            .set_property("transform", &format!("rotate({}deg)", deg));
    }
    if let Some(fill) = document.get_element_by_id(ARC_FILL_ID) {
        let total = arc.span_deg / 360.0 * std::f32::consts::TAU * ARC_RADIUS_PX;
        let offset = total * (1.0 - value.fraction() as f32);
        _ = fill.set_attribute("stroke-dasharray", &total.to_string());
        _ = fill.set_attribute("stroke-dashoffset", &offset.to_string());
    }
}

fn render_track(document: &web::Document, value: Intensity) {
    let pct = format!("{}%", value.get());
    if let Some(beam) = dom::html_element(document, BEAM_ID) {
        let style = beam.style();
        _ = style.set_property("height", &pct);
        let bg = if value == Intensity::MIN { "transparent" } else { "#fff" };
        _ = style.set_property("background", bg);
    }
    if let Some(knob) = dom::html_element(document, KNOB_ID) {
        _ = knob.style().set_property("bottom", &pct);
    }
}

fn render_steps(document: &web::Document, value: Intensity) {
    let Ok(nodes) = document.query_selector_all(STEP_SELECTOR) else {
        return;
    };
    let lit = value.level_step();
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let level = el
            .get_attribute("data-level")
            .and_then(|l| l.parse::<u8>().ok())
            .unwrap_or(u8::MAX);
        set_class(&el, "active", level <= lit);
    }
}

pub fn render_intensity(document: &web::Document, value: Intensity, arc: &DialArc) {
    render_dial(document, value, arc);
    render_track(document, value);
    render_steps(document, value);
}

pub fn render_mode(document: &web::Document, mode: ViewMode) {
    if let Some(el) = document.get_element_by_id(DIAL_VIEW_ID) {
        set_class(&el, "active", mode == ViewMode::Dial);
    }
    if let Some(el) = document.get_element_by_id(TRACK_VIEW_ID) {
        set_class(&el, "active", mode == ViewMode::Track);
    }
    if let Ok(nodes) = document.query_selector_all(MODE_BUTTON_SELECTOR) {
        for i in 0..nodes.length() {
            if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) {
                let target = el.get_attribute("data-mode").and_then(|m| ViewMode::parse(&m));
                set_class(&el, "active", target == Some(mode));
            }
        }
    }
}

/// Status banner plus telemetry line. Missing nodes are skipped.
pub fn render_hardware(document: &web::Document, view: &HardwareView) {
    dom::set_text(document, STATUS_ID, &view.status_text());
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        set_class(&el, "error", view.latest().is_some_and(|o| !o.is_ok()));
        set_class(&el, "init-error", view.init_error().is_some());
        set_class(&el, "stale", view.latest_is_stale());
    }
    if let Some(t) = view.telemetry() {
        dom::set_text(document, INFO_ID, &t.summary());
    }
}

pub fn render_all(document: &web::Document, surface: &ControlSurface) {
    let state = surface.state();
    render_intensity(document, state.intensity(), &surface.config().dial);
    render_mode(document, state.mode());
    render_hardware(document, &surface.hardware().view());
}
