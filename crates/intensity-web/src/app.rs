use crate::ui;
use intensity_core::ControlSurface;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Shared handle every event closure holds.
#[derive(Clone)]
pub struct App {
    pub surface: Rc<RefCell<ControlSurface>>,
    pub document: web::Document,
}

impl App {
    pub fn render(&self) {
        // a settle hook can fire while an event handler still holds the surface
        match self.surface.try_borrow() {
            Ok(s) => ui::render_all(&self.document, &s),
            Err(_) => log::debug!("[ui] render skipped; surface busy"),
        }
    }

    pub fn render_intensity(&self) {
        if let Ok(s) = self.surface.try_borrow() {
            ui::render_intensity(&self.document, s.state().intensity(), &s.config().dial);
        }
    }
}
