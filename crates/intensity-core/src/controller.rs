//! Gesture session controller.
//!
//! Owns the drag lifecycle (`Idle` / `Dragging`) for whichever surface the
//! current [`ViewMode`] selects, and funnels every intensity write through one
//! path: state update, tick feedback, hardware dispatch.

use crate::adapter::HardwareAdapter;
use crate::bridge::CommandOverrides;
use crate::config::ControlConfig;
use crate::feedback::TickFeedback;
use crate::geometry::{dial_value, track_value, GeometrySampling, SurfaceBounds};
use crate::state::{AppState, Intensity, ViewMode};
use glam::Vec2;

/// Pointer identifier as reported by the host.
pub type PointerId = i32;

/// Exists only between acquire and release of one pointer on one surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSession {
    pub surface: ViewMode,
    pub pointer_id: PointerId,
    /// Bounds captured at acquire; refreshed per move only when resampling.
    pub bounds: SurfaceBounds,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(GestureSession),
}

pub struct ControlSurface {
    state: AppState,
    gesture: GestureState,
    feedback: TickFeedback,
    hardware: HardwareAdapter,
    config: ControlConfig,
}

impl ControlSurface {
    pub fn new(config: ControlConfig, feedback: TickFeedback, hardware: HardwareAdapter) -> Self {
        Self {
            state: AppState::default(),
            gesture: GestureState::Idle,
            feedback,
            hardware,
            config,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, GestureState::Dragging(_))
    }

    pub fn feedback(&self) -> &TickFeedback {
        &self.feedback
    }

    pub fn hardware(&self) -> &HardwareAdapter {
        &self.hardware
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Run the mapper for `surface` without touching state.
    pub fn map_pointer(&self, surface: ViewMode, pos: Vec2, bounds: &SurfaceBounds) -> Intensity {
        match surface {
            ViewMode::Dial => dial_value(pos, bounds.center(), &self.config.dial),
            ViewMode::Track => track_value(pos.y, bounds.top, bounds.height),
        }
    }

    /// Acquire a pointer on `surface`. Maps and dispatches immediately so a
    /// tap without motion still sets the value.
    ///
    /// Returns false (and does nothing) when the surface is not the active
    /// view or another pointer already owns the session.
    pub fn pointer_down(
        &mut self,
        surface: ViewMode,
        pointer_id: PointerId,
        pos: Vec2,
        bounds: SurfaceBounds,
    ) -> bool {
        if surface != self.state.mode() {
            log::debug!("[gesture] ignoring acquire on inactive {:?}", surface);
            return false;
        }
        if let GestureState::Dragging(s) = self.gesture {
            log::debug!(
                "[gesture] pointer {} ignored; {} owns the session",
                pointer_id,
                s.pointer_id
            );
            return false;
        }
        self.gesture = GestureState::Dragging(GestureSession {
            surface,
            pointer_id,
            bounds,
        });
        log::info!("[gesture] begin drag on {:?} (pointer {})", surface, pointer_id);
        let value = self.map_pointer(surface, pos, &bounds);
        self.write(value, &CommandOverrides::default());
        true
    }

    /// Route a move of the owning pointer through the active mapper.
    ///
    /// `current_bounds` is only called when sampling is `ResampleOnMove`.
    pub fn pointer_move(
        &mut self,
        pointer_id: PointerId,
        pos: Vec2,
        current_bounds: impl FnOnce() -> SurfaceBounds,
    ) -> Option<Intensity> {
        let session = match &mut self.gesture {
            GestureState::Dragging(s) if s.pointer_id == pointer_id => s,
            _ => return None,
        };
        if self.config.sampling == GeometrySampling::ResampleOnMove {
            session.bounds = current_bounds();
        }
        let (surface, bounds) = (session.surface, session.bounds);
        let value = self.map_pointer(surface, pos, &bounds);
        self.write(value, &CommandOverrides::default());
        Some(value)
    }

    /// Release ends the session wherever it happens.
    pub fn pointer_up(&mut self, pointer_id: PointerId) -> bool {
        match self.gesture {
            GestureState::Dragging(s) if s.pointer_id == pointer_id => {
                self.gesture = GestureState::Idle;
                log::info!(
                    "[gesture] end drag on {:?} at {}",
                    s.surface,
                    self.state.intensity()
                );
                true
            }
            _ => false,
        }
    }

    /// Write an explicit value through the same path as gestures.
    pub fn set_value(&mut self, value: Intensity) {
        self.write(value, &CommandOverrides::default());
    }

    /// Write with per-command overrides (camera, force level, burst, PWM).
    pub fn set_value_with(&mut self, value: Intensity, overrides: &CommandOverrides) {
        self.write(value, overrides);
    }

    pub fn nudge(&mut self, delta: i32) {
        let value = self.state.intensity().nudged(delta);
        self.set_value(value);
    }

    /// Switch surface. An active drag ends; intensity is kept.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == self.state.mode() {
            return;
        }
        if let GestureState::Dragging(s) = self.gesture {
            log::info!("[gesture] mode switch ends drag of pointer {}", s.pointer_id);
            self.gesture = GestureState::Idle;
        }
        self.state.set_mode(mode);
        log::info!("[gesture] mode -> {}", mode.as_str());
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.state.mode().toggled());
    }

    fn write(&mut self, value: Intensity, overrides: &CommandOverrides) {
        self.state.set_intensity(value);
        self.feedback.on_value(value);
        self.hardware.dispatch(value, overrides);
    }
}
