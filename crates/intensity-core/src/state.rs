//! Process-lifetime control state shared by every front-end.
//!
//! These types avoid platform APIs so the web and native hosts can both own an
//! [`AppState`] and pass it to the gesture controller. Intensity is written
//! only through the mappers (via the controller) or explicit nudges.

use crate::constants::{INTENSITY_MAX, LEVEL_STEP_COUNT};

/// Controlled output quantity, an integer percentage in `0..=100`.
///
/// Construction always clamps and rounds, so no input (including NaN or
/// infinities) produces an out-of-range value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: Intensity = Intensity(0);
    pub const MAX: Intensity = Intensity(INTENSITY_MAX);

    /// Clamp and round an arbitrary percentage.
    pub fn from_percent(value: f32) -> Self {
        if !value.is_finite() {
            // +inf is unambiguous; NaN carries no position and falls back to 0
            return if value == f32::INFINITY {
                Self::MAX
            } else {
                Self::MIN
            };
        }
        let v = value.clamp(0.0, INTENSITY_MAX as f32).round();
        Intensity(v as u8)
    }

    pub fn new(value: u8) -> Self {
        Intensity(value.min(INTENSITY_MAX))
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Integer floor used for tick detection.
    #[inline]
    pub fn floor(self) -> u8 {
        self.0
    }

    /// Value as the `0..=1` fraction carried by actuator commands.
    #[inline]
    pub fn fraction(self) -> f64 {
        self.0 as f64 / INTENSITY_MAX as f64
    }

    /// Add a signed delta, saturating at both ends.
    pub fn nudged(self, delta: i32) -> Self {
        let v = (self.0 as i32 + delta).clamp(0, INTENSITY_MAX as i32);
        Intensity(v as u8)
    }

    /// Number of lit header segments (1..=5); zero still shows one.
    pub fn level_step(self) -> u8 {
        let per_step = INTENSITY_MAX / LEVEL_STEP_COUNT;
        let step = self.0.div_ceil(per_step);
        step.max(1)
    }
}

impl std::fmt::Display for Intensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Which gesture surface is currently active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewMode {
    #[default]
    Dial,
    Track,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Dial => ViewMode::Track,
            ViewMode::Track => ViewMode::Dial,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Dial => "dial",
            ViewMode::Track => "track",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dial" => Some(ViewMode::Dial),
            // the track view was once called "monolith"
            "track" | "monolith" | "slider" => Some(ViewMode::Track),
            _ => None,
        }
    }
}

/// Single source of truth for the current intensity and view mode.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    intensity: Intensity,
    mode: ViewMode,
}

impl AppState {
    pub fn new(intensity: Intensity, mode: ViewMode) -> Self {
        Self { intensity, mode }
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub(crate) fn set_intensity(&mut self, value: Intensity) {
        self.intensity = value;
    }

    /// Switching mode never resets the intensity.
    pub(crate) fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }
}
