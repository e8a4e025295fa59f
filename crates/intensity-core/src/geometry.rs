//! Pure pointer-to-intensity mappers for the dial and the track.
//!
//! Coordinates are screen space (y grows downward), in whatever unit the host
//! reports for both the pointer and the surface bounds.

use crate::constants::{DIAL_ARC_OFFSET_DEG, DIAL_ARC_SPAN_DEG, INTENSITY_MAX};
use crate::state::Intensity;
use glam::Vec2;

/// Axis-aligned surface bounds as reported by the host (e.g. a DOM rect).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// Whether a drag keeps the bounds captured at acquire or re-reads them per move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeometrySampling {
    #[default]
    CacheAtAcquire,
    ResampleOnMove,
}

/// Angular layout of the dial: an active arc followed by a dead gap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DialArc {
    /// Width of the active arc in degrees.
    pub span_deg: f32,
    /// Added to the raw `atan2` angle so the arc start lands on 0.
    pub offset_deg: f32,
}

impl Default for DialArc {
    fn default() -> Self {
        Self {
            span_deg: DIAL_ARC_SPAN_DEG,
            offset_deg: DIAL_ARC_OFFSET_DEG,
        }
    }
}

impl DialArc {
    /// Build an arc of `span_deg` whose dead gap is centred at the bottom.
    pub fn centered_gap(span_deg: f32) -> Self {
        let span = span_deg.clamp(1.0, 360.0);
        let gap = 360.0 - span;
        // arc starts where the gap ends: 90 (straight down) + gap / 2
        let start = 90.0 + gap * 0.5;
        Self {
            span_deg: span,
            offset_deg: (360.0 - start).rem_euclid(360.0),
        }
    }

    /// Fixed midpoint of the dead gap. Angles below snap to max, above to 0.
    #[inline]
    pub fn snap_threshold_deg(&self) -> f32 {
        self.span_deg + (360.0 - self.span_deg) * 0.5
    }

    /// Pointer angle relative to the arc start, in `[0, 360)`.
    pub fn normalized_angle(&self, pointer: Vec2, center: Vec2) -> f32 {
        let d = pointer - center;
        let raw = d.y.atan2(d.x).to_degrees();
        (raw + self.offset_deg).rem_euclid(360.0)
    }

    /// Normalized angle clamped onto the active arc, snapping gap angles to
    /// whichever endpoint is angularly nearer.
    pub fn clamp_to_arc(&self, normalized: f32) -> f32 {
        if !normalized.is_finite() {
            return 0.0;
        }
        if normalized <= self.span_deg {
            normalized
        } else if normalized < self.snap_threshold_deg() {
            self.span_deg
        } else {
            0.0
        }
    }

    /// Screen angle (degrees) at which `value` sits on the arc.
    pub fn indicator_angle_deg(&self, value: Intensity) -> f32 {
        let along = value.get() as f32 / INTENSITY_MAX as f32 * self.span_deg;
        (along - self.offset_deg).rem_euclid(360.0)
    }
}

/// Map a pointer position on the dial to an intensity.
pub fn dial_value(pointer: Vec2, center: Vec2, arc: &DialArc) -> Intensity {
    let normalized = arc.normalized_angle(pointer, center);
    let clamped = arc.clamp_to_arc(normalized);
    Intensity::from_percent(clamped / arc.span_deg * INTENSITY_MAX as f32)
}

/// Map a pointer y on the track to an intensity. Top is 100, bottom is 0.
pub fn track_value(y: f32, top: f32, height: f32) -> Intensity {
    if !(height > 0.0) || !height.is_finite() {
        // collapsed track: treat anything above the top edge as full
        return if y < top { Intensity::MAX } else { Intensity::MIN };
    }
    let pct = 100.0 - (y - top) / height * 100.0;
    Intensity::from_percent(pct)
}
