//! Tick detection and the multi-channel feedback cue.
//!
//! A tick fires when the integer floor of the intensity differs from the last
//! floor that already fired. Each tick drives three channels through a
//! [`FeedbackSink`]: a light haptic pulse, a two-layer click cue and a short
//! visual pulse. Hosts own the actual output devices.

use crate::constants::*;
use crate::state::Intensity;
use instant::Instant;
use smallvec::SmallVec;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Saw,
    Triangle,
}

/// One enveloped tone generator of the click cue.
///
/// Frequency and gain start at their initial values and ramp exponentially to
/// their targets over the given spans, then hold until the layer stops.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneLayer {
    pub waveform: Waveform,
    pub start_hz: f32,
    /// Exponential sweep target and its duration; `None` holds `start_hz`.
    pub sweep: Option<(f32, f64)>,
    pub gain: f32,
    pub gain_floor: f32,
    pub decay_sec: f64,
    pub duration_sec: f64,
}

impl ToneLayer {
    /// The "snap": a fast triangle sweep modelling the trigger mechanism.
    pub fn snap() -> Self {
        Self {
            waveform: Waveform::Triangle,
            start_hz: SNAP_START_HZ,
            sweep: Some((SNAP_END_HZ, SNAP_SWEEP_SEC)),
            gain: SNAP_GAIN,
            gain_floor: ENVELOPE_FLOOR,
            decay_sec: SNAP_SWEEP_SEC,
            duration_sec: SNAP_DURATION_SEC,
        }
    }

    /// The "thud": a fixed sub-bass square modelling gear weight.
    pub fn thud() -> Self {
        Self {
            waveform: Waveform::Square,
            start_hz: THUD_HZ,
            sweep: None,
            gain: THUD_GAIN,
            gain_floor: ENVELOPE_FLOOR,
            decay_sec: THUD_DECAY_SEC,
            duration_sec: THUD_DURATION_SEC,
        }
    }

    /// Instantaneous frequency `t` seconds after the layer starts.
    pub fn frequency_at(&self, t: f64) -> f32 {
        match self.sweep {
            Some((end_hz, span)) => exp_ramp(self.start_hz, end_hz, t, span),
            None => self.start_hz,
        }
    }

    /// Instantaneous envelope gain `t` seconds after the layer starts; zero
    /// once the layer has stopped.
    pub fn gain_at(&self, t: f64) -> f32 {
        if t < 0.0 || t >= self.duration_sec {
            return 0.0;
        }
        exp_ramp(self.gain, self.gain_floor, t, self.decay_sec)
    }
}

#[inline]
fn exp_ramp(from: f32, to: f32, t: f64, span: f64) -> f32 {
    if span <= 0.0 || t >= span {
        return to;
    }
    let ratio = (to / from) as f64;
    (from as f64 * ratio.powf(t / span)) as f32
}

/// Strength requested from the haptic actuator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HapticStrength {
    #[default]
    Light,
    Medium,
    Heavy,
}

impl HapticStrength {
    /// Capacitor Haptics `ImpactStyle` name.
    pub fn style_name(self) -> &'static str {
        match self {
            HapticStrength::Light => "LIGHT",
            HapticStrength::Medium => "MEDIUM",
            HapticStrength::Heavy => "HEAVY",
        }
    }

    /// Fallback vibration length for hosts with only a buzzer.
    pub fn vibrate_ms(self) -> u32 {
        match self {
            HapticStrength::Light => HAPTIC_LIGHT_MS,
            HapticStrength::Medium => HAPTIC_LIGHT_MS * 2,
            HapticStrength::Heavy => HAPTIC_LIGHT_MS * 4,
        }
    }
}

/// Layers summed through one shared low-pass "enclosure" filter.
#[derive(Clone, Debug, PartialEq)]
pub struct ClickCue {
    pub layers: SmallVec<[ToneLayer; 2]>,
    pub filter_cutoff_hz: f32,
}

impl ClickCue {
    /// Time until the last layer stops.
    pub fn duration_sec(&self) -> f64 {
        self.layers
            .iter()
            .map(|l| l.duration_sec)
            .fold(0.0, f64::max)
    }
}

/// Tunable description of what one tick feels, sounds and looks like.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackProfile {
    pub include_thud: bool,
    pub filter_cutoff_hz: f32,
    pub haptic: HapticStrength,
    pub pulse_hold: Duration,
}

impl Default for FeedbackProfile {
    fn default() -> Self {
        Self {
            include_thud: true,
            filter_cutoff_hz: ENCLOSURE_CUTOFF_HZ,
            haptic: HapticStrength::Light,
            pulse_hold: Duration::from_millis(PULSE_HOLD_MS),
        }
    }
}

impl FeedbackProfile {
    pub fn click_cue(&self) -> ClickCue {
        let mut layers = SmallVec::new();
        layers.push(ToneLayer::snap());
        if self.include_thud {
            layers.push(ToneLayer::thud());
        }
        ClickCue {
            layers,
            filter_cutoff_hz: self.filter_cutoff_hz,
        }
    }
}

/// Output channels for a tick. Every call is fire-and-forget.
pub trait FeedbackSink {
    fn haptic_pulse(&mut self, strength: HapticStrength);
    /// Implementations acquire their audio device lazily on the first call.
    fn play_click(&mut self, cue: &ClickCue);
    /// Spike the indicator now and restore it after `hold`.
    fn visual_pulse(&mut self, hold: Duration);
}

/// Last integer floor for which feedback already fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickState {
    last_fired: Option<u8>,
}

impl TickState {
    pub fn last_fired(&self) -> Option<u8> {
        self.last_fired
    }

    /// Record `value` and report whether it crossed into a new floor.
    pub fn observe(&mut self, value: Intensity) -> bool {
        let floor = value.floor();
        if self.last_fired == Some(floor) {
            return false;
        }
        self.last_fired = Some(floor);
        true
    }
}

/// Debounced tick feedback driving a host sink.
pub struct TickFeedback {
    tick: TickState,
    profile: FeedbackProfile,
    cue: ClickCue,
    sink: Box<dyn FeedbackSink>,
    fired: u64,
}

impl TickFeedback {
    pub fn new(profile: FeedbackProfile, sink: Box<dyn FeedbackSink>) -> Self {
        let cue = profile.click_cue();
        Self {
            tick: TickState::default(),
            profile,
            cue,
            sink,
            fired: 0,
        }
    }

    pub fn tick_state(&self) -> TickState {
        self.tick
    }

    /// Total ticks fired since construction.
    pub fn fired_count(&self) -> u64 {
        self.fired
    }

    /// Called on every intensity write. Returns the floor if a tick fired.
    pub fn on_value(&mut self, value: Intensity) -> Option<u8> {
        if !self.tick.observe(value) {
            return None;
        }
        self.fired += 1;
        log::debug!("[tick] floor {}", value.floor());
        self.sink.haptic_pulse(self.profile.haptic);
        self.sink.play_click(&self.cue);
        self.sink.visual_pulse(self.profile.pulse_hold);
        Some(value.floor())
    }
}

/// Scale/opacity spike on a fixed indicator, active until a deadline.
///
/// A new trigger simply moves the deadline; the reset end-state is the same
/// whichever trigger it came from.
#[derive(Clone, Copy, Debug, Default)]
pub struct PulseIndicator {
    until: Option<Instant>,
}

impl PulseIndicator {
    pub fn trigger(&mut self, now: Instant, hold: Duration) {
        self.until = Some(now + hold);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|t| now < t)
    }

    /// `(scale, opacity)` to render at `now`.
    pub fn appearance(&self, now: Instant) -> (f32, f32) {
        if self.is_active(now) {
            (PULSE_SCALE, PULSE_OPACITY)
        } else {
            (IDLE_SCALE, IDLE_OPACITY)
        }
    }
}
