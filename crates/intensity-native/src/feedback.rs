use crate::audio::ClickOutput;
use instant::Instant;
use intensity_core::{ClickCue, FeedbackSink, HapticStrength, PulseIndicator};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Desktop sink: cpal click, logged haptics, pulse state read by the title bar.
pub struct NativeFeedback {
    cutoff_hz: f32,
    audio: Option<ClickOutput>,
    audio_failed: bool,
    pulse: Rc<Cell<PulseIndicator>>,
}

impl NativeFeedback {
    pub fn new(cutoff_hz: f32, pulse: Rc<Cell<PulseIndicator>>) -> Self {
        Self {
            cutoff_hz,
            audio: None,
            audio_failed: false,
            pulse,
        }
    }
}

impl FeedbackSink for NativeFeedback {
    fn haptic_pulse(&mut self, strength: HapticStrength) {
        // no vibration motor on desktop
        log::debug!("[tick] haptic {}", strength.style_name());
    }

    fn play_click(&mut self, cue: &ClickCue) {
        if self.audio.is_none() && !self.audio_failed {
            self.audio = ClickOutput::open(self.cutoff_hz);
            if self.audio.is_none() {
                log::warn!("[audio] no output device; clicks disabled");
                self.audio_failed = true;
            }
        }
        if let Some(out) = &self.audio {
            out.trigger(cue);
        }
    }

    fn visual_pulse(&mut self, hold: Duration) {
        let mut p = self.pulse.get();
        p.trigger(Instant::now(), hold);
        self.pulse.set(p);
    }
}
