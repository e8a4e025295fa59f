//! Sample-accurate rendering of a [`ClickCue`] for hosts without an audio graph.
//!
//! Each triggered cue becomes a set of voices that are summed into a single
//! low-pass biquad, mirroring the WebAudio graph the web front-end builds.

use crate::constants::ENCLOSURE_Q;
use crate::feedback::{ClickCue, ToneLayer, Waveform};
use std::f32::consts::{PI, TAU};

#[inline]
pub fn render_wave_sample(phase: f32, wave: Waveform) -> f32 {
    // phase in [0, 1)
    match wave {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

#[derive(Clone, Debug)]
struct ToneVoice {
    layer: ToneLayer,
    phase: f32,
    elapsed_samples: u64,
}

/// RBJ cookbook low-pass, direct form I.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowpassBiquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl LowpassBiquad {
    pub fn new(sample_rate: f32, cutoff_hz: f32, q: f32) -> Self {
        let mut f = Self::default();
        f.set_cutoff(sample_rate, cutoff_hz, q);
        f
    }

    pub fn set_cutoff(&mut self, sample_rate: f32, cutoff_hz: f32, q: f32) {
        let nyquist = sample_rate * 0.5;
        let fc = cutoff_hz.clamp(10.0, nyquist * 0.99);
        let w0 = 2.0 * PI * fc / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q.max(1e-3));
        let a0 = 1.0 + alpha;
        self.b0 = (1.0 - cos_w0) * 0.5 / a0;
        self.b1 = (1.0 - cos_w0) / a0;
        self.b2 = self.b0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Polyphonic click renderer with one shared enclosure filter.
pub struct ClickSynth {
    sample_rate: f32,
    cutoff_hz: f32,
    voices: Vec<ToneVoice>,
    filter: LowpassBiquad,
}

impl ClickSynth {
    pub fn new(sample_rate: f32, cutoff_hz: f32) -> Self {
        Self {
            sample_rate,
            cutoff_hz,
            voices: Vec::new(),
            filter: LowpassBiquad::new(sample_rate, cutoff_hz, ENCLOSURE_Q),
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Start every layer of `cue` at the next sample.
    pub fn trigger(&mut self, cue: &ClickCue) {
        if (cue.filter_cutoff_hz - self.cutoff_hz).abs() > f32::EPSILON {
            self.cutoff_hz = cue.filter_cutoff_hz;
            self.filter
                .set_cutoff(self.sample_rate, self.cutoff_hz, ENCLOSURE_Q);
        }
        for layer in &cue.layers {
            self.voices.push(ToneVoice {
                layer: layer.clone(),
                phase: 0.0,
                elapsed_samples: 0,
            });
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sr = self.sample_rate as f64;
        let mut mix = 0.0f32;
        let mut i = 0usize;
        while i < self.voices.len() {
            let v = &mut self.voices[i];
            let t = v.elapsed_samples as f64 / sr;
            if t >= v.layer.duration_sec {
                self.voices.swap_remove(i);
                continue;
            }
            mix += render_wave_sample(v.phase, v.layer.waveform) * v.layer.gain_at(t);
            v.phase += v.layer.frequency_at(t) / self.sample_rate;
            v.phase -= v.phase.floor();
            v.elapsed_samples += 1;
            i += 1;
        }
        self.filter.process(mix).clamp(-1.0, 1.0)
    }

    /// Fill a mono buffer.
    pub fn render(&mut self, out: &mut [f32]) {
        for s in out.iter_mut() {
            *s = self.next_sample();
        }
    }
}
