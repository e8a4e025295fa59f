// Host-side tests for tick debouncing, the click cue description, the visual
// pulse state and the sample-level click synthesizer.

mod common;

use common::*;
use instant::Instant;
use intensity_core::*;
use std::time::Duration;

fn engine(profile: FeedbackProfile) -> (TickFeedback, RecordingSink) {
    let sink = RecordingSink::default();
    (TickFeedback::new(profile, Box::new(sink.clone())), sink)
}

#[test]
fn same_floor_fires_once() {
    let (mut fb, sink) = engine(FeedbackProfile::default());
    assert_eq!(fb.on_value(Intensity::new(10)), Some(10));
    assert_eq!(fb.on_value(Intensity::new(10)), None);
    assert_eq!(fb.on_value(Intensity::new(10)), None);
    assert_eq!(fb.fired_count(), 1);
    let log = sink.0.borrow();
    assert_eq!(log.haptics.len(), 1);
    assert_eq!(log.clicks.len(), 1);
    assert_eq!(log.pulses.len(), 1);
}

#[test]
fn crossing_away_and_back_fires_twice() {
    let (mut fb, sink) = engine(FeedbackProfile::default());
    fb.on_value(Intensity::new(10));
    assert_eq!(fb.on_value(Intensity::new(11)), Some(11));
    assert_eq!(fb.on_value(Intensity::new(10)), Some(10));
    assert_eq!(fb.fired_count(), 3);
    assert_eq!(sink.0.borrow().clicks.len(), 3);
    assert_eq!(fb.tick_state().last_fired(), Some(10));
}

#[test]
fn first_write_of_zero_fires() {
    let (mut fb, _sink) = engine(FeedbackProfile::default());
    assert_eq!(fb.tick_state().last_fired(), None);
    assert_eq!(fb.on_value(Intensity::MIN), Some(0));
}

#[test]
fn channels_carry_profile_settings() {
    let profile = FeedbackProfile {
        haptic: HapticStrength::Heavy,
        pulse_hold: Duration::from_millis(120),
        ..FeedbackProfile::default()
    };
    let (mut fb, sink) = engine(profile);
    fb.on_value(Intensity::new(3));
    let log = sink.0.borrow();
    assert_eq!(log.haptics[0], HapticStrength::Heavy);
    assert_eq!(log.pulses[0], Duration::from_millis(120));
    assert_eq!(log.clicks[0].filter_cutoff_hz, 800.0);
}

#[test]
fn default_cue_has_snap_and_thud() {
    let cue = FeedbackProfile::default().click_cue();
    assert_eq!(cue.layers.len(), 2);
    let snap = &cue.layers[0];
    assert_eq!(snap.waveform, Waveform::Triangle);
    assert_eq!(snap.start_hz, 1500.0);
    assert_eq!(snap.sweep, Some((100.0, 0.010)));
    assert_eq!(snap.gain, 0.5);
    assert_eq!(snap.duration_sec, 0.020);
    let thud = &cue.layers[1];
    assert_eq!(thud.waveform, Waveform::Square);
    assert_eq!(thud.start_hz, 60.0);
    assert_eq!(thud.sweep, None);
    assert_eq!(thud.gain, 0.4);
    assert_eq!(thud.duration_sec, 0.060);
    assert_eq!(cue.duration_sec(), 0.060);
}

#[test]
fn thud_can_be_omitted() {
    let profile = FeedbackProfile {
        include_thud: false,
        ..FeedbackProfile::default()
    };
    let cue = profile.click_cue();
    assert_eq!(cue.layers.len(), 1);
    assert_eq!(cue.layers[0].waveform, Waveform::Triangle);
    assert_eq!(cue.duration_sec(), 0.020);
}

#[test]
fn snap_envelope_and_sweep_decay_exponentially() {
    let snap = ToneLayer::snap();
    assert!((snap.frequency_at(0.0) - 1500.0).abs() < 1e-3);
    assert!((snap.frequency_at(0.010) - 100.0).abs() < 1e-3);
    assert!((snap.frequency_at(0.015) - 100.0).abs() < 1e-3);
    // geometric midpoint halfway through the sweep
    let mid = snap.frequency_at(0.005);
    assert!((mid - (1500.0f32 * 100.0).sqrt()).abs() < 0.5, "mid {mid}");
    assert!((snap.gain_at(0.0) - 0.5).abs() < 1e-6);
    assert!((snap.gain_at(0.010) - 0.01).abs() < 1e-6);
    assert_eq!(snap.gain_at(0.020), 0.0);
    assert_eq!(snap.gain_at(-0.001), 0.0);
}

#[test]
fn pulse_indicator_last_trigger_wins() {
    let t0 = Instant::now();
    let hold = Duration::from_millis(80);
    let mut p = PulseIndicator::default();
    assert!(!p.is_active(t0));
    assert_eq!(p.appearance(t0), (1.0, 0.1));
    p.trigger(t0, hold);
    assert!(p.is_active(t0 + Duration::from_millis(79)));
    assert_eq!(p.appearance(t0), (2.0, 1.0));
    // a second tick before reset extends the spike
    p.trigger(t0 + Duration::from_millis(50), hold);
    assert!(p.is_active(t0 + Duration::from_millis(100)));
    assert!(!p.is_active(t0 + Duration::from_millis(130)));
}

#[test]
fn synth_renders_audible_click_then_silence() {
    let sr = 48_000.0;
    let mut synth = ClickSynth::new(sr, 800.0);
    synth.trigger(&FeedbackProfile::default().click_cue());
    assert_eq!(synth.active_voices(), 2);

    let mut buf = vec![0.0f32; (sr * 0.060) as usize];
    synth.render(&mut buf);
    assert!(buf.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    let peak = buf.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(peak > 0.01, "click too quiet: {peak}");

    // both layers have stopped; filter tail dies out
    let mut tail = vec![0.0f32; (sr * 0.050) as usize];
    synth.render(&mut tail);
    assert_eq!(synth.active_voices(), 0);
    let end = tail[tail.len() - 1].abs();
    assert!(end < 1e-3, "tail did not decay: {end}");
}

#[test]
fn snap_only_click_is_shorter() {
    let sr = 44_100.0;
    let profile = FeedbackProfile {
        include_thud: false,
        ..FeedbackProfile::default()
    };
    let mut synth = ClickSynth::new(sr, 800.0);
    synth.trigger(&profile.click_cue());
    let mut buf = vec![0.0f32; (sr * 0.025) as usize];
    synth.render(&mut buf);
    assert_eq!(synth.active_voices(), 0);
}

#[test]
fn lowpass_passes_dc_and_attenuates_nyquist() {
    let mut f = LowpassBiquad::new(48_000.0, 800.0, std::f32::consts::FRAC_1_SQRT_2);
    let mut y = 0.0;
    for _ in 0..4800 {
        y = f.process(1.0);
    }
    assert!((y - 1.0).abs() < 1e-3, "dc gain {y}");

    let mut g = LowpassBiquad::new(48_000.0, 800.0, std::f32::consts::FRAC_1_SQRT_2);
    let mut peak = 0.0f32;
    for i in 0..4800 {
        let x = if i % 2 == 0 { 1.0 } else { -1.0 };
        let out = g.process(x);
        if i > 480 {
            peak = peak.max(out.abs());
        }
    }
    assert!(peak < 0.01, "nyquist leak {peak}");
}

#[test]
fn wave_shapes_stay_in_range() {
    for wave in [Waveform::Sine, Waveform::Square, Waveform::Saw, Waveform::Triangle] {
        for i in 0..100 {
            let s = render_wave_sample(i as f32 / 100.0, wave);
            assert!((-1.0..=1.0).contains(&s), "{wave:?} out of range: {s}");
        }
    }
    assert_eq!(render_wave_sample(0.5, Waveform::Triangle), 1.0);
    assert_eq!(render_wave_sample(0.0, Waveform::Triangle), -1.0);
}
