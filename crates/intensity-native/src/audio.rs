// ---------------- Native audio (cpal) ----------------

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use intensity_core::{ClickCue, ClickSynth};
use std::sync::{Arc, Mutex};

/// Output stream fed by a shared click synthesizer.
pub struct ClickOutput {
    synth: Arc<Mutex<ClickSynth>>,
    _stream: cpal::Stream,
}

impl ClickOutput {
    /// Open the default output device. `None` when there is no usable device.
    pub fn open(cutoff_hz: f32) -> Option<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device()?;
        let config = device.default_output_config().ok()?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let synth = Arc::new(Mutex::new(ClickSynth::new(sample_rate, cutoff_hz)));

        let err_fn = |err| log::error!("[audio] stream error: {err}");
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), channels, Arc::clone(&synth), err_fn)
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), channels, Arc::clone(&synth), err_fn)
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), channels, Arc::clone(&synth), err_fn)
            }
            other => {
                log::warn!("[audio] unsupported sample format {:?}", other);
                return None;
            }
        }
        .ok()?;
        stream.play().ok()?;
        log::info!("[audio] output open ({} Hz, {} ch)", sample_rate, channels);
        Some(Self {
            synth,
            _stream: stream,
        })
    }

    pub fn trigger(&self, cue: &ClickCue) {
        if let Ok(mut synth) = self.synth.lock() {
            synth.trigger(cue);
        }
    }
}

// The click is mono; every channel of a frame gets the same sample.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    synth: Arc<Mutex<ClickSynth>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _| {
            let Ok(mut synth) = synth.lock() else {
                return;
            };
            for frame in data.chunks_mut(channels.max(1)) {
                let v = T::from_sample(synth.next_sample());
                for s in frame.iter_mut() {
                    *s = v;
                }
            }
        },
        err_fn,
        None,
    )
}
