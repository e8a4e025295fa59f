use intensity_core::{ClickCue, ToneLayer, Waveform};
use wasm_bindgen::JsValue;
use web_sys as web;

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> Result<web::GainNode, ()> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("[audio] {} GainNode error: {:?}", label, e);
            Err(())
        }
    }
}

#[inline]
fn oscillator_type(waveform: Waveform) -> web::OscillatorType {
    match waveform {
        Waveform::Sine => web::OscillatorType::Sine,
        Waveform::Square => web::OscillatorType::Square,
        Waveform::Saw => web::OscillatorType::Sawtooth,
        Waveform::Triangle => web::OscillatorType::Triangle,
    }
}

/// Lazily created audio output, exclusively owned by the tick feedback sink.
#[derive(Default)]
pub struct ClickAudio {
    ctx: Option<web::AudioContext>,
}

impl ClickAudio {
    /// Create the context on first use and resume it if the platform suspended it.
    fn context(&mut self) -> Option<&web::AudioContext> {
        if self.ctx.is_none() {
            match web::AudioContext::new() {
                Ok(ctx) => {
                    log::info!("[audio] context created ({} Hz)", ctx.sample_rate());
                    self.ctx = Some(ctx);
                }
                Err(e) => {
                    log::error!("[audio] AudioContext error: {:?}", e);
                    return None;
                }
            }
        }
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web::AudioContextState::Suspended {
            _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Layers -> per-layer gain -> shared low-pass -> destination.
    pub fn play(&mut self, cue: &ClickCue) {
        let Some(ctx) = self.context() else {
            return;
        };
        // every layer shares one start time
        let t = ctx.current_time();

        let filter = match web::BiquadFilterNode::new(ctx) {
            Ok(f) => f,
            Err(e) => {
                log::error!("[audio] BiquadFilterNode error: {:?}", e);
                return;
            }
        };
        filter.set_type(web::BiquadFilterType::Lowpass);
        _ = filter.frequency().set_value_at_time(cue.filter_cutoff_hz, t);
        if let Err(e) = filter.connect_with_audio_node(&ctx.destination()) {
            log::error!("[audio] connect error: {:?}", e);
            return;
        }

        for layer in &cue.layers {
            if let Err(e) = schedule_layer(ctx, layer, &filter, t) {
                log::warn!("[audio] layer {:?} skipped: {:?}", layer.waveform, e);
            }
        }
    }
}

fn schedule_layer(
    ctx: &web::AudioContext,
    layer: &ToneLayer,
    filter: &web::BiquadFilterNode,
    t: f64,
) -> Result<(), JsValue> {
    let osc = web::OscillatorNode::new(ctx)?;
    osc.set_type(oscillator_type(layer.waveform));
    osc.frequency().set_value_at_time(layer.start_hz, t)?;
    if let Some((end_hz, span)) = layer.sweep {
        osc.frequency()
            .exponential_ramp_to_value_at_time(end_hz, t + span)?;
    }

    let gain = create_gain(ctx, layer.gain, "layer")
        .map_err(|_| JsValue::from_str("gain node unavailable"))?;
    gain.gain().set_value_at_time(layer.gain, t)?;
    gain.gain()
        .exponential_ramp_to_value_at_time(layer.gain_floor, t + layer.decay_sec)?;

    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(filter)?;
    osc.start_with_when(t)?;
    osc.stop_with_when(t + layer.duration_sec)?;
    Ok(())
}
