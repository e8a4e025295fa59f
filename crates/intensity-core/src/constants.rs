// Shared tuning constants used by both web and native frontends.

// Intensity range
pub const INTENSITY_MAX: u8 = 100;
pub const LEVEL_STEP_COUNT: u8 = 5; // header indicator segments

// Dial geometry (screen angles, degrees, y axis pointing down)
pub const DIAL_ARC_SPAN_DEG: f32 = 300.0; // active arc
pub const DIAL_GAP_DEG: f32 = 360.0 - DIAL_ARC_SPAN_DEG; // dead gap at the bottom
pub const DIAL_ARC_OFFSET_DEG: f32 = 240.0; // rotates arc start (bottom-left) to 0

// Click cue: "snap" layer
pub const SNAP_START_HZ: f32 = 1500.0;
pub const SNAP_END_HZ: f32 = 100.0;
pub const SNAP_SWEEP_SEC: f64 = 0.010;
pub const SNAP_GAIN: f32 = 0.5;
pub const SNAP_DURATION_SEC: f64 = 0.020;

// Click cue: "thud" layer
pub const THUD_HZ: f32 = 60.0;
pub const THUD_GAIN: f32 = 0.4;
pub const THUD_DECAY_SEC: f64 = 0.040;
pub const THUD_DURATION_SEC: f64 = 0.060;

// Envelope floor; exponential ramps cannot reach zero
pub const ENVELOPE_FLOOR: f32 = 0.01;

// Shared enclosure filter
pub const ENCLOSURE_CUTOFF_HZ: f32 = 800.0;
pub const ENCLOSURE_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

// Visual pulse
pub const PULSE_HOLD_MS: u64 = 80;
pub const PULSE_SCALE: f32 = 2.0;
pub const PULSE_OPACITY: f32 = 1.0;
pub const IDLE_SCALE: f32 = 1.0;
pub const IDLE_OPACITY: f32 = 0.1;

// Haptics
pub const HAPTIC_LIGHT_MS: u32 = 10; // vibration length when only a buzzer is available

// Actuator bridge
pub const DEFAULT_CAMERA_ID: &str = "0";
pub const TELEMETRY_POLL_MS: u64 = 2000;
