// DOM hooks the front-end binds to

pub const DIAL_ID: &str = "dial-outer";
pub const TRACK_ID: &str = "monolith-track";
pub const DIAL_VIEW_ID: &str = "dial-container";
pub const TRACK_VIEW_ID: &str = "monolith-container";
pub const BEAM_ID: &str = "monolith-beam";
pub const KNOB_ID: &str = "monolith-knob";
pub const ARC_FILL_ID: &str = "arc-fill";
pub const PULSE_NODE_ID: &str = "haptic-visualizer";
pub const STATUS_ID: &str = "hw-status";
pub const INFO_ID: &str = "hw-info";
pub const STEP_SELECTOR: &str = ".step[data-level]";
pub const MODE_BUTTON_SELECTOR: &str = "[data-mode]";

// dial artwork
pub const ARC_RADIUS_PX: f32 = 158.0;
pub const DIAL_CSS_ROTATION_DEG: f32 = 90.0; // CSS 0deg points up, screen angles start at +x

// Capacitor plugin names
pub const ACTUATOR_PLUGIN: &str = "IntensityControl";
pub const HAPTICS_PLUGIN: &str = "Haptics";
