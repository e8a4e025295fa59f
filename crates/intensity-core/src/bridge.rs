//! Client-side contract of the external hardware actuator.
//!
//! The actuator is opaque: every operation is a single-shot asynchronous call
//! that either resolves with a payload or fails with a message. Futures are
//! `'static` and not `Send` so web promises can be awaited directly.

use crate::constants::DEFAULT_CAMERA_ID;
use crate::state::Intensity;
use std::future::Future;
use std::pin::Pin;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("actuator bridge unavailable")]
    Unavailable,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("{0}")]
    Rejected(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

pub type BridgeFuture<T> = Pin<Box<dyn Future<Output = Result<T, BridgeError>>>>;

/// Optional per-command fields layered on top of the intensity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOverrides {
    pub camera_id: Option<String>,
    pub force_level: Option<u32>,
    pub burst: Option<bool>,
    pub use_pwm: Option<bool>,
}

impl CommandOverrides {
    /// Fields set in `self` win over `base`.
    pub fn merged_over(&self, base: &CommandOverrides) -> CommandOverrides {
        CommandOverrides {
            camera_id: self.camera_id.clone().or_else(|| base.camera_id.clone()),
            force_level: self.force_level.or(base.force_level),
            burst: self.burst.or(base.burst),
            use_pwm: self.use_pwm.or(base.use_pwm),
        }
    }
}

/// One absolute intensity command. Built fresh per dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct HardwareCommand {
    /// Target level as a `0..=1` fraction.
    pub intensity: f64,
    pub camera_id: String,
    pub force_level: Option<u32>,
    pub burst: Option<bool>,
    pub use_pwm: Option<bool>,
}

impl HardwareCommand {
    pub fn new(value: Intensity, overrides: &CommandOverrides) -> Self {
        Self {
            intensity: value.fraction(),
            camera_id: overrides
                .camera_id
                .clone()
                .unwrap_or_else(|| DEFAULT_CAMERA_ID.to_string()),
            force_level: overrides.force_level,
            burst: overrides.burst,
            use_pwm: overrides.use_pwm,
        }
    }
}

/// Actuator acknowledgement of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandAck {
    pub status: String,
    /// Echoed target identifier.
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraInfo {
    pub id: String,
    pub has_flash: bool,
    pub max_level: u32,
}

/// Hardware descriptor returned by a telemetry poll.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HardwareTelemetry {
    pub manufacturer: String,
    pub model: String,
    pub cameras: Vec<CameraInfo>,
    pub torch_status: String,
    pub scan_result: Option<String>,
}

impl HardwareTelemetry {
    pub fn camera(&self, id: &str) -> Option<&CameraInfo> {
        self.cameras.iter().find(|c| c.id == id)
    }

    /// Short single-line summary for status displays.
    pub fn summary(&self) -> String {
        let cams = self
            .cameras
            .iter()
            .map(|c| format!("{}:m{}", c.id, c.max_level))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} {} [{}] {}",
            self.manufacturer, self.model, cams, self.torch_status
        )
    }
}

/// Operations consumed from the external actuator.
pub trait ActuatorBridge {
    fn set_intensity(&self, command: HardwareCommand) -> BridgeFuture<CommandAck>;
    fn request_permissions(&self) -> BridgeFuture<()>;
    fn get_hardware_info(&self) -> BridgeFuture<HardwareTelemetry>;
    fn deep_scan(&self) -> BridgeFuture<String>;
    fn dump_characteristics(&self, camera_id: &str) -> BridgeFuture<Vec<String>>;
}
