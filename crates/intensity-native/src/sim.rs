//! In-process stand-in for the flash actuator.
//!
//! Answers every bridge call the way the device plugin does, with optional
//! random latency and failure so out-of-order completions and degraded mode
//! can be exercised from the desktop.

use intensity_core::{
    ActuatorBridge, BridgeError, BridgeFuture, CameraInfo, CommandAck, HardwareCommand,
    HardwareTelemetry,
};
use instant::Instant;
use rand::prelude::*;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct SimSettings {
    /// Upper bound of the per-call random latency.
    pub max_latency: Duration,
    /// Probability in `0..=1` that a command is rejected.
    pub failure_rate: f64,
    pub seed: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            max_latency: Duration::ZERO,
            failure_rate: 0.0,
            seed: 42,
        }
    }
}

impl SimSettings {
    /// Consume the `latency_ms`, `fail` and `seed` keys and return the pairs
    /// left for the shared config.
    pub fn take_pairs<'a>(&mut self, pairs: Vec<(&'a str, &'a str)>) -> Vec<(&'a str, &'a str)> {
        let mut rest = Vec::new();
        for (key, value) in pairs {
            let parsed = match key {
                "latency_ms" => value
                    .parse::<u64>()
                    .map(|ms| self.max_latency = Duration::from_millis(ms))
                    .is_ok(),
                "fail" => value
                    .parse::<f64>()
                    .map(|p| self.failure_rate = p.clamp(0.0, 1.0))
                    .is_ok(),
                "seed" => value.parse::<u64>().map(|s| self.seed = s).is_ok(),
                _ => {
                    rest.push((key, value));
                    continue;
                }
            };
            if !parsed {
                log::warn!("[config] invalid value `{}` for `{}`", value, key);
            }
        }
        rest
    }
}

/// Resolves once the deadline passes. Re-arms its own waker while pending so
/// both a poll-per-frame executor and `pollster` make progress.
struct Delay {
    until: Instant,
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if Instant::now() >= self.until {
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Device state mutated by commands; shared with in-flight futures.
struct Device {
    torch_on: Option<String>,
    /// Last deep-scan report, echoed by later telemetry.
    scan_result: Option<String>,
    rng: StdRng,
}

pub struct SimulatedActuator {
    settings: SimSettings,
    cameras: Vec<CameraInfo>,
    device: Rc<RefCell<Device>>,
}

impl SimulatedActuator {
    pub fn new(settings: SimSettings) -> Self {
        let rng = StdRng::seed_from_u64(settings.seed);
        Self {
            settings,
            cameras: vec![
                CameraInfo {
                    id: "0".into(),
                    has_flash: true,
                    max_level: 5,
                },
                CameraInfo {
                    id: "1".into(),
                    has_flash: false,
                    max_level: 0,
                },
            ],
            device: Rc::new(RefCell::new(Device {
                torch_on: None,
                scan_result: None,
                rng,
            })),
        }
    }

    fn latency(&self) -> Delay {
        let max = self.settings.max_latency.as_millis() as u64;
        let ms = if max == 0 {
            0
        } else {
            self.device.borrow_mut().rng.gen_range(0..=max)
        };
        Delay {
            until: Instant::now() + Duration::from_millis(ms),
        }
    }

    fn torch_status(device: &Device) -> String {
        match &device.torch_on {
            Some(id) => format!("ID:{} ON", id),
            None => "ID:0 OFF".to_string(),
        }
    }

    fn apply(device: &mut Device, camera: &CameraInfo, command: &HardwareCommand) -> String {
        let fraction = command.intensity.clamp(0.0, 1.0);
        let pwm = command.use_pwm.unwrap_or(false);
        if fraction > 0.0 && fraction < 1.0 && pwm {
            let pct = (fraction * 100.0) as u32;
            device.torch_on = Some(camera.id.clone());
            return format!("PWM ACTIVE ({}%)", pct);
        }
        if fraction <= 0.0 {
            device.torch_on = None;
            return "OFF".to_string();
        }
        device.torch_on = Some(camera.id.clone());
        let level = match command.force_level {
            Some(l) => l.min(camera.max_level.max(1)),
            None => ((fraction * camera.max_level as f64).ceil() as u32).max(1),
        };
        let burst = if command.burst.unwrap_or(false) { " BURST" } else { "" };
        format!("ON L{}/{}{}", level, camera.max_level.max(1), burst)
    }
}

impl ActuatorBridge for SimulatedActuator {
    fn set_intensity(&self, command: HardwareCommand) -> BridgeFuture<CommandAck> {
        let delay = self.latency();
        let device = self.device.clone();
        let camera = self.cameras.iter().find(|c| c.id == command.camera_id).cloned();
        let failure_rate = self.settings.failure_rate;
        Box::pin(async move {
            delay.await;
            let mut device = device.borrow_mut();
            if failure_rate > 0.0 && device.rng.gen_bool(failure_rate) {
                return Err(BridgeError::Rejected("simulated driver busy".into()));
            }
            let camera = match camera {
                Some(c) if c.has_flash => c,
                Some(c) => return Err(BridgeError::Rejected(format!("camera {} has no flash", c.id))),
                None => {
                    return Err(BridgeError::Rejected(format!(
                        "unknown camera {}",
                        command.camera_id
                    )))
                }
            };
            let status = Self::apply(&mut device, &camera, &command);
            Ok(CommandAck {
                status,
                id: camera.id,
            })
        })
    }

    fn request_permissions(&self) -> BridgeFuture<()> {
        let delay = self.latency();
        Box::pin(async move {
            delay.await;
            Ok(())
        })
    }

    fn get_hardware_info(&self) -> BridgeFuture<HardwareTelemetry> {
        let delay = self.latency();
        let device = self.device.clone();
        let cameras = self.cameras.clone();
        Box::pin(async move {
            delay.await;
            let device = device.borrow();
            Ok(HardwareTelemetry {
                manufacturer: "Simulated".into(),
                model: "Desktop Flash".into(),
                cameras,
                torch_status: Self::torch_status(&device),
                scan_result: device.scan_result.clone(),
            })
        })
    }

    fn deep_scan(&self) -> BridgeFuture<String> {
        let delay = self.latency();
        let ids = self
            .cameras
            .iter()
            .map(|c| format!("{}:m{}", c.id, c.max_level))
            .collect::<Vec<_>>()
            .join(", ");
        let device = self.device.clone();
        Box::pin(async move {
            delay.await;
            let result = format!("IDs: {}", ids);
            device.borrow_mut().scan_result = Some(result.clone());
            Ok(result)
        })
    }

    fn dump_characteristics(&self, camera_id: &str) -> BridgeFuture<Vec<String>> {
        let delay = self.latency();
        let camera = self.cameras.iter().find(|c| c.id == camera_id).cloned();
        let camera_id = camera_id.to_string();
        Box::pin(async move {
            delay.await;
            let camera =
                camera.ok_or_else(|| BridgeError::Rejected(format!("unknown camera {}", camera_id)))?;
            Ok(vec![
                format!("CAMERA {}", camera.id),
                format!("flash.info.available: {}", camera.has_flash),
                format!("flash.info.strengthMaximumLevel: {}", camera.max_level),
                format!("flash.info.strengthDefaultLevel: {}", camera.max_level.min(1)),
            ])
        })
    }
}
