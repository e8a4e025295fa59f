// Shared host-side doubles: a recording feedback sink, a queueing spawner and
// a scripted actuator bridge whose futures resolve when the test polls them.

#![allow(dead_code)]

use intensity_core::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::future::ready;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct FeedbackLog {
    pub haptics: Vec<HapticStrength>,
    pub clicks: Vec<ClickCue>,
    pub pulses: Vec<Duration>,
}

#[derive(Clone, Default)]
pub struct RecordingSink(pub Rc<RefCell<FeedbackLog>>);

impl FeedbackSink for RecordingSink {
    fn haptic_pulse(&mut self, strength: HapticStrength) {
        self.0.borrow_mut().haptics.push(strength);
    }
    fn play_click(&mut self, cue: &ClickCue) {
        self.0.borrow_mut().clicks.push(cue.clone());
    }
    fn visual_pulse(&mut self, hold: Duration) {
        self.0.borrow_mut().pulses.push(hold);
    }
}

/// Holds spawned tasks until the test decides when (and in which order) they run.
#[derive(Clone, Default)]
pub struct QueueSpawner(pub Rc<RefCell<Vec<LocalTask>>>);

impl Spawn for QueueSpawner {
    fn spawn(&self, task: LocalTask) {
        self.0.borrow_mut().push(task);
    }
}

impl QueueSpawner {
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn take(&self) -> Vec<LocalTask> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    /// Run everything queued so far, in spawn order.
    pub fn run_all(&self) {
        for task in self.take() {
            pollster::block_on(task);
        }
    }
}

#[derive(Default)]
pub struct BridgeScript {
    pub commands: Vec<HardwareCommand>,
    pub fail_commands: bool,
    pub deny_permissions: bool,
    pub info_responses: VecDeque<Result<HardwareTelemetry, BridgeError>>,
    pub info_calls: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedBridge(pub Rc<RefCell<BridgeScript>>);

impl ActuatorBridge for ScriptedBridge {
    fn set_intensity(&self, command: HardwareCommand) -> BridgeFuture<CommandAck> {
        let mut s = self.0.borrow_mut();
        let result = if s.fail_commands {
            Err(BridgeError::Rejected("torch busy".into()))
        } else {
            Ok(CommandAck {
                status: format!("ON {}", (command.intensity * 100.0).round() as u32),
                id: command.camera_id.clone(),
            })
        };
        s.commands.push(command);
        Box::pin(ready(result))
    }

    fn request_permissions(&self) -> BridgeFuture<()> {
        let result = if self.0.borrow().deny_permissions {
            Err(BridgeError::PermissionDenied("camera".into()))
        } else {
            Ok(())
        };
        Box::pin(ready(result))
    }

    fn get_hardware_info(&self) -> BridgeFuture<HardwareTelemetry> {
        let mut s = self.0.borrow_mut();
        s.info_calls += 1;
        let result = s
            .info_responses
            .pop_front()
            .unwrap_or(Err(BridgeError::Unavailable));
        Box::pin(ready(result))
    }

    fn deep_scan(&self) -> BridgeFuture<String> {
        Box::pin(ready(Ok("IDs: 0:m5, 1:m1".to_string())))
    }

    fn dump_characteristics(&self, camera_id: &str) -> BridgeFuture<Vec<String>> {
        let result = if camera_id == "0" {
            Ok(vec![
                "android.flash.info.available = true".to_string(),
                "android.flash.info.strengthMaximumLevel = 5".to_string(),
            ])
        } else {
            Err(BridgeError::Rejected(format!("no camera {camera_id}")))
        };
        Box::pin(ready(result))
    }
}

pub fn telemetry(model: &str, torch: &str) -> HardwareTelemetry {
    HardwareTelemetry {
        manufacturer: "Nothing".into(),
        model: model.into(),
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
        torch_status: torch.into(),
        scan_result: None,
    }
}

pub struct Harness {
    pub surface: ControlSurface,
    pub feedback: RecordingSink,
    pub spawner: QueueSpawner,
    pub bridge: ScriptedBridge,
}

pub fn harness(config: ControlConfig) -> Harness {
    let feedback = RecordingSink::default();
    let spawner = QueueSpawner::default();
    let bridge = ScriptedBridge::default();
    let adapter = HardwareAdapter::new(
        Rc::new(bridge.clone()),
        Rc::new(spawner.clone()),
        config.overrides.clone(),
    );
    let ticks = TickFeedback::new(config.feedback.clone(), Box::new(feedback.clone()));
    let surface = ControlSurface::new(config, ticks, adapter);
    Harness {
        surface,
        feedback,
        spawner,
        bridge,
    }
}

pub fn dial_bounds() -> SurfaceBounds {
    SurfaceBounds::new(0.0, 0.0, 200.0, 200.0)
}

/// Point at screen angle `deg` (y down), `radius` away from the bounds centre.
pub fn point_at_angle(bounds: &SurfaceBounds, deg: f32, radius: f32) -> glam::Vec2 {
    let rad = deg * PI / 180.0;
    bounds.center() + glam::Vec2::new(rad.cos(), rad.sin()) * radius
}

/// Pointer position that the default dial maps to `percent`.
pub fn dial_point_for(bounds: &SurfaceBounds, percent: u8) -> glam::Vec2 {
    let deg = DialArc::default().indicator_angle_deg(Intensity::new(percent));
    point_at_angle(bounds, deg, 80.0)
}
