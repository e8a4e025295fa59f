//! Hardware bridge adapter: fire-and-forget command dispatch plus telemetry.
//!
//! Every async boundary catches its own error and folds it into the shared
//! [`HardwareView`]; nothing propagates back to the caller except diagnostics.
//! Command completions may arrive in any order. The view stores whatever
//! resolved last, never whatever was dispatched last.

use crate::bridge::{
    ActuatorBridge, BridgeError, BridgeFuture, CommandAck, CommandOverrides, HardwareCommand,
    HardwareTelemetry,
};
use crate::state::Intensity;
use instant::Instant;
use std::cell::{Cell, Ref, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Host executor for detached single-threaded tasks.
pub trait Spawn {
    fn spawn(&self, task: LocalTask);
}

/// Result of one resolved command.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandOutcome {
    /// Dispatch sequence number, starting at 1.
    pub seq: u64,
    pub value: Intensity,
    pub result: Result<CommandAck, BridgeError>,
}

impl CommandOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Text for a status banner.
    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(ack) => format!("{} ({})", ack.status, ack.id),
            Err(e) => format!("Error: {e}"),
        }
    }
}

/// Read-only hardware status as seen by the UI.
#[derive(Clone, Debug, Default)]
pub struct HardwareView {
    latest: Option<CommandOutcome>,
    telemetry: Option<HardwareTelemetry>,
    init_error: Option<String>,
    last_dispatched: u64,
}

impl HardwareView {
    pub fn latest(&self) -> Option<&CommandOutcome> {
        self.latest.as_ref()
    }

    pub fn telemetry(&self) -> Option<&HardwareTelemetry> {
        self.telemetry.as_ref()
    }

    pub fn init_error(&self) -> Option<&str> {
        self.init_error.as_deref()
    }

    pub fn last_dispatched(&self) -> u64 {
        self.last_dispatched
    }

    /// True when the displayed outcome belongs to an older dispatch than the
    /// newest one sent.
    pub fn latest_is_stale(&self) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|o| o.seq < self.last_dispatched)
    }

    /// Banner text. An initialization failure stays visible after commands
    /// start resolving.
    pub fn status_text(&self) -> String {
        match (self.init_error.as_deref(), self.latest.as_ref()) {
            (Some(err), Some(outcome)) => format!("{} | {}", err, outcome.status_line()),
            (Some(err), None) => err.to_string(),
            (None, Some(outcome)) => outcome.status_line(),
            (None, None) => "Ready".to_string(),
        }
    }

    fn record(&mut self, outcome: CommandOutcome) {
        self.latest = Some(outcome);
    }
}

pub struct HardwareAdapter {
    bridge: Rc<dyn ActuatorBridge>,
    spawner: Rc<dyn Spawn>,
    view: Rc<RefCell<HardwareView>>,
    defaults: CommandOverrides,
    next_seq: Cell<u64>,
}

impl HardwareAdapter {
    pub fn new(
        bridge: Rc<dyn ActuatorBridge>,
        spawner: Rc<dyn Spawn>,
        defaults: CommandOverrides,
    ) -> Self {
        Self {
            bridge,
            spawner,
            view: Rc::new(RefCell::new(HardwareView::default())),
            defaults,
            next_seq: Cell::new(0),
        }
    }

    pub fn view(&self) -> Ref<'_, HardwareView> {
        self.view.borrow()
    }

    /// Send an absolute intensity command without waiting for it.
    ///
    /// Identical consecutive values are not collapsed. Returns the dispatch
    /// sequence number.
    pub fn dispatch(&self, value: Intensity, overrides: &CommandOverrides) -> u64 {
        let seq = self.next_seq.get() + 1;
        self.next_seq.set(seq);
        self.view.borrow_mut().last_dispatched = seq;

        let command = HardwareCommand::new(value, &overrides.merged_over(&self.defaults));
        log::debug!(
            "[hw] #{} set_intensity {:.2} cam={}",
            seq,
            command.intensity,
            command.camera_id
        );
        let pending = self.bridge.set_intensity(command);
        let view = self.view.clone();
        self.spawner.spawn(Box::pin(async move {
            let result = pending.await;
            if let Err(e) = &result {
                log::warn!("[hw] #{} command failed: {}", seq, e);
            }
            view.borrow_mut().record(CommandOutcome { seq, value, result });
        }));
        seq
    }

    /// Permission request followed by the first telemetry fetch.
    pub fn initialize(&self) {
        let bridge = self.bridge.clone();
        let view = self.view.clone();
        self.spawner.spawn(Box::pin(async move {
            if let Err(e) = bridge.request_permissions().await {
                log::warn!("[hw] permission request failed: {}", e);
                view.borrow_mut().init_error = Some(format!("Permission error: {e}"));
                return;
            }
            match bridge.get_hardware_info().await {
                Ok(t) => {
                    log::info!("[hw] connected: {}", t.summary());
                    let mut v = view.borrow_mut();
                    v.telemetry = Some(t);
                    v.init_error = None;
                }
                Err(e) => {
                    log::warn!("[hw] initial hardware info failed: {}", e);
                    view.borrow_mut().init_error = Some(format!("Init error: {e}"));
                }
            }
        }));
    }

    /// One telemetry refresh. Failures keep the previous snapshot.
    pub fn poll_telemetry(&self) {
        let pending = self.bridge.get_hardware_info();
        let view = self.view.clone();
        self.spawner.spawn(Box::pin(async move {
            match pending.await {
                Ok(t) => view.borrow_mut().telemetry = Some(t),
                Err(e) => log::debug!("[poll] telemetry refresh failed: {}", e),
            }
        }));
    }

    /// On-demand diagnostic scan; failure is reported only to the caller.
    pub fn deep_scan(&self) -> BridgeFuture<String> {
        self.bridge.deep_scan()
    }

    pub fn dump_characteristics(&self, camera_id: &str) -> BridgeFuture<Vec<String>> {
        self.bridge.dump_characteristics(camera_id)
    }

    /// Camera id commands go to when no override names one.
    pub fn default_camera_id(&self) -> String {
        HardwareCommand::new(Intensity::MIN, &self.defaults).camera_id
    }
}

/// Fixed-interval timer for hosts without `setInterval`.
#[derive(Clone, Copy, Debug)]
pub struct PollSchedule {
    interval: Duration,
    next_due: Instant,
}

impl PollSchedule {
    /// First poll is due one interval after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Returns true at most once per elapsed interval. Missed intervals are
    /// not replayed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}
