mod audio;
mod executor;
mod feedback;
mod sim;

use executor::FrameExecutor;
use feedback::NativeFeedback;
use glam::Vec2;
use instant::Instant;
use intensity_core::{
    key_action, split_pairs, ControlConfig, ControlSurface, GestureState, HardwareAdapter,
    Intensity, KeyAction, PollSchedule, PointerId, PulseIndicator, SurfaceBounds, TickFeedback,
};
use sim::{SimSettings, SimulatedActuator};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use winit::dpi::PhysicalSize;
use winit::event::*;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

const MOUSE_POINTER: PointerId = 0;
const FRAME: Duration = Duration::from_millis(16);

fn surface_bounds(size: PhysicalSize<u32>) -> SurfaceBounds {
    SurfaceBounds::new(0.0, 0.0, size.width as f32, size.height as f32)
}

/// DOM-style key name so the shared shortcut table applies.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Named(named) => Some(match named {
            NamedKey::ArrowUp => "ArrowUp",
            NamedKey::ArrowDown => "ArrowDown",
            NamedKey::ArrowLeft => "ArrowLeft",
            NamedKey::ArrowRight => "ArrowRight",
            NamedKey::PageUp => "PageUp",
            NamedKey::PageDown => "PageDown",
            NamedKey::Home => "Home",
            NamedKey::End => "End",
            NamedKey::Tab => "Tab",
            _ => return None,
        }),
        Key::Character(s) => Some(s.as_str()),
        _ => None,
    }
}

struct App {
    window: Window,
    surface: ControlSurface,
    executor: Rc<FrameExecutor>,
    pulse: Rc<Cell<PulseIndicator>>,
    polls: PollSchedule,
    cursor: Vec2,
    title: String,
}

impl App {
    fn bounds(&self) -> SurfaceBounds {
        surface_bounds(self.window.inner_size())
    }

    fn pointer_down(&mut self, id: PointerId, pos: Vec2) {
        let mode = self.surface.state().mode();
        let bounds = self.bounds();
        self.surface.pointer_down(mode, id, pos, bounds);
    }

    fn pointer_move(&mut self, id: PointerId, pos: Vec2) {
        let size = self.window.inner_size();
        self.surface
            .pointer_move(id, pos, || surface_bounds(size));
    }

    /// Losing focus can swallow the release, so drop any session then.
    fn end_drag(&mut self) {
        let GestureState::Dragging(s) = *self.surface.gesture() else {
            return;
        };
        self.surface.pointer_up(s.pointer_id);
    }

    fn on_key(&mut self, key: &Key) {
        let Some(action) = key_name(key).and_then(key_action) else {
            return;
        };
        match action {
            KeyAction::Nudge(delta) => self.surface.nudge(delta),
            KeyAction::Jump(v) => self.surface.set_value(Intensity::new(v)),
            KeyAction::ToggleMode => self.surface.toggle_mode(),
            KeyAction::DeepScan => match pollster::block_on(self.surface.hardware().deep_scan()) {
                Ok(result) => log::info!("[hw] deep scan: {}", result),
                Err(e) => log::warn!("[hw] deep scan failed: {}", e),
            },
            KeyAction::DumpCharacteristics => {
                let hw = self.surface.hardware();
                let camera = hw.default_camera_id();
                match pollster::block_on(hw.dump_characteristics(&camera)) {
                    Ok(lines) => lines.iter().for_each(|l| log::info!("[hw] {}", l)),
                    Err(e) => log::warn!("[hw] dump of camera {} failed: {}", camera, e),
                }
            }
        }
    }

    /// Run async completions, the telemetry timer and the title refresh.
    fn tick(&mut self) {
        let now = Instant::now();
        if self.polls.take_due(now) {
            self.surface.hardware().poll_telemetry();
        }
        self.executor.poll_all();

        let title = self.title_text(now);
        if title != self.title {
            self.window.set_title(&title);
            self.title = title;
        }
    }

    fn title_text(&self, now: Instant) -> String {
        let state = self.surface.state();
        let view = self.surface.hardware().view();
        let mut status = view.status_text();
        if view.latest_is_stale() {
            status.push_str(" ...");
        }
        let torch = view
            .telemetry()
            .map(|t| t.torch_status.clone())
            .unwrap_or_default();
        let pulse = if self.pulse.get().is_active(now) { "*" } else { " " };
        format!(
            "{} Intensity {} [{}] | {} | {}",
            pulse,
            state.intensity(),
            state.mode().as_str(),
            status,
            torch
        )
    }
}

fn load_config() -> (ControlConfig, SimSettings) {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut sim = SimSettings::default();
    let pairs = sim.take_pairs(split_pairs(args.iter().map(String::as_str)));
    let mut config = ControlConfig::default();
    let errors = config.apply_pairs(pairs);
    if !errors.is_empty() {
        log::warn!("[config] {} override(s) ignored", errors.len());
    }
    (config, sim)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let (config, sim) = load_config();
    log::info!(
        "[config] thud={} sampling={:?} poll={:?} sim latency<={:?} fail={}",
        config.feedback.include_thud,
        config.sampling,
        config.telemetry_interval,
        sim.max_latency,
        sim.failure_rate
    );

    let executor = Rc::new(FrameExecutor::default());
    let pulse = Rc::new(Cell::new(PulseIndicator::default()));
    let adapter = HardwareAdapter::new(
        Rc::new(SimulatedActuator::new(sim)),
        executor.clone(),
        config.overrides.clone(),
    );
    let feedback = TickFeedback::new(
        config.feedback.clone(),
        Box::new(NativeFeedback::new(config.feedback.filter_cutoff_hz, pulse.clone())),
    );
    let polls = PollSchedule::new(config.telemetry_interval, Instant::now());
    let surface = ControlSurface::new(config, feedback, adapter);
    surface.hardware().initialize();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Intensity")
        .with_inner_size(PhysicalSize::new(480, 480))
        .build(&event_loop)?;

    let mut app = App {
        window,
        surface,
        executor,
        pulse,
        polls,
        cursor: Vec2::ZERO,
        title: String::new(),
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                app.cursor = Vec2::new(position.x as f32, position.y as f32);
                app.pointer_move(MOUSE_POINTER, app.cursor);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => app.pointer_down(MOUSE_POINTER, app.cursor),
                ElementState::Released => {
                    app.surface.pointer_up(MOUSE_POINTER);
                }
            },
            WindowEvent::Focused(false) => app.end_drag(),
            WindowEvent::Touch(touch) => {
                // touch ids start after the mouse pointer
                let id = (touch.id as PointerId).wrapping_add(1);
                let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                match touch.phase {
                    TouchPhase::Started => app.pointer_down(id, pos),
                    TouchPhase::Moved => app.pointer_move(id, pos),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        app.surface.pointer_up(id);
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                app.on_key(&event.logical_key);
            }
            _ => {}
        },
        Event::AboutToWait => {
            app.tick();
            elwt.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME));
        }
        _ => {}
    })?;
    Ok(())
}
