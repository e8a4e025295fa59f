// Host-side tests for the gesture session controller, including the
// end-to-end drag scenarios across mapper, feedback and dispatch.

mod common;

use common::*;
use intensity_core::*;

const POINTER: PointerId = 1;

fn track_bounds() -> SurfaceBounds {
    SurfaceBounds::new(0.0, 100.0, 80.0, 400.0)
}

#[test]
fn tap_at_zero_dispatches_and_ticks_once() {
    let mut h = harness(ControlConfig::default());
    let b = dial_bounds();
    assert!(h.surface.pointer_down(ViewMode::Dial, POINTER, dial_point_for(&b, 0), b));
    assert!(h.surface.is_dragging());
    assert_eq!(h.surface.state().intensity(), Intensity::MIN);

    let script = h.bridge.0.borrow();
    let cmds = &script.commands;
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].intensity, 0.0);
    assert_eq!(cmds[0].camera_id, "0");
    assert_eq!(cmds[0].use_pwm, None);
    assert_eq!(h.feedback.0.borrow().clicks.len(), 1);
    assert_eq!(h.surface.feedback().tick_state().last_fired(), Some(0));
}

#[test]
fn full_sweep_fires_one_tick_per_floor() {
    let mut h = harness(ControlConfig::default());
    let b = dial_bounds();
    h.surface
        .pointer_down(ViewMode::Dial, POINTER, dial_point_for(&b, 0), b);
    let after_acquire = h.surface.feedback().fired_count();

    for pct in 0..=100u8 {
        let v = h
            .surface
            .pointer_move(POINTER, dial_point_for(&b, pct), || unreachable!());
        assert_eq!(v, Some(Intensity::new(pct)));
    }
    assert_eq!(h.surface.feedback().fired_count() - after_acquire, 100);

    h.spawner.run_all();
    let script = h.bridge.0.borrow();
    let cmds = &script.commands;
    assert_eq!(cmds.len(), 102);
    assert_eq!(cmds.last().map(|c| c.intensity), Some(1.0));
    let view = h.surface.hardware().view();
    assert_eq!(view.latest().map(|o| o.value), Some(Intensity::MAX));
    assert!(!view.latest_is_stale());
}

#[test]
fn release_outside_surface_ends_session() {
    let mut h = harness(ControlConfig::default());
    let b = dial_bounds();
    h.surface
        .pointer_down(ViewMode::Dial, POINTER, dial_point_for(&b, 30), b);
    // drag far outside the dial; mapping still follows the angle
    let outside = point_at_angle(&b, 270.0, 5000.0);
    assert_eq!(
        h.surface.pointer_move(POINTER, outside, SurfaceBounds::default),
        Some(Intensity::new(50))
    );
    assert!(h.surface.pointer_up(POINTER));
    assert_eq!(*h.surface.gesture(), GestureState::Idle);
    // moves after release are ignored
    assert_eq!(
        h.surface
            .pointer_move(POINTER, dial_point_for(&b, 90), SurfaceBounds::default),
        None
    );
    assert_eq!(h.surface.state().intensity(), Intensity::new(50));
}

#[test]
fn second_pointer_ignored_until_first_releases() {
    let mut h = harness(ControlConfig::default());
    let b = dial_bounds();
    assert!(h.surface.pointer_down(ViewMode::Dial, 1, dial_point_for(&b, 10), b));
    assert!(!h.surface.pointer_down(ViewMode::Dial, 2, dial_point_for(&b, 80), b));
    assert_eq!(h.surface.pointer_move(2, dial_point_for(&b, 70), || b), None);
    assert!(!h.surface.pointer_up(2));
    assert_eq!(h.surface.state().intensity(), Intensity::new(10));

    assert!(h.surface.pointer_up(1));
    assert!(h.surface.pointer_down(ViewMode::Dial, 2, dial_point_for(&b, 80), b));
    assert_eq!(h.surface.state().intensity(), Intensity::new(80));
}

#[test]
fn inactive_surface_does_not_acquire() {
    let mut h = harness(ControlConfig::default());
    let t = track_bounds();
    assert!(!h
        .surface
        .pointer_down(ViewMode::Track, POINTER, glam::Vec2::new(40.0, 100.0), t));
    assert!(!h.surface.is_dragging());
    assert!(h.bridge.0.borrow().commands.is_empty());
}

#[test]
fn track_drag_maps_inverted_axis() {
    let mut h = harness(ControlConfig::default());
    h.surface.set_mode(ViewMode::Track);
    let t = track_bounds();
    assert!(h
        .surface
        .pointer_down(ViewMode::Track, POINTER, glam::Vec2::new(40.0, 100.0), t));
    assert_eq!(h.surface.state().intensity(), Intensity::MAX);
    let v = h
        .surface
        .pointer_move(POINTER, glam::Vec2::new(40.0, 400.0), || t);
    assert_eq!(v, Some(Intensity::new(25)));
    let v = h
        .surface
        .pointer_move(POINTER, glam::Vec2::new(40.0, 900.0), || t);
    assert_eq!(v, Some(Intensity::MIN));
}

#[test]
fn track_drag_keeps_tracking_beyond_surface_until_release() {
    let mut h = harness(ControlConfig::default());
    h.surface.set_mode(ViewMode::Track);
    let t = track_bounds();
    h.surface
        .pointer_down(ViewMode::Track, POINTER, glam::Vec2::new(40.0, 250.0), t);
    // pointer leaves the surface above and to the side; the session holds
    let v = h
        .surface
        .pointer_move(POINTER, glam::Vec2::new(-300.0, -50.0), || t);
    assert_eq!(v, Some(Intensity::MAX));
    assert!(matches!(h.surface.gesture(), GestureState::Dragging(_)));
    let v = h
        .surface
        .pointer_move(POINTER, glam::Vec2::new(500.0, 900.0), || t);
    assert_eq!(v, Some(Intensity::MIN));

    assert!(h.surface.pointer_up(POINTER));
    assert_eq!(
        h.surface
            .pointer_move(POINTER, glam::Vec2::new(40.0, 100.0), || t),
        None
    );
    assert_eq!(h.surface.state().intensity(), Intensity::MIN);
}

#[test]
fn cached_bounds_ignore_resize_mid_drag() {
    let mut h = harness(ControlConfig::default());
    h.surface.set_mode(ViewMode::Track);
    let t = track_bounds();
    h.surface
        .pointer_down(ViewMode::Track, POINTER, glam::Vec2::new(0.0, 300.0), t);
    let grown = SurfaceBounds::new(0.0, 100.0, 80.0, 800.0);
    let v = h
        .surface
        .pointer_move(POINTER, glam::Vec2::new(0.0, 300.0), || grown);
    assert_eq!(v, Some(Intensity::new(50)));
}

#[test]
fn resampled_bounds_follow_resize_mid_drag() {
    let config = ControlConfig {
        sampling: GeometrySampling::ResampleOnMove,
        ..ControlConfig::default()
    };
    let mut h = harness(config);
    h.surface.set_mode(ViewMode::Track);
    let t = track_bounds();
    h.surface
        .pointer_down(ViewMode::Track, POINTER, glam::Vec2::new(0.0, 300.0), t);
    let grown = SurfaceBounds::new(0.0, 100.0, 80.0, 800.0);
    let v = h
        .surface
        .pointer_move(POINTER, glam::Vec2::new(0.0, 300.0), || grown);
    assert_eq!(v, Some(Intensity::new(75)));
}

#[test]
fn mode_switch_keeps_value_and_ends_drag() {
    let mut h = harness(ControlConfig::default());
    let b = dial_bounds();
    h.surface
        .pointer_down(ViewMode::Dial, POINTER, dial_point_for(&b, 64), b);
    h.surface.toggle_mode();
    assert_eq!(h.surface.state().mode(), ViewMode::Track);
    assert_eq!(h.surface.state().intensity(), Intensity::new(64));
    assert!(!h.surface.is_dragging());
    assert_eq!(h.surface.pointer_move(POINTER, dial_point_for(&b, 10), || b), None);
}

#[test]
fn nudges_use_the_same_write_path() {
    let mut h = harness(ControlConfig::default());
    h.surface.set_value(Intensity::new(99));
    h.surface.nudge(5);
    h.surface.nudge(5);
    assert_eq!(h.surface.state().intensity(), Intensity::MAX);
    // 99 then 100 fire; the repeated 100 does not
    assert_eq!(h.surface.feedback().fired_count(), 2);
    // every write still dispatches
    assert_eq!(h.bridge.0.borrow().commands.len(), 3);
}

#[test]
fn per_command_overrides_reach_the_bridge() {
    let config = ControlConfig {
        overrides: CommandOverrides {
            use_pwm: Some(true),
            ..CommandOverrides::default()
        },
        ..ControlConfig::default()
    };
    let mut h = harness(config);
    h.surface.set_value_with(
        Intensity::new(40),
        &CommandOverrides {
            camera_id: Some("2".into()),
            burst: Some(true),
            ..CommandOverrides::default()
        },
    );
    let script = h.bridge.0.borrow();
    let cmds = &script.commands;
    assert_eq!(cmds[0].camera_id, "2");
    assert_eq!(cmds[0].burst, Some(true));
    assert_eq!(cmds[0].use_pwm, Some(true));
    assert_eq!(cmds[0].force_level, None);
}
