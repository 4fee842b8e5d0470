//! Camera Tests - Damped Zoom, Floor Clamp and Orbit Composition
//!
//! Tests for the damped orbit camera driven through wheel input, with both a
//! stationary controls stub and the default spherical orbit controls.

use glam::{DVec2, DVec3};
use valley_engine::camera::{
    CameraLimits, DampedOrbitCamera, OrbitControls, SphericalOrbitControls, ZoomState, ZoomTick,
};
use valley_engine::input::{MouseButton, ScrollDelta, ZoomInput};

/// Controls stub that records how often it was driven.
#[derive(Default)]
struct CountingControls {
    updates: usize,
}

impl OrbitControls for CountingControls {
    fn update(&mut self, _position: &mut DVec3, _target: &mut DVec3, _dt: f64) {
        self.updates += 1;
    }
}

/// Controls stub that slides the whole rig sideways every frame.
struct Drift(DVec3);

impl OrbitControls for Drift {
    fn update(&mut self, position: &mut DVec3, target: &mut DVec3, _dt: f64) {
        *position += self.0;
        *target += self.0;
    }
}

fn scenario_limits() -> CameraLimits {
    CameraLimits {
        min_distance: 15.0,
        max_distance: 200.0,
        ..CameraLimits::default()
    }
}

/// Camera 30 units from the origin, above the floor.
fn scenario_camera() -> DampedOrbitCamera<CountingControls> {
    DampedOrbitCamera::new(
        DVec3::new(0.0, 18.0, 24.0),
        DVec3::ZERO,
        scenario_limits(),
        CountingControls::default(),
    )
    .unwrap()
}

fn goal(camera: &DampedOrbitCamera<impl OrbitControls>) -> f64 {
    match camera.zoom_state() {
        ZoomState::Targeting(goal) => goal,
        ZoomState::Idle => panic!("expected a pending zoom"),
    }
}

// ============================================================================
// Wheel Mapping
// ============================================================================

#[test]
fn test_wheel_delta_sign_mapping() {
    assert_eq!(ZoomInput::from_wheel_delta(100.0), ZoomInput::Out);
    assert_eq!(ZoomInput::from_wheel_delta(-3.0), ZoomInput::In);
    assert_eq!(ZoomInput::from_wheel_delta(0.0), ZoomInput::None);
    assert_eq!(ZoomInput::from_wheel_delta(f64::NAN), ZoomInput::None);
}

#[test]
fn test_scroll_up_zooms_in() {
    // Windowing systems report scrolling away from the user as positive y
    assert_eq!(ZoomInput::from_scroll(ScrollDelta::from_lines(0.0, 1.0)), ZoomInput::In);
    assert_eq!(ZoomInput::from_scroll(ScrollDelta::from_pixels(0.0, -120.0)), ZoomInput::Out);
}

// ============================================================================
// Zoom State Machine
// ============================================================================

#[test]
fn test_scenario_zoom_out_to_33() {
    let mut camera = scenario_camera();
    assert!((camera.distance() - 30.0).abs() < 1e-12);

    camera.on_zoom_input(ZoomInput::from_wheel_delta(100.0));
    assert!((goal(&camera) - 33.0).abs() < 1e-9);
}

#[test]
fn test_converges_within_200_ticks() {
    for input in [ZoomInput::In, ZoomInput::Out] {
        let mut camera = scenario_camera();
        camera.on_zoom_input(input);
        let target = goal(&camera);

        let ticks = (1..=200)
            .find(|_| camera.update(1.0 / 60.0) == ZoomTick::Converged)
            .expect("zoom should converge");

        assert!(ticks < 200);
        assert_eq!(camera.zoom_state(), ZoomState::Idle);
        assert!((camera.distance() - target).abs() < camera.limits().epsilon);
        assert_eq!(camera.update(1.0 / 60.0), ZoomTick::Idle);
    }
}

#[test]
fn test_target_always_within_limits() {
    let mut camera = scenario_camera();
    let limits = scenario_limits();
    let inputs = [ZoomInput::Out, ZoomInput::In, ZoomInput::None];

    for i in 0..300 {
        camera.on_zoom_input(inputs[i % 7 % 3]);
        if let ZoomState::Targeting(goal) = camera.zoom_state() {
            assert!((limits.min_distance..=limits.max_distance).contains(&goal));
        }
        // Long runs in one direction push against both limits
        for _ in 0..(i % 5) {
            camera.update(1.0 / 60.0);
        }
    }

    for _ in 0..100 {
        camera.on_zoom_input(ZoomInput::Out);
        camera.update(1.0 / 60.0);
    }
    camera.on_zoom_input(ZoomInput::Out);
    assert_eq!(goal(&camera), 200.0);
}

#[test]
fn test_controls_run_every_frame() {
    let mut camera = scenario_camera();
    for _ in 0..5 {
        camera.update(1.0 / 60.0);
    }
    camera.on_zoom_input(ZoomInput::In);
    for _ in 0..5 {
        camera.update(1.0 / 60.0);
    }
    assert_eq!(camera.controls().updates, 10);
}

#[test]
fn test_zoom_follows_panned_target() {
    let mut camera =
        DampedOrbitCamera::new(DVec3::new(0.0, 18.0, 24.0), DVec3::ZERO, scenario_limits(), Drift(DVec3::X))
            .unwrap();
    camera.on_zoom_input(ZoomInput::Out);

    for _ in 0..200 {
        if camera.update(1.0 / 60.0) == ZoomTick::Converged {
            break;
        }
    }

    // Distance is measured from wherever the controls moved the target
    assert!((camera.distance() - 33.0).abs() < 0.1);
    assert!(camera.target().x > 1.0);
}

// ============================================================================
// Floor Clamp
// ============================================================================

#[test]
fn test_position_never_below_floor() {
    let limits = CameraLimits {
        min_distance: 1.0,
        max_distance: 500.0,
        floor_height: 10.0,
        ..CameraLimits::default()
    };
    let mut camera =
        DampedOrbitCamera::new(DVec3::new(40.0, 11.0, 0.0), DVec3::ZERO, limits, CountingControls::default())
            .unwrap();

    for i in 0..400 {
        if i % 10 == 0 {
            camera.on_zoom_input(if i % 20 == 0 { ZoomInput::In } else { ZoomInput::Out });
        }
        camera.update(1.0 / 60.0);
        assert!(camera.position().y >= 10.0, "tick {i}: {:?}", camera.position());
    }
}

#[test]
fn test_orbiting_camera_stays_above_floor() {
    let limits = CameraLimits::default();
    let mut controls = SphericalOrbitControls::default();
    controls.resize(800, 600);
    let mut camera = DampedOrbitCamera::new(DVec3::new(50.0, 500.0, 50.0), DVec3::ZERO, limits, controls).unwrap();

    // Drag downward toward the horizon while zooming in
    camera.controls_mut().handle_button(MouseButton::Left, true);
    camera.controls_mut().handle_pointer_move(400.0, 300.0);
    for step in 0..60 {
        camera.controls_mut().handle_pointer_move(400.0, 300.0 - step as f64 * 20.0);
        camera.on_zoom_input(ZoomInput::In);
        camera.update(1.0 / 60.0);
        assert!(camera.position().y >= limits.floor_height);
    }
    camera.controls_mut().handle_button(MouseButton::Left, false);
}

// ============================================================================
// Default Orbit Controls
// ============================================================================

#[test]
fn test_rotation_keeps_zoom_distance() {
    let mut camera = DampedOrbitCamera::with_default_controls(
        DVec3::new(0.0, 100.0, 200.0),
        DVec3::ZERO,
        CameraLimits::default(),
    )
    .unwrap();
    camera.controls_mut().resize(800, 600);
    let start = camera.distance();

    camera.controls_mut().rotate(DVec2::new(200.0, 0.0));
    for _ in 0..120 {
        camera.update(1.0 / 60.0);
    }

    assert!((camera.distance() - start).abs() < 1e-6);
    assert!(camera.position().x.abs() > 1.0);
    assert_eq!(camera.zoom_state(), ZoomState::Idle);
}
