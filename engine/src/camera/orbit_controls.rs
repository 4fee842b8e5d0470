//! Orbit Controls
//!
//! Damped rotate/pan around a look-at target, modelled on the usual
//! web-style orbit controls: pointer drags accumulate a spherical delta and
//! a pan delta, and every `update` applies a `damping_factor` fraction of
//! what is pending and decays the rest. Zoom is deliberately absent; the
//! radial distance is owned by [`super::DampedOrbitCamera`].
//!
//! Controls:
//! - Left mouse drag: Orbit (rotate around target)
//! - Right mouse drag: Pan (translate target in screen space)

use std::f64::consts::{PI, TAU};

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::input::MouseButton;

/// Keeps the polar angle off the exact poles where azimuth is undefined.
const POLE_EPSILON: f64 = 1e-6;
/// Pending motion below this is treated as settled.
const SETTLE_THRESHOLD: f64 = 1e-9;

/// Collaborator that advances rotation/pan state once per frame.
///
/// Implementations may move both `position` and `target`, but must not change
/// the radial distance between them; zoom is layered on top by the caller.
pub trait OrbitControls {
    fn update(&mut self, position: &mut DVec3, target: &mut DVec3, dt: f64);
}

/// Tuning for [`SphericalOrbitControls`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitControlsConfig {
    /// Multiplier on drag-to-angle conversion
    pub rotate_speed: f64,
    /// Multiplier on drag-to-distance conversion
    pub pan_speed: f64,
    /// Fraction of pending rotation/pan applied per update, in (0, 1]
    pub damping_factor: f64,
    /// Polar angle limits in radians, measured from +Y
    pub min_polar_angle: f64,
    pub max_polar_angle: f64,
    /// Vertical field of view used to scale panning with depth
    pub fov_y_degrees: f64,
}

impl Default for OrbitControlsConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.5,
            pan_speed: 0.5,
            damping_factor: 0.5,
            min_polar_angle: 0.0,
            // Slightly under 90 degrees so the camera never flips below the horizon
            max_polar_angle: PI * 0.49,
            fov_y_degrees: 75.0,
        }
    }
}

/// Spherical-coordinate orbit controls with damped rotation and pan.
#[derive(Clone, Debug)]
pub struct SphericalOrbitControls {
    pub config: OrbitControlsConfig,
    /// Pending (azimuth, polar) change in radians
    spherical_delta: DVec2,
    /// Pending pan in viewport pixels (x right, y down)
    pan_delta: DVec2,
    /// Viewport height in pixels; drags are normalized by it
    viewport_height: f64,

    // -- Pointer interaction state --
    is_rotating: bool,
    is_panning: bool,
    last_pointer: Option<DVec2>,
}

impl SphericalOrbitControls {
    pub fn new(config: OrbitControlsConfig) -> Self {
        Self {
            config,
            spherical_delta: DVec2::ZERO,
            pan_delta: DVec2::ZERO,
            viewport_height: 1.0,
            is_rotating: false,
            is_panning: false,
            last_pointer: None,
        }
    }

    // ========================================================================
    // INPUT HANDLING
    // ========================================================================

    /// Start or stop a drag.
    ///
    /// - Left button: orbit
    /// - Right button: pan
    pub fn handle_button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.is_rotating = pressed,
            MouseButton::Right => self.is_panning = pressed,
            _ => return,
        }
        if !self.is_active() {
            self.last_pointer = None;
        }
    }

    /// Handle pointer movement in viewport pixels. Call on every cursor move.
    pub fn handle_pointer_move(&mut self, x: f64, y: f64) {
        let pointer = DVec2::new(x, y);
        let delta = self.last_pointer.map_or(DVec2::ZERO, |last| pointer - last);
        self.last_pointer = Some(pointer);

        if self.is_rotating {
            self.rotate(delta);
        }
        if self.is_panning {
            self.pan_delta += delta * self.config.pan_speed;
        }
    }

    /// Queue a rotation from a drag of `delta` pixels.
    ///
    /// A drag across the full viewport height is one full turn at speed 1.
    pub fn rotate(&mut self, delta: DVec2) {
        let scale = TAU / self.viewport_height * self.config.rotate_speed;
        self.spherical_delta.x -= delta.x * scale;
        self.spherical_delta.y -= delta.y * scale;
    }

    /// Update the viewport height after a window resize.
    pub fn resize(&mut self, _width: u32, height: u32) {
        if height > 0 {
            self.viewport_height = height as f64;
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Whether a drag is in progress.
    pub fn is_active(&self) -> bool {
        self.is_rotating || self.is_panning
    }

    /// Whether rotation or pan is still easing out.
    pub fn is_settling(&self) -> bool {
        self.spherical_delta.length_squared() > SETTLE_THRESHOLD
            || self.pan_delta.length_squared() > SETTLE_THRESHOLD
    }

    /// Pan target and camera together in the camera's screen plane.
    fn apply_pan(&self, pixels: DVec2, position: &mut DVec3, target: &mut DVec3) {
        let offset = *position - *target;
        let forward = -offset;
        let Some(right) = forward.cross(DVec3::Y).try_normalize() else {
            return;
        };
        let up = right.cross(forward).normalize_or_zero();

        // World units per pixel at the target's depth
        let half_fov = (self.config.fov_y_degrees.to_radians() * 0.5).tan();
        let world_per_pixel = 2.0 * offset.length() * half_fov / self.viewport_height;

        let shift = (-right * pixels.x + up * pixels.y) * world_per_pixel;
        *target += shift;
        *position += shift;
    }
}

impl Default for SphericalOrbitControls {
    fn default() -> Self {
        Self::new(OrbitControlsConfig::default())
    }
}

impl OrbitControls for SphericalOrbitControls {
    fn update(&mut self, position: &mut DVec3, target: &mut DVec3, _dt: f64) {
        let damping = self.config.damping_factor.clamp(f64::EPSILON, 1.0);

        let pan_step = self.pan_delta * damping;
        self.apply_pan(pan_step, position, target);

        let offset = *position - *target;
        let radius = offset.length();
        if radius > 0.0 {
            let mut theta = offset.x.atan2(offset.z);
            let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

            theta += self.spherical_delta.x * damping;
            phi += self.spherical_delta.y * damping;
            phi = phi
                .clamp(self.config.min_polar_angle, self.config.max_polar_angle)
                .clamp(POLE_EPSILON, PI - POLE_EPSILON);

            let sin_phi = phi.sin();
            *position = *target
                + DVec3::new(
                    radius * sin_phi * theta.sin(),
                    radius * phi.cos(),
                    radius * sin_phi * theta.cos(),
                );
        }

        self.spherical_delta *= 1.0 - damping;
        self.pan_delta *= 1.0 - damping;
        if !self.is_settling() {
            self.spherical_delta = DVec2::ZERO;
            self.pan_delta = DVec2::ZERO;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
