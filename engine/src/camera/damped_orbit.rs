//! Damped Orbit Camera
//!
//! Wheel-driven zoom with exponential damping, layered over an
//! [`OrbitControls`] collaborator that owns rotation and pan.
//!
//! Each wheel notch retargets the zoom to `current_distance * factor`
//! (clamped), and every `update` closes `damping_factor` of the remaining gap
//! along the current view direction. Once the gap is below `epsilon` the
//! camera returns to [`ZoomState::Idle`]. The camera height never drops
//! below `floor_height`: a step that would dip under it slides along the
//! floor instead, keeping the stepped distance.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::orbit_controls::{OrbitControls, SphericalOrbitControls};
use crate::error::{Result, SceneError};
use crate::input::ZoomInput;

/// Distance limits and zoom damping parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraLimits {
    /// Closest allowed zoom distance, > 0
    pub min_distance: f64,
    /// Farthest allowed zoom distance, > min_distance
    pub max_distance: f64,
    /// Fraction of the remaining zoom gap closed per update, in (0, 1]
    pub damping_factor: f64,
    /// Zoom is considered done once the gap is below this
    pub epsilon: f64,
    /// Minimum world-space camera height
    pub floor_height: f64,
    /// Distance multiplier per zoom-in notch, in (0, 1)
    pub zoom_in_factor: f64,
    /// Distance multiplier per zoom-out notch, > 1
    pub zoom_out_factor: f64,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_distance: 15.0,
            max_distance: 4000.0,
            damping_factor: 0.5,
            epsilon: 0.1,
            floor_height: 10.0,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
        }
    }
}

impl CameraLimits {
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(SceneError::InvalidCamera(message));

        let fields = [
            self.min_distance,
            self.max_distance,
            self.damping_factor,
            self.epsilon,
            self.floor_height,
            self.zoom_in_factor,
            self.zoom_out_factor,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return invalid(format!("all camera limits must be finite: {self:?}"));
        }
        if self.min_distance <= 0.0 {
            return invalid(format!(
                "min_distance must be positive, got {}",
                self.min_distance
            ));
        }
        if self.min_distance >= self.max_distance {
            return invalid(format!(
                "min_distance ({}) must be less than max_distance ({})",
                self.min_distance, self.max_distance
            ));
        }
        if self.damping_factor <= 0.0 || self.damping_factor > 1.0 {
            return invalid(format!(
                "damping_factor must be in (0, 1], got {}",
                self.damping_factor
            ));
        }
        if self.epsilon <= 0.0 {
            return invalid(format!("epsilon must be positive, got {}", self.epsilon));
        }
        if self.zoom_in_factor <= 0.0 || self.zoom_in_factor >= 1.0 {
            return invalid(format!(
                "zoom_in_factor must be in (0, 1), got {}",
                self.zoom_in_factor
            ));
        }
        if self.zoom_out_factor <= 1.0 {
            return invalid(format!(
                "zoom_out_factor must be greater than 1, got {}",
                self.zoom_out_factor
            ));
        }
        Ok(())
    }
}

/// Pending zoom state.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ZoomState {
    /// No zoom in flight
    #[default]
    Idle,
    /// Easing toward the contained distance
    Targeting(f64),
}

/// What the zoom step did during one `update`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomTick {
    /// Nothing pending
    Idle,
    /// Moved closer to the target distance
    Stepped,
    /// Gap fell below epsilon; now idle
    Converged,
    /// The floor clamp prevented progress; zoom abandoned
    Stalled,
    /// Camera sits on the target so no direction exists; position kept
    Degenerate,
}

/// Orbit camera with damped zoom.
///
/// Owns the camera pose exclusively; renderers read `position()` and
/// `target()` after `update()`.
#[derive(Clone, Debug)]
pub struct DampedOrbitCamera<C: OrbitControls = SphericalOrbitControls> {
    position: DVec3,
    target: DVec3,
    distance: f64,
    zoom: ZoomState,
    limits: CameraLimits,
    controls: C,
    /// Degenerate-direction warning already emitted for the pending zoom
    degenerate_reported: bool,
}

/// A step closing less than this fraction of its expected progress made none.
const STALL_FRACTION: f64 = 1e-3;

impl<C: OrbitControls> DampedOrbitCamera<C> {
    /// Create a camera at `position` looking at `target`.
    ///
    /// Fails if `limits` are inconsistent. The starting height is raised to
    /// the floor if needed.
    pub fn new(position: DVec3, target: DVec3, limits: CameraLimits, controls: C) -> Result<Self> {
        limits.validate()?;
        let position = DVec3::new(position.x, position.y.max(limits.floor_height), position.z);
        Ok(Self {
            position,
            target,
            distance: (position - target).length(),
            zoom: ZoomState::Idle,
            limits,
            controls,
            degenerate_reported: false,
        })
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn target(&self) -> DVec3 {
        self.target
    }

    /// `|position - target|` as of the last mutation.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn zoom_state(&self) -> ZoomState {
        self.zoom
    }

    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    pub fn controls(&self) -> &C {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut C {
        &mut self.controls
    }

    /// Retarget the zoom from the current distance.
    ///
    /// Notches do not accumulate: a new notch replaces any pending target
    /// with one computed from where the camera is now.
    pub fn on_zoom_input(&mut self, input: ZoomInput) {
        let factor = match input {
            ZoomInput::None => return,
            ZoomInput::In => self.limits.zoom_in_factor,
            ZoomInput::Out => self.limits.zoom_out_factor,
        };

        let current = (self.position - self.target).length();
        let goal = (current * factor).clamp(self.limits.min_distance, self.limits.max_distance);
        debug!(current, goal, ?input, "Zoom retargeted");
        self.zoom = ZoomState::Targeting(goal);
        self.degenerate_reported = false;
    }

    /// Advance one frame. Call exactly once per rendered frame.
    ///
    /// Runs the orbit controls first, then the zoom step, then the floor clamp.
    pub fn update(&mut self, dt: f64) -> ZoomTick {
        self.controls.update(&mut self.position, &mut self.target, dt);

        let gap_before = self.gap();
        let mut tick = self.step_zoom();

        self.position.y = self.position.y.max(self.limits.floor_height);
        self.distance = (self.position - self.target).length();

        // Every reachable step shrinks the gap by `damping_factor * before`;
        // no progress means the goal lies closer than the floor allows.
        if tick == ZoomTick::Stepped {
            if let (Some(before), Some(after)) = (gap_before, self.gap()) {
                if before - after < STALL_FRACTION * self.limits.damping_factor * before {
                    debug!(gap = after, "Zoom stalled against the floor");
                    self.zoom = ZoomState::Idle;
                    tick = ZoomTick::Stalled;
                }
            }
        }

        tick
    }

    /// Remaining `|goal - distance|` while a zoom is pending.
    fn gap(&self) -> Option<f64> {
        match self.zoom {
            ZoomState::Idle => None,
            ZoomState::Targeting(goal) => Some((goal - (self.position - self.target).length()).abs()),
        }
    }

    fn step_zoom(&mut self) -> ZoomTick {
        let ZoomState::Targeting(goal) = self.zoom else {
            return ZoomTick::Idle;
        };

        let offset = self.position - self.target;
        let current = offset.length();
        if (goal - current).abs() < self.limits.epsilon {
            self.zoom = ZoomState::Idle;
            debug!(distance = current, "Zoom converged");
            return ZoomTick::Converged;
        }

        let Some(direction) = offset.try_normalize() else {
            if self.degenerate_reported {
                debug!("Zoom step skipped, camera still on its target");
            } else {
                warn!(
                    position = ?self.position,
                    "Camera sits on its target; skipping zoom step"
                );
                self.degenerate_reported = true;
            }
            return ZoomTick::Degenerate;
        };

        let next = current + (goal - current) * self.limits.damping_factor;
        self.position = self.target + direction * next;
        if self.position.y < self.limits.floor_height {
            self.position = self.slide_along_floor(direction, next);
        }
        ZoomTick::Stepped
    }

    /// Point on the floor plane `distance` away from the target, in the
    /// horizontal heading of `direction`. Closer than the floor allows, it
    /// settles at the nearest floor point.
    fn slide_along_floor(&self, direction: DVec3, distance: f64) -> DVec3 {
        let rise = self.limits.floor_height - self.target.y;
        let heading = DVec2::new(direction.x, direction.z)
            .try_normalize()
            .unwrap_or(DVec2::X);
        let reach = (distance * distance - rise * rise).max(0.0).sqrt();
        self.target + DVec3::new(heading.x * reach, rise, heading.y * reach)
    }
}

impl DampedOrbitCamera<SphericalOrbitControls> {
    /// Camera driven by the default spherical orbit controls.
    pub fn with_default_controls(position: DVec3, target: DVec3, limits: CameraLimits) -> Result<Self> {
        Self::new(position, target, limits, SphericalOrbitControls::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Controls that never move the camera.
    struct Still;

    impl OrbitControls for Still {
        fn update(&mut self, _: &mut DVec3, _: &mut DVec3, _: f64) {}
    }

    fn camera_at(position: DVec3) -> DampedOrbitCamera<Still> {
        let limits = CameraLimits {
            min_distance: 15.0,
            max_distance: 200.0,
            ..CameraLimits::default()
        };
        DampedOrbitCamera::new(position, DVec3::ZERO, limits, Still).unwrap()
    }

    #[test]
    fn test_zoom_out_targets_scaled_distance() {
        let mut camera = camera_at(DVec3::new(0.0, 18.0, 24.0));
        assert!((camera.distance() - 30.0).abs() < 1e-12);

        camera.on_zoom_input(ZoomInput::Out);
        match camera.zoom_state() {
            ZoomState::Targeting(goal) => assert!((goal - 33.0).abs() < 1e-9),
            other => panic!("expected Targeting, got {other:?}"),
        }
    }

    #[test]
    fn test_none_input_is_noop() {
        let mut camera = camera_at(DVec3::new(0.0, 18.0, 24.0));
        camera.on_zoom_input(ZoomInput::None);
        assert_eq!(camera.zoom_state(), ZoomState::Idle);
    }

    #[test]
    fn test_retarget_uses_current_distance() {
        let mut camera = camera_at(DVec3::new(0.0, 18.0, 24.0));
        camera.on_zoom_input(ZoomInput::Out);
        camera.on_zoom_input(ZoomInput::Out);
        // Not 30 * 1.1 * 1.1: the second notch starts from the unchanged 30
        assert_eq!(camera.zoom_state(), ZoomState::Targeting(30.0 * 1.1));
    }

    #[test]
    fn test_converges_and_returns_to_idle() {
        let mut camera = camera_at(DVec3::new(0.0, 18.0, 24.0));
        camera.on_zoom_input(ZoomInput::Out);

        let mut converged = false;
        for _ in 0..200 {
            if camera.update(0.016) == ZoomTick::Converged {
                converged = true;
                break;
            }
        }
        assert!(converged);
        assert_eq!(camera.zoom_state(), ZoomState::Idle);
        assert!((camera.distance() - 33.0).abs() < camera.limits().epsilon);
    }

    #[test]
    fn test_zoom_keeps_direction() {
        let start = DVec3::new(0.0, 18.0, 24.0);
        let mut camera = camera_at(start);
        camera.on_zoom_input(ZoomInput::Out);
        camera.update(0.016);

        let dir = camera.position().normalize();
        assert!((dir - start.normalize()).length() < 1e-12);
        assert!((camera.distance() - 31.5).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_in_clamped_to_min() {
        let mut camera = camera_at(DVec3::new(0.0, 12.0, 9.0));
        camera.on_zoom_input(ZoomInput::In);
        assert_eq!(camera.zoom_state(), ZoomState::Targeting(15.0));
    }

    #[test]
    fn test_degenerate_direction_keeps_position() {
        let limits = CameraLimits {
            floor_height: -1.0,
            ..CameraLimits::default()
        };
        let mut camera = DampedOrbitCamera::new(DVec3::ZERO, DVec3::ZERO, limits, Still).unwrap();
        camera.on_zoom_input(ZoomInput::Out);
        assert_eq!(camera.update(0.016), ZoomTick::Degenerate);
        assert_eq!(camera.position(), DVec3::ZERO);
        assert!(!camera.position().is_nan());
    }

    #[test]
    fn test_floor_clamp_stalls_zoom() {
        // Target below the floor: zooming in can never get closer than the floor allows
        let limits = CameraLimits {
            min_distance: 1.0,
            max_distance: 100.0,
            floor_height: 10.0,
            ..CameraLimits::default()
        };
        let mut camera =
            DampedOrbitCamera::new(DVec3::new(0.0, 10.0, 0.5), DVec3::ZERO, limits, Still).unwrap();
        camera.on_zoom_input(ZoomInput::In);

        let mut stalled = false;
        for _ in 0..200 {
            let tick = camera.update(0.016);
            assert!(camera.position().y >= 10.0);
            if tick == ZoomTick::Stalled {
                stalled = true;
                break;
            }
        }
        assert!(stalled);
        assert_eq!(camera.zoom_state(), ZoomState::Idle);
        // Parked on the floor point nearest the target
        assert!((camera.distance() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_along_floor_converges_when_reachable() {
        let limits = CameraLimits {
            min_distance: 1.0,
            max_distance: 1000.0,
            floor_height: 10.0,
            ..CameraLimits::default()
        };

        for x in [5.0, 8.0, 12.0, 20.0, 40.0, 80.0] {
            let mut camera =
                DampedOrbitCamera::new(DVec3::new(x, 10.0, 0.0), DVec3::ZERO, limits, Still).unwrap();
            loop {
                camera.on_zoom_input(ZoomInput::In);
                let ZoomState::Targeting(goal) = camera.zoom_state() else {
                    panic!("zoom in should be pending");
                };
                let tick = (0..200)
                    .map(|_| camera.update(0.016))
                    .find(|tick| *tick != ZoomTick::Stepped)
                    .expect("zoom should settle");
                assert!(camera.position().y >= 10.0);

                // Goals inside the floor distance cannot be reached
                if goal < 10.0 + limits.epsilon {
                    break;
                }
                assert_eq!(tick, ZoomTick::Converged, "start x={x}, goal={goal}");
                assert!((camera.distance() - goal).abs() < limits.epsilon);
            }
        }
    }

    /// Counts WARN events.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_degenerate_warns_once_per_zoom() {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));

        tracing::subscriber::with_default(subscriber, || {
            let limits = CameraLimits {
                floor_height: -1.0,
                ..CameraLimits::default()
            };
            let mut camera = DampedOrbitCamera::new(DVec3::ZERO, DVec3::ZERO, limits, Still).unwrap();

            camera.on_zoom_input(ZoomInput::Out);
            for _ in 0..60 {
                assert_eq!(camera.update(0.016), ZoomTick::Degenerate);
            }
            assert_eq!(warnings.load(Ordering::SeqCst), 1);

            // A new wheel notch is a new zoom
            camera.on_zoom_input(ZoomInput::In);
            camera.update(0.016);
            assert_eq!(warnings.load(Ordering::SeqCst), 2);
        });
    }

    #[test]
    fn test_rejects_inverted_limits() {
        let limits = CameraLimits {
            min_distance: 200.0,
            max_distance: 15.0,
            ..CameraLimits::default()
        };
        let result = DampedOrbitCamera::new(DVec3::new(0.0, 50.0, 50.0), DVec3::ZERO, limits, Still);
        assert!(matches!(result, Err(SceneError::InvalidCamera(_))));
    }

    #[test]
    fn test_start_raised_to_floor() {
        let camera = camera_at(DVec3::new(30.0, 0.0, 0.0));
        assert_eq!(camera.position().y, 10.0);
    }
}
