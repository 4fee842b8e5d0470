//! Camera Module
//!
//! Orbit camera with damped zoom, its rotate/pan collaborator, and the
//! perspective lens. Window-system agnostic: only camera state and math.

pub mod damped_orbit;
pub mod orbit_controls;
pub mod projection;

pub use damped_orbit::{CameraLimits, DampedOrbitCamera, ZoomState, ZoomTick};
pub use orbit_controls::{OrbitControls, OrbitControlsConfig, SphericalOrbitControls};
pub use projection::{Perspective, view_matrix};
