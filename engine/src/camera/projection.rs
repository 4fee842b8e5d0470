//! Perspective Projection
//!
//! Lens parameters and the view/projection matrices handed to the GPU.

use glam::{DVec3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective lens. Angles in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Perspective {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Viewport aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.5,
            far: 20_000.0,
        }
    }
}

impl Perspective {
    /// Update the aspect ratio after a window resize. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Right-handed projection with wgpu's [0, 1] depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Combined `projection * view` for an eye looking at `target` with +Y up.
    pub fn view_projection(&self, eye: DVec3, target: DVec3) -> [[f32; 4]; 4] {
        (self.projection_matrix() * view_matrix(eye, target)).to_cols_array_2d()
    }
}

/// Look-at view matrix. Double-precision poses are narrowed for the GPU.
pub fn view_matrix(eye: DVec3, target: DVec3) -> Mat4 {
    Mat4::look_at_rh(eye.as_vec3(), target.as_vec3(), Vec3::Y)
}
