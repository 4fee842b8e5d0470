//! Light Rig
//!
//! Ambient fill, a sun, and a dim bounce light from below.
//! Directional lights are placed by position; they shine from that position
//! toward the origin.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Clear color behind the terrain (sky blue, #87CEEB).
pub const SKY_COLOR: wgpu::Color = wgpu::Color {
    r: 0x87 as f64 / 255.0,
    g: 0xce as f64 / 255.0,
    b: 0xeb as f64 / 255.0,
    a: 1.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Light position; the light points from here toward the origin
    pub position: [f32; 3],
}

impl DirectionalLight {
    /// Unit vector from the scene toward the light.
    pub fn direction_to_light(&self) -> Vec3 {
        Vec3::from_array(self.position).try_normalize().unwrap_or(Vec3::Y)
    }

    /// Color pre-multiplied by intensity.
    pub fn radiance(&self) -> Vec3 {
        Vec3::from_array(self.color) * self.intensity
    }
}

/// Scene lighting.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRig {
    pub ambient: AmbientLight,
    /// Main sun light
    pub sun: DirectionalLight,
    /// Weak light from below, simulating bounce
    pub fill: DirectionalLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.6,
            },
            sun: DirectionalLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.8,
                position: [100.0, 100.0, 50.0],
            },
            fill: DirectionalLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.2,
                position: [-50.0, -50.0, -50.0],
            },
        }
    }
}

impl LightRig {
    /// Ambient color pre-multiplied by intensity.
    pub fn ambient_radiance(&self) -> Vec3 {
        Vec3::from_array(self.ambient.color) * self.ambient.intensity
    }
}
