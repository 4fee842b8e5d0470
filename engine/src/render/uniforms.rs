//! Uniform Structs for GPU Shaders
//!
//! Must match the WGSL layout in `shaders/terrain.wgsl` exactly.

use glam::Mat4;

use super::lights::LightRig;

/// Per-frame uniforms for the terrain pass.
///
/// WGSL layout (160 bytes, every vec3 padded out to 16):
///   offset   0: view_proj (mat4x4<f32>)  = 64 bytes
///   offset  64: camera_pos (vec3<f32>)   + pad
///   offset  80: sun_dir (vec3<f32>)      + pad
///   offset  96: sun_color (vec3<f32>)    + pad
///   offset 112: fill_dir (vec3<f32>)     + pad
///   offset 128: fill_color (vec3<f32>)   + pad
///   offset 144: ambient_color (vec3<f32>) + pad
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _pad0: f32,
    /// Unit vector toward the sun
    pub sun_dir: [f32; 3],
    pub _pad1: f32,
    /// Sun color pre-multiplied by intensity
    pub sun_color: [f32; 3],
    pub _pad2: f32,
    pub fill_dir: [f32; 3],
    pub _pad3: f32,
    pub fill_color: [f32; 3],
    pub _pad4: f32,
    pub ambient_color: [f32; 3],
    pub _pad5: f32,
}

static_assertions::assert_eq_size!(TerrainUniforms, [u8; 160]);

impl Default for TerrainUniforms {
    fn default() -> Self {
        let mut uniforms = Self::zeroed_with_identity();
        uniforms.set_lights(&LightRig::default());
        uniforms
    }
}

impl TerrainUniforms {
    fn zeroed_with_identity() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            ..bytemuck::Zeroable::zeroed()
        }
    }

    /// Set camera matrices for this frame.
    pub fn set_camera(&mut self, view_proj: [[f32; 4]; 4], camera_pos: [f32; 3]) {
        self.view_proj = view_proj;
        self.camera_pos = camera_pos;
    }

    /// Pack light directions and pre-multiplied colors.
    pub fn set_lights(&mut self, lights: &LightRig) {
        self.sun_dir = lights.sun.direction_to_light().to_array();
        self.sun_color = lights.sun.radiance().to_array();
        self.fill_dir = lights.fill.direction_to_light().to_array();
        self.fill_color = lights.fill.radiance().to_array();
        self.ambient_color = lights.ambient_radiance().to_array();
    }
}
