//! Render Module
//!
//! GPU context, light rig, uniforms and the terrain pass.

pub mod gpu_context;
pub mod lights;
pub mod terrain_pass;
pub mod uniforms;

pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
pub use lights::{AmbientLight, DirectionalLight, LightRig, SKY_COLOR};
pub use terrain_pass::{MeshBuffer, TERRAIN_SHADER, TerrainPass, terrain_vertex_layout};
pub use uniforms::TerrainUniforms;
