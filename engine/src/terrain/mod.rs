//! Terrain Module
//!
//! Procedural valley terrain: a validated radial-zone configuration, the pure
//! height-field function, and the plane grid it displaces.

pub mod config;
pub mod height_field;
pub mod mesh;

pub use config::TerrainConfig;
pub use height_field::{HeightField, Zone, ZONES, elevation, mountain_factor, zone_at};
pub use mesh::{ElevationMesh, MAX_SEGMENTS, TerrainGrid, TerrainVertex};
