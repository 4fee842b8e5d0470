//! Height Field
//!
//! Deterministic radial-zone elevation for the valley terrain. The terrain is
//! split into concentric zones evaluated in priority order; the first zone
//! whose predicate matches supplies the elevation. Every zone blends to the
//! same value as its neighbour at the shared boundary, so the surface is
//! continuous.

use std::f64::consts::PI;

use tracing::info;

use super::config::TerrainConfig;
use super::mesh::{ElevationMesh, MAX_SEGMENTS};
use crate::error::Result;

/// A radial band of the terrain with its own elevation formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zone {
    /// `d > mountain_start`: ramped mountains with noise and rim boost
    Mountain,
    /// `flat_radius < d <= mountain_start`: low rolling relief
    Central,
    /// `d <= flat_radius`: exactly zero
    Flat,
}

/// Zones in evaluation order. `Flat` matches everything left over.
pub const ZONES: [Zone; 3] = [Zone::Mountain, Zone::Central, Zone::Flat];

impl Zone {
    /// Whether a point at radial distance `d` belongs to this zone.
    pub fn contains(self, d: f64, config: &TerrainConfig) -> bool {
        match self {
            Zone::Mountain => d > config.mountain_start,
            Zone::Central => d > config.flat_radius && d <= config.mountain_start,
            Zone::Flat => d <= config.flat_radius,
        }
    }

    /// Elevation formula for this zone. `d` must equal `hypot(x, y)`.
    pub fn elevation(self, x: f64, y: f64, d: f64, config: &TerrainConfig) -> f64 {
        match self {
            Zone::Mountain => mountain_elevation(x, y, d, config),
            Zone::Central => central_elevation(x, y, d, config),
            Zone::Flat => 0.0,
        }
    }
}

/// First zone in [`ZONES`] that contains distance `d`.
pub fn zone_at(d: f64, config: &TerrainConfig) -> Zone {
    ZONES
        .into_iter()
        .find(|zone| zone.contains(d, config))
        .unwrap_or(Zone::Flat)
}

/// Terrain elevation at planar position `(x, y)`.
///
/// Pure and deterministic: the same inputs always produce bit-identical
/// output. `config` is assumed valid (see [`TerrainConfig::validate`]).
pub fn elevation(x: f64, y: f64, config: &TerrainConfig) -> f64 {
    let d = (x * x + y * y).sqrt();
    zone_at(d, config).elevation(x, y, d, config)
}

/// Concave mountain ramp in `[0, 1]`: 0 at `mountain_start`, 1 from `mountain_end` on.
pub fn mountain_factor(d: f64, config: &TerrainConfig) -> f64 {
    let linear = (d - config.mountain_start) / (config.mountain_end - config.mountain_start);
    linear.clamp(0.0, 1.0).powf(config.mountain_exponent)
}

/// The two sinusoidal pseudo-noise terms perturbing the mountains.
pub fn mountain_noise(x: f64, y: f64, scale: f64) -> (f64, f64) {
    let noise1 = (x * scale).sin() * (y * scale * 1.3).cos() * 2.0;
    let noise2 = (x * scale * 2.1).sin() * (y * scale * 1.7).cos() * 1.5;
    (noise1, noise2)
}

fn mountain_elevation(x: f64, y: f64, d: f64, config: &TerrainConfig) -> f64 {
    let factor = mountain_factor(d, config);
    let (noise1, noise2) = mountain_noise(x, y, config.mountain_noise_scale);

    let mut height = factor * factor * config.max_height * (1.0 + noise1 * 0.2 + noise2 * 0.1);

    if d > config.edge_start {
        height += config.edge_boost * (d - config.edge_start) / config.edge_ramp;
    }

    height
}

fn central_elevation(x: f64, y: f64, d: f64, config: &TerrainConfig) -> f64 {
    let s = config.relief_noise_scale;
    let relief = (x * s).sin() * (y * s).cos() * config.relief_amplitude;
    let fade = (1.0 - d / config.flat_area).max(0.0);

    // Zero at both band edges so the band meets the flat disc and the
    // mountain foot without a step.
    let t = (d - config.flat_radius) / (config.mountain_start - config.flat_radius);
    let blend = (PI * t).sin();

    relief * fade * blend
}

/// A validated terrain configuration ready to displace meshes.
#[derive(Clone, Debug)]
pub struct HeightField {
    config: TerrainConfig,
}

impl HeightField {
    /// Validate `config` and wrap it.
    pub fn new(config: TerrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Elevation at `(x, y)`.
    #[inline]
    pub fn elevation(&self, x: f64, y: f64) -> f64 {
        elevation(x, y, &self.config)
    }

    /// Zone containing `(x, y)`.
    pub fn zone(&self, x: f64, y: f64) -> Zone {
        zone_at((x * x + y * y).sqrt(), &self.config)
    }

    /// Sample a `(segments + 1)²` row-major grid spanning the whole domain,
    /// row 0 at `y = +size/2`, in the same order as [`TerrainGrid`](super::TerrainGrid).
    /// `segments` is clamped the same way the grid clamps it.
    pub fn sample_grid(&self, segments: u32) -> Vec<f64> {
        let segments = segments.clamp(1, MAX_SEGMENTS);
        let half = self.config.half_size();
        let step = self.config.size / segments as f64;
        (0..=segments)
            .flat_map(|iy| {
                (0..=segments).map(move |ix| (ix as f64 * step - half, half - iy as f64 * step))
            })
            .map(|(x, y)| self.elevation(x, y))
            .collect()
    }

    /// Elevate every vertex of `mesh` once, then have it rebuild normals.
    pub fn apply_to<M: ElevationMesh>(&self, mesh: &mut M) {
        let count = mesh.vertex_count();
        let mut peak = f64::MIN;
        for i in 0..count {
            let (x, y) = mesh.planar(i);
            let z = self.elevation(x, y);
            peak = peak.max(z);
            mesh.set_elevation(i, z);
        }
        mesh.recompute_normals();
        info!(vertices = count, peak_height = peak, "Terrain height field applied");
    }
}
