//! Terrain Grid Mesh
//!
//! A square plane subdivided into `segments x segments` quads, laid out like
//! a regular plane geometry (x to the right, y up, row 0 at the top edge).
//! The plane is displaced by a height field and then laid flat in a Y-up
//! world, so planar `(x, y)` maps to world `(x, elevation, -y)`.

use glam::DVec3;

/// Vertex data for the terrain pipeline
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

/// Geometry that can be displaced by a height field.
///
/// Vertices expose read-only planar coordinates and a writable elevation.
/// Normals are stale after elevations change until `recompute_normals` runs.
pub trait ElevationMesh {
    fn vertex_count(&self) -> usize;
    /// Planar `(x, y)` of vertex `index`.
    fn planar(&self, index: usize) -> (f64, f64);
    fn set_elevation(&mut self, index: usize, z: f64);
    fn recompute_normals(&mut self);
}

// Height-tint palette (linear RGB)
const GRASS: [f32; 4] = [0.28, 0.42, 0.15, 1.0];
const GRASS_DRY: [f32; 4] = [0.35, 0.33, 0.18, 1.0];
const ROCK: [f32; 4] = [0.42, 0.38, 0.33, 1.0];
const SNOW: [f32; 4] = [0.92, 0.93, 0.95, 1.0];

/// Largest accepted grid resolution; keeps vertex indices well inside `u32`.
pub const MAX_SEGMENTS: u32 = 4096;

/// Subdivided square plane with per-vertex elevation and normals.
#[derive(Clone, Debug)]
pub struct TerrainGrid {
    size: f64,
    segments: u32,
    elevations: Vec<f64>,
    normals: Vec<DVec3>,
    indices: Vec<u32>,
}

impl TerrainGrid {
    /// Flat grid of side `size` with `segments` quads per side, clamped to
    /// `1..=MAX_SEGMENTS`.
    pub fn new(size: f64, segments: u32) -> Self {
        let segments = segments.clamp(1, MAX_SEGMENTS);
        let row = segments as usize + 1;
        let vertex_count = row * row;

        let mut indices = Vec::with_capacity(segments as usize * segments as usize * 6);
        for iy in 0..segments {
            for ix in 0..segments {
                let a = ix + (segments + 1) * iy;
                let b = ix + (segments + 1) * (iy + 1);
                let c = (ix + 1) + (segments + 1) * (iy + 1);
                let d = (ix + 1) + (segments + 1) * iy;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self {
            size,
            segments,
            elevations: vec![0.0; vertex_count],
            normals: vec![DVec3::Y; vertex_count],
            indices,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn elevation(&self, index: usize) -> f64 {
        self.elevations[index]
    }

    /// World-space (Y-up) normal of vertex `index`.
    pub fn normal(&self, index: usize) -> DVec3 {
        self.normals[index]
    }

    /// World-space (Y-up) position of vertex `index`.
    pub fn world_position(&self, index: usize) -> DVec3 {
        let (x, y) = self.planar(index);
        DVec3::new(x, self.elevations[index], -y)
    }

    /// Highest elevation currently on the grid.
    pub fn peak(&self) -> f64 {
        self.elevations.iter().copied().fold(0.0, f64::max)
    }

    /// GPU vertices tinted by height and slope.
    ///
    /// `tint_height` is the elevation that maps to the top of the palette.
    pub fn vertices(&self, tint_height: f64) -> Vec<TerrainVertex> {
        let tint_height = if tint_height > 0.0 { tint_height } else { 1.0 };
        (0..self.vertex_count())
            .map(|i| {
                let position = self.world_position(i);
                let normal = self.normals[i];
                let relative = (self.elevations[i] / tint_height).clamp(0.0, 1.0) as f32;
                let slope = (1.0 - normal.y.abs()) as f32;
                TerrainVertex {
                    position: position.as_vec3().to_array(),
                    normal: normal.as_vec3().to_array(),
                    color: height_tint(relative, slope),
                }
            })
            .collect()
    }
}

impl ElevationMesh for TerrainGrid {
    fn vertex_count(&self) -> usize {
        self.elevations.len()
    }

    fn planar(&self, index: usize) -> (f64, f64) {
        let row = self.segments as usize + 1;
        let ix = (index % row) as f64;
        let iy = (index / row) as f64;
        let step = self.size / self.segments as f64;
        let half = self.size * 0.5;
        (ix * step - half, half - iy * step)
    }

    fn set_elevation(&mut self, index: usize, z: f64) {
        self.elevations[index] = z;
    }

    /// Area-weighted vertex normals from the current world positions.
    fn recompute_normals(&mut self) {
        let mut accumulated = vec![DVec3::ZERO; self.vertex_count()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = self.world_position(a);
            let pb = self.world_position(b);
            let pc = self.world_position(c);
            // Unnormalized cross product weights by triangle area
            let face = (pb - pa).cross(pc - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        for (normal, sum) in self.normals.iter_mut().zip(accumulated) {
            *normal = sum.try_normalize().unwrap_or(DVec3::Y);
        }
    }
}

/// Smooth step function for natural transitions
fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn blend_colors(a: &[f32; 4], b: &[f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn height_tint(relative: f32, slope: f32) -> [f32; 4] {
    let mut color = blend_colors(&GRASS, &GRASS_DRY, smooth_step(0.05, 0.3, relative));
    color = blend_colors(&color, &ROCK, smooth_step(0.25, 0.6, relative).max(smooth_step(0.35, 0.65, slope)));
    blend_colors(&color, &SNOW, smooth_step(0.8, 0.95, relative) * (1.0 - slope))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let grid = TerrainGrid::new(10.0, 4);
        assert_eq!(grid.vertex_count(), 25);
        assert_eq!(grid.indices().len(), 4 * 4 * 6);
    }

    #[test]
    fn test_planar_layout() {
        let grid = TerrainGrid::new(10.0, 2);
        assert_eq!(grid.planar(0), (-5.0, 5.0));
        assert_eq!(grid.planar(4), (0.0, 0.0));
        assert_eq!(grid.planar(8), (5.0, -5.0));
    }

    #[test]
    fn test_flat_grid_normals_point_up() {
        let mut grid = TerrainGrid::new(10.0, 3);
        grid.recompute_normals();
        for i in 0..grid.vertex_count() {
            assert!((grid.normal(i) - DVec3::Y).length() < 1e-12);
        }
    }

    #[test]
    fn test_slope_tilts_normals() {
        let mut grid = TerrainGrid::new(10.0, 4);
        // Ramp rising toward +x
        for i in 0..grid.vertex_count() {
            let (x, _) = grid.planar(i);
            grid.set_elevation(i, x);
        }
        grid.recompute_normals();
        let n = grid.normal(12);
        assert!(n.x < -0.5, "normal should lean away from the rise: {n:?}");
        assert!(n.y > 0.5);
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_segments_clamped() {
        let grid = TerrainGrid::new(10.0, 0);
        assert_eq!(grid.segments(), 1);
        assert_eq!(grid.vertex_count(), 4);
    }
}
