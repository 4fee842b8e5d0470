//! Terrain Configuration
//!
//! Radial zone parameters for the valley height field. All distances are
//! measured in world units from the center of the square terrain domain.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};

/// Spatial frequency of the mountain noise terms.
pub const MOUNTAIN_NOISE_SCALE: f64 = 0.01;
/// Spatial frequency of the low central relief.
pub const RELIEF_NOISE_SCALE: f64 = 0.02;
/// Peak amplitude of the central relief before fading.
pub const RELIEF_AMPLITUDE: f64 = 10.0;
/// Exponent applied to the linear mountain ramp (concave foot).
pub const MOUNTAIN_EXPONENT: f64 = 0.7;

/// Radial zone configuration for the height field.
///
/// Zones from the center outward: flat (`d <= flat_radius`), central relief
/// (`flat_radius < d <= mountain_start`), mountains (`d > mountain_start`),
/// with an extra linear boost beyond `edge_start` so the rim never looks flat.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the square domain
    pub size: f64,
    /// Elevation is exactly zero at or below this distance
    pub flat_radius: f64,
    /// Distance at which the central relief fade `(1 - d / flat_area)` reaches zero
    pub flat_area: f64,
    /// Foot of the mountain ramp
    pub mountain_start: f64,
    /// Distance where the mountain factor reaches 1
    pub mountain_end: f64,
    /// Elevation at full mountain factor (before noise)
    pub max_height: f64,
    /// Distance where the rim boost begins
    pub edge_start: f64,
    /// Distance over which the rim boost adds one `edge_boost`
    pub edge_ramp: f64,
    /// Elevation added per `edge_ramp` beyond `edge_start`
    pub edge_boost: f64,
    pub mountain_noise_scale: f64,
    pub relief_noise_scale: f64,
    pub relief_amplitude: f64,
    pub mountain_exponent: f64,
}

impl TerrainConfig {
    /// Classic valley layout scaled to `size`.
    ///
    /// The flat disc and the foot of the mountains coincide, so there is no
    /// central relief band.
    pub fn for_size(size: f64) -> Self {
        Self {
            size,
            flat_radius: size * 0.1,
            flat_area: size * 0.1,
            mountain_start: size * 0.1,
            mountain_end: size * 0.5,
            max_height: 200.0,
            edge_start: size * 0.9,
            edge_ramp: size * 0.1,
            edge_boost: 30.0,
            mountain_noise_scale: MOUNTAIN_NOISE_SCALE,
            relief_noise_scale: RELIEF_NOISE_SCALE,
            relief_amplitude: RELIEF_AMPLITUDE,
            mountain_exponent: MOUNTAIN_EXPONENT,
        }
    }

    /// Variant with a wide rolling meadow between the flat disc and the mountains.
    pub fn meadow(size: f64) -> Self {
        Self {
            flat_radius: size * 0.05,
            flat_area: size * 0.6,
            mountain_start: size * 0.3,
            mountain_end: size * 0.5,
            ..Self::for_size(size)
        }
    }

    /// Reject configurations that would divide by zero or produce NaN.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("size", self.size),
            ("flat_radius", self.flat_radius),
            ("flat_area", self.flat_area),
            ("mountain_start", self.mountain_start),
            ("mountain_end", self.mountain_end),
            ("max_height", self.max_height),
            ("edge_start", self.edge_start),
            ("edge_ramp", self.edge_ramp),
            ("edge_boost", self.edge_boost),
            ("mountain_noise_scale", self.mountain_noise_scale),
            ("relief_noise_scale", self.relief_noise_scale),
            ("relief_amplitude", self.relief_amplitude),
            ("mountain_exponent", self.mountain_exponent),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.size <= 0.0 {
            return Err(invalid(format!("size must be positive, got {}", self.size)));
        }
        if self.mountain_end <= self.mountain_start {
            return Err(invalid(format!(
                "mountain_end ({}) must be greater than mountain_start ({})",
                self.mountain_end, self.mountain_start
            )));
        }
        if self.flat_radius < 0.0 {
            return Err(invalid(format!(
                "flat_radius must not be negative, got {}",
                self.flat_radius
            )));
        }
        if self.flat_radius > self.mountain_start {
            return Err(invalid(format!(
                "flat_radius ({}) must not exceed mountain_start ({})",
                self.flat_radius, self.mountain_start
            )));
        }
        if self.flat_area <= 0.0 {
            return Err(invalid(format!(
                "flat_area must be positive, got {}",
                self.flat_area
            )));
        }
        if self.edge_ramp <= 0.0 {
            return Err(invalid(format!(
                "edge_ramp must be positive, got {}",
                self.edge_ramp
            )));
        }
        if self.max_height < 0.0 {
            return Err(invalid(format!(
                "max_height must not be negative, got {}",
                self.max_height
            )));
        }
        if self.mountain_exponent <= 0.0 {
            return Err(invalid(format!(
                "mountain_exponent must be positive, got {}",
                self.mountain_exponent
            )));
        }
        Ok(())
    }

    /// Half the side length; vertices live in `[-half_size, half_size]`.
    pub fn half_size(&self) -> f64 {
        self.size * 0.5
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self::for_size(100_000.0)
    }
}

fn invalid(message: String) -> SceneError {
    SceneError::InvalidTerrain(message)
}
