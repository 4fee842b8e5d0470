//! Scene Configuration
//!
//! Every tunable of the valley scene in one JSON-loadable struct. All
//! sections default, so a partial file only needs the values it changes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::camera::{CameraLimits, OrbitControlsConfig, Perspective};
use crate::error::{Result, SceneError};
use crate::render::LightRig;
use crate::terrain::{MAX_SEGMENTS, TerrainConfig};

use super::models::ModelCatalog;

/// Config file used when no path is given on the command line.
pub const DEFAULT_CONFIG_PATH: &str = "scene.json";

/// Zone layout presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainPreset {
    /// Flat floor ringed by mountains
    #[default]
    Valley,
    /// Wide rolling meadow inside the mountain ring
    Meadow,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSection {
    pub preset: TerrainPreset,
    /// Side length of the square terrain
    pub size: f64,
    /// Grid quads per side
    pub segments: u32,
    /// Explicit zone layout; replaces `preset` and `size` when present
    pub zones: Option<TerrainConfig>,
}

impl Default for TerrainSection {
    fn default() -> Self {
        Self {
            preset: TerrainPreset::Valley,
            size: 5000.0,
            segments: 400,
            zones: None,
        }
    }
}

impl TerrainSection {
    /// Reject grid resolutions the mesh cannot index, then validate the zones.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SEGMENTS).contains(&self.segments) {
            return Err(SceneError::InvalidTerrain(format!(
                "segments must be between 1 and {MAX_SEGMENTS}, got {}",
                self.segments
            )));
        }
        self.terrain_config().validate()
    }

    /// Zone layout this section describes.
    pub fn terrain_config(&self) -> TerrainConfig {
        match (self.zones, self.preset) {
            (Some(zones), _) => zones,
            (None, TerrainPreset::Valley) => TerrainConfig::for_size(self.size),
            (None, TerrainPreset::Meadow) => TerrainConfig::meadow(self.size),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// Initial eye position
    pub position: [f64; 3],
    /// Initial look-at target
    pub target: [f64; 3],
    pub limits: CameraLimits,
    pub lens: Perspective,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            position: [50.0, 500.0, 50.0],
            target: [0.0, 0.0, 0.0],
            limits: CameraLimits::default(),
            lens: Perspective::default(),
        }
    }
}

impl CameraSection {
    pub fn position(&self) -> DVec3 {
        DVec3::from_array(self.position)
    }

    pub fn target(&self) -> DVec3 {
        DVec3::from_array(self.target)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Valley".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

/// Complete scene configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainSection,
    pub camera: CameraSection,
    pub controls: OrbitControlsConfig,
    pub lights: LightRig,
    pub window: WindowConfig,
    pub models: ModelCatalog,
}

impl SceneConfig {
    /// Load from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_json(&text)?;
                info!(path = %path.display(), "Loaded scene config");
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No scene config found, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(SceneError::ConfigIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
