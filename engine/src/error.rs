//! Scene Errors
//!
//! Error taxonomy shared by the terrain, camera, config and render modules.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    /// Terrain configuration that would produce degenerate zone math.
    #[error("Invalid terrain config: {0}")]
    InvalidTerrain(String),
    /// Camera limits that cannot be satisfied (e.g. min >= max distance).
    #[error("Invalid camera config: {0}")]
    InvalidCamera(String),
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("No model configured for: {0}")]
    UnknownModel(String),
    #[error("Failed to load model {path}: {reason}")]
    ModelLoad { path: String, reason: String },
    #[error("GPU error: {0}")]
    Gpu(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
