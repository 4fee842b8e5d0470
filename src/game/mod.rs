//! Valley scene
//!
//! Application-level pieces built on the engine modules: the JSON scene
//! config, the character model catalog and the owned scene context.

pub mod config;
pub mod models;
pub mod scene;

pub use config::{CameraSection, DEFAULT_CONFIG_PATH, SceneConfig, TerrainPreset, TerrainSection, WindowConfig};
pub use models::{CharacterConfig, CharacterEntry, LoadedCharacter, ModelCache, ModelCatalog};
pub use scene::SceneContext;
