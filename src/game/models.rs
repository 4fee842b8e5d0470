//! Model Catalog
//!
//! Registry of the character models the scene can spawn, addressed by dotted
//! paths such as `"monsters.coco"`, plus a clone-on-hit cache for loaded
//! assets. Decoding model files is up to the caller's loader closure.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, SceneError};

/// One loadable character: its model file, display scale and animation clips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    /// Model path relative to the catalog base path
    pub model: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Clip name -> path relative to the catalog base path
    #[serde(default)]
    pub animations: BTreeMap<String, String>,
}

fn default_scale() -> f64 {
    1.0
}

/// A node in the character tree: either a leaf character or a named group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterEntry {
    Character(CharacterConfig),
    Group(BTreeMap<String, CharacterEntry>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCatalog {
    /// Prefix joined onto every relative model path
    pub base_path: String,
    pub characters: BTreeMap<String, CharacterEntry>,
    /// Dotted character paths loaded when the scene starts
    pub preload: Vec<String>,
}

fn character(model: &str, scale: f64, animations: &[(&str, &str)]) -> CharacterEntry {
    CharacterEntry::Character(CharacterConfig {
        model: model.to_string(),
        scale,
        animations: animations
            .iter()
            .map(|(name, path)| (name.to_string(), path.to_string()))
            .collect(),
    })
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let monsters = BTreeMap::from([
            (
                "coco".to_string(),
                character(
                    "characters/Monsters/Coco/coco.fbx",
                    0.01,
                    &[
                        ("idle", "animations/monstersAnimations/coco_idle.fbx"),
                        ("attack", "animations/monstersAnimations/coco_attack.fbx"),
                    ],
                ),
            ),
            (
                "santi".to_string(),
                character(
                    "characters/Monsters/ElSanti/santi.fbx",
                    0.01,
                    &[("idle", "animations/monstersAnimations/santi_idle.fbx")],
                ),
            ),
            (
                "alien".to_string(),
                character(
                    "characters/Monsters/alien/alien.fbx",
                    0.01,
                    &[("idle", "animations/monstersAnimations/alien_idle.fbx")],
                ),
            ),
        ]);

        let characters = BTreeMap::from([
            (
                "farmer".to_string(),
                character("characters/Farmer/farmer.fbx", 0.01, &[("idle", "characters/Farmer/idle.fbx")]),
            ),
            ("monsters".to_string(), CharacterEntry::Group(monsters)),
        ]);

        Self {
            base_path: "assets/models/".to_string(),
            characters,
            preload: vec!["farmer".to_string()],
        }
    }
}

impl ModelCatalog {
    /// Full path of a model file, with backslashes normalized to `/`.
    pub fn model_path(&self, relative: &str) -> String {
        format!("{}{}", self.base_path, relative).replace('\\', "/")
    }

    /// Look up a character by dotted path, e.g. `"farmer"` or `"monsters.coco"`.
    ///
    /// Missing segments and paths that stop at a group are both unknown.
    pub fn character(&self, dotted: &str) -> Result<&CharacterConfig> {
        let unknown = || SceneError::UnknownModel(dotted.to_string());

        let mut segments = dotted.split('.');
        let first = segments.next().ok_or_else(unknown)?;
        let mut entry = self.characters.get(first).ok_or_else(unknown)?;

        for segment in segments {
            entry = match entry {
                CharacterEntry::Group(children) => children.get(segment).ok_or_else(unknown)?,
                CharacterEntry::Character(_) => return Err(unknown()),
            };
        }

        match entry {
            CharacterEntry::Character(config) => Ok(config),
            CharacterEntry::Group(_) => Err(unknown()),
        }
    }

    /// Load a character's model and animations through `cache`.
    ///
    /// A failed model load is an error; a failed animation is logged and
    /// left out of the result.
    pub fn load_character<T, E, F>(
        &self,
        dotted: &str,
        cache: &mut ModelCache<T>,
        mut loader: F,
    ) -> Result<LoadedCharacter<T>>
    where
        T: Clone,
        E: Display,
        F: FnMut(&str) -> std::result::Result<T, E>,
    {
        let config = self.character(dotted)?.clone();

        let model_path = self.model_path(&config.model);
        let model = cache
            .get_or_load(&model_path, &mut loader)
            .map_err(|e| SceneError::ModelLoad {
                path: model_path.clone(),
                reason: e.to_string(),
            })?;

        let mut animations = BTreeMap::new();
        for (name, relative) in &config.animations {
            let path = self.model_path(relative);
            match cache.get_or_load(&path, &mut loader) {
                Ok(clip) => {
                    animations.insert(name.clone(), clip);
                }
                Err(e) => warn!(character = dotted, animation = %name, error = %e, "Skipping animation"),
            }
        }

        debug!(character = dotted, animations = animations.len(), "Character loaded");
        Ok(LoadedCharacter {
            model,
            animations,
            config,
        })
    }

    /// Load every character listed in `preload`, sharing one cache.
    ///
    /// A character that fails to load is logged and left out; the rest still load.
    pub fn preload_all<T, E, F>(&self, cache: &mut ModelCache<T>, mut loader: F) -> BTreeMap<String, LoadedCharacter<T>>
    where
        T: Clone,
        E: Display,
        F: FnMut(&str) -> std::result::Result<T, E>,
    {
        let mut loaded = BTreeMap::new();
        for dotted in &self.preload {
            match self.load_character(dotted, cache, &mut loader) {
                Ok(character) => {
                    info!(character = %dotted, animations = character.animations.len(), "Character ready");
                    loaded.insert(dotted.clone(), character);
                }
                Err(e) => warn!(character = %dotted, error = %e, "Failed to load character"),
            }
        }
        loaded
    }
}

/// A character's loaded assets alongside the config they came from.
#[derive(Clone, Debug)]
pub struct LoadedCharacter<T> {
    pub model: T,
    pub animations: BTreeMap<String, T>,
    pub config: CharacterConfig,
}

/// Loaded assets keyed by full path. Hits hand out clones so callers never
/// share (and mutate) the cached copy.
#[derive(Clone, Debug)]
pub struct ModelCache<T: Clone> {
    entries: HashMap<String, T>,
}

impl<T: Clone> Default for ModelCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> ModelCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached clone for `path`, or the result of calling `loader` once.
    /// Failures are not cached.
    pub fn get_or_load<E, F>(&mut self, path: &str, loader: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&str) -> std::result::Result<T, E>,
    {
        if let Some(asset) = self.entries.get(path) {
            debug!(path, "Model cache hit");
            return Ok(asset.clone());
        }

        let asset = loader(path)?;
        self.entries.insert(path.to_string(), asset.clone());
        Ok(asset)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_lookup() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.character("farmer").unwrap().model, "characters/Farmer/farmer.fbx");
        let coco = catalog.character("monsters.coco").unwrap();
        assert_eq!(coco.animations.len(), 2);
        assert_eq!(coco.scale, 0.01);
    }

    #[test]
    fn test_lookup_misses() {
        let catalog = ModelCatalog::default();
        for path in ["", "dragon", "monsters", "monsters.dragon", "farmer.idle"] {
            assert!(
                matches!(catalog.character(path), Err(SceneError::UnknownModel(p)) if p == path),
                "{path:?} should be unknown"
            );
        }
    }

    #[test]
    fn test_model_path_normalizes_separators() {
        let catalog = ModelCatalog {
            base_path: "assets\\models\\".to_string(),
            ..ModelCatalog::default()
        };
        assert_eq!(catalog.model_path("characters\\Farmer\\farmer.fbx"), "assets/models/characters/Farmer/farmer.fbx");
    }

    #[test]
    fn test_cache_loads_once() {
        let mut cache = ModelCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let asset: std::result::Result<String, String> = cache.get_or_load("a.fbx", |p| {
                calls += 1;
                Ok(format!("mesh:{p}"))
            });
            assert_eq!(asset.unwrap(), "mesh:a.fbx");
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_load_not_cached() {
        let mut cache: ModelCache<String> = ModelCache::new();
        assert!(cache.get_or_load("bad.fbx", |_| Err("corrupt")).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_character_skips_broken_animation() {
        let catalog = ModelCatalog::default();
        let mut cache = ModelCache::new();
        let loaded = catalog
            .load_character("monsters.coco", &mut cache, |path: &str| {
                if path.ends_with("coco_attack.fbx") {
                    Err("missing file")
                } else {
                    Ok(path.to_string())
                }
            })
            .unwrap();

        assert_eq!(loaded.model, "assets/models/characters/Monsters/Coco/coco.fbx");
        assert_eq!(loaded.animations.keys().collect::<Vec<_>>(), ["idle"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_load_character_model_failure() {
        let catalog = ModelCatalog::default();
        let mut cache: ModelCache<String> = ModelCache::new();
        let err = catalog
            .load_character("farmer", &mut cache, |_: &str| Err("offline"))
            .unwrap_err();
        assert!(matches!(err, SceneError::ModelLoad { reason, .. } if reason == "offline"));
    }

    #[test]
    fn test_preload_skips_failed_characters() {
        let catalog = ModelCatalog {
            preload: vec!["farmer".to_string(), "monsters.santi".to_string(), "dragon".to_string()],
            ..ModelCatalog::default()
        };
        let mut cache = ModelCache::new();
        let loaded = catalog.preload_all(&mut cache, |path: &str| {
            if path.contains("ElSanti") {
                Err("missing file")
            } else {
                Ok(path.len())
            }
        });

        assert_eq!(loaded.keys().collect::<Vec<_>>(), ["farmer"]);
        assert_eq!(loaded["farmer"].animations.len(), 1);
        // Farmer model and idle clip; the failed santi model is not cached
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_default_preloads_farmer() {
        let catalog = ModelCatalog::default();
        assert_eq!(catalog.preload, ["farmer"]);
        assert!(catalog.character(&catalog.preload[0]).is_ok());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "base_path": "/models/",
            "characters": {
                "hero": { "model": "hero.glb" },
                "animals": { "cow": { "model": "cow.glb", "scale": 2.0 } },
                "empty": {}
            }
        }"#;
        let catalog: ModelCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.character("hero").unwrap().scale, 1.0);
        assert_eq!(catalog.character("animals.cow").unwrap().scale, 2.0);
        assert!(catalog.character("empty").is_err());
    }
}
