//! Valley Engine Library
//!
//! Procedural valley terrain and a damped orbit camera, with the wgpu
//! plumbing needed to show them in a window or a browser canvas.
//!
//! # Modules
//!
//! - [`terrain`] - Radial-zone height field, its configuration and the grid mesh it displaces
//! - [`camera`] - Orbit controls, damped zoom state machine and perspective lens
//! - [`input`] - Windowing-agnostic mouse and wheel state
//! - [`render`] - GPU context, light rig, uniforms and the terrain pass
//! - [`game`] - Scene config, model catalog and the owned scene context
//!
//! # Example
//!
//! ```ignore
//! use valley_engine::game::{SceneConfig, SceneContext};
//! use valley_engine::input::ZoomInput;
//!
//! let mut scene = SceneContext::new(&SceneConfig::default())?;
//!
//! // Wheel notch away from the screen
//! scene.handle_zoom(ZoomInput::from_wheel_delta(100.0));
//!
//! // Once per frame
//! scene.update(1.0 / 60.0);
//! let uniforms = scene.uniforms();
//! ```

pub mod camera;
pub mod error;
pub mod input;
pub mod render;
pub mod terrain;

// Application modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use error::{Result, SceneError};
