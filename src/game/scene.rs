//! Scene Context
//!
//! Owns everything the valley scene needs between frames: the elevated
//! terrain grid, the orbit camera, the light rig and the viewport. Hosts feed
//! it input events, call [`SceneContext::update`] once per frame, then read
//! the uniforms and vertices for drawing.

use tracing::info;

use crate::camera::{DampedOrbitCamera, Perspective, SphericalOrbitControls, ZoomTick};
use crate::error::Result;
use crate::input::{MouseButton, MouseState, ZoomInput};
use crate::render::{LightRig, TerrainUniforms};
use crate::terrain::{HeightField, TerrainGrid, TerrainVertex};

use super::config::SceneConfig;

pub struct SceneContext {
    height_field: HeightField,
    grid: TerrainGrid,
    camera: DampedOrbitCamera<SphericalOrbitControls>,
    lens: Perspective,
    lights: LightRig,
    mouse: MouseState,
    viewport: (u32, u32),
}

impl SceneContext {
    /// Build the scene: validate the terrain and camera settings, elevate the
    /// grid once and place the camera.
    pub fn new(config: &SceneConfig) -> Result<Self> {
        config.terrain.validate()?;
        let height_field = HeightField::new(config.terrain.terrain_config())?;

        let mut grid = TerrainGrid::new(height_field.config().size, config.terrain.segments);
        height_field.apply_to(&mut grid);

        // Pan speed scales with the lens, so keep the two in agreement
        let mut controls_config = config.controls;
        controls_config.fov_y_degrees = config.camera.lens.fov_y_degrees as f64;

        let mut camera = DampedOrbitCamera::new(
            config.camera.position(),
            config.camera.target(),
            config.camera.limits,
            SphericalOrbitControls::new(controls_config),
        )?;

        let viewport = (config.window.width, config.window.height);
        let mut lens = config.camera.lens;
        lens.resize(viewport.0, viewport.1);
        camera.controls_mut().resize(viewport.0, viewport.1);

        info!(
            size = height_field.config().size,
            segments = grid.segments(),
            distance = camera.distance(),
            "Scene ready"
        );

        Ok(Self {
            height_field,
            grid,
            camera,
            lens,
            lights: config.lights,
            mouse: MouseState::new(),
            viewport,
        })
    }

    /// Advance the camera by one frame.
    pub fn update(&mut self, dt: f64) -> ZoomTick {
        self.camera.update(dt)
    }

    pub fn handle_zoom(&mut self, input: ZoomInput) {
        self.camera.on_zoom_input(input);
    }

    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.mouse.set_button(button, pressed);
        self.camera.controls_mut().handle_button(button, pressed);
    }

    pub fn handle_cursor_moved(&mut self, x: f64, y: f64) {
        self.mouse.set_position(x, y);
        self.camera.controls_mut().handle_pointer_move(x, y);
    }

    pub fn handle_cursor_entered(&mut self) {
        self.mouse.enter_window();
    }

    /// Pointer left the window: end any drag in progress.
    pub fn handle_cursor_left(&mut self) {
        self.mouse.leave_window();
        let controls = self.camera.controls_mut();
        controls.handle_button(MouseButton::Left, false);
        controls.handle_button(MouseButton::Right, false);
    }

    /// Track a new viewport size. Zero sizes (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.lens.resize(width, height);
        self.camera.controls_mut().resize(width, height);
    }

    /// Uniforms for the current camera pose and lights.
    pub fn uniforms(&self) -> TerrainUniforms {
        let eye = self.camera.position();
        let mut uniforms = TerrainUniforms::default();
        uniforms.set_camera(self.lens.view_projection(eye, self.camera.target()), eye.as_vec3().to_array());
        uniforms.set_lights(&self.lights);
        uniforms
    }

    /// GPU vertices of the elevated terrain, tinted relative to its peak.
    pub fn terrain_vertices(&self) -> Vec<TerrainVertex> {
        self.grid.vertices(self.grid.peak())
    }

    pub fn terrain_indices(&self) -> &[u32] {
        self.grid.indices()
    }

    pub fn camera(&self) -> &DampedOrbitCamera<SphericalOrbitControls> {
        &self.camera
    }

    pub fn height_field(&self) -> &HeightField {
        &self.height_field
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn lens(&self) -> &Perspective {
        &self.lens
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::ZoomState;
    use crate::error::SceneError;
    use crate::terrain::ElevationMesh;

    fn small_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.terrain.size = 1000.0;
        config.terrain.segments = 20;
        config
    }

    #[test]
    fn test_terrain_is_elevated_once() {
        let scene = SceneContext::new(&small_config()).unwrap();
        let grid = scene.grid();
        for i in 0..grid.vertex_count() {
            let (x, y) = grid.planar(i);
            assert_eq!(grid.elevation(i), scene.height_field().elevation(x, y));
        }
        assert!(grid.peak() > 0.0);
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let mut config = small_config();
        config.camera.limits.min_distance = 500.0;
        config.camera.limits.max_distance = 100.0;
        assert!(SceneContext::new(&config).is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let mut config = small_config();
        config.terrain.segments = 70_000;
        assert!(matches!(SceneContext::new(&config), Err(SceneError::InvalidTerrain(_))));
    }

    #[test]
    fn test_wheel_then_update_zooms() {
        let mut scene = SceneContext::new(&small_config()).unwrap();
        let start = scene.camera().distance();
        scene.handle_zoom(ZoomInput::Out);
        assert!(matches!(scene.camera().zoom_state(), ZoomState::Targeting(_)));
        assert_eq!(scene.update(1.0 / 60.0), ZoomTick::Stepped);
        assert!(scene.camera().distance() > start);
    }

    #[test]
    fn test_resize_updates_lens() {
        let mut scene = SceneContext::new(&small_config()).unwrap();
        scene.resize(800, 800);
        assert_eq!(scene.lens().aspect, 1.0);
        scene.resize(0, 600);
        assert_eq!(scene.viewport(), (800, 800));
    }

    #[test]
    fn test_cursor_leave_ends_drag() {
        let mut scene = SceneContext::new(&small_config()).unwrap();
        scene.handle_cursor_entered();
        scene.handle_mouse_button(MouseButton::Left, true);
        assert!(scene.mouse().is_orbiting());
        assert!(scene.camera().controls().is_active());

        scene.handle_cursor_left();
        assert!(!scene.mouse().is_orbiting());
        assert!(!scene.camera().controls().is_active());
    }

    #[test]
    fn test_uniforms_track_camera() {
        let scene = SceneContext::new(&small_config()).unwrap();
        let uniforms = scene.uniforms();
        assert_eq!(uniforms.camera_pos, scene.camera().position().as_vec3().to_array());
        assert_eq!(scene.terrain_vertices().len(), scene.grid().vertex_count());
    }
}
