//! Valley - Terrain Viewer
//!
//! Procedural valley terrain under an orbit camera with damped wheel zoom.
//!
//! Run with: `cargo run --bin valley [scene.json]`
//!
//! Controls:
//! - Left mouse drag: Orbit
//! - Right mouse drag: Pan
//! - Scroll wheel: Zoom (eased)
//! - ESC: Exit

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use tracing::{error, info, warn};

use valley_engine::error::Result;
use valley_engine::game::{SceneConfig, SceneContext};
use valley_engine::input::{MouseButton, ScrollDelta, ZoomInput};
use valley_engine::render::{GpuContext, GpuContextConfig, TerrainPass};

/// Events delivered back to the event loop from outside winit.
enum AppEvent {
    /// GPU setup finished (asynchronously on wasm32)
    GpuReady(Result<GpuContext>),
}

/// GPU context plus the terrain pass drawing into it.
struct Renderer {
    gpu: GpuContext,
    pass: TerrainPass,
}

impl Renderer {
    fn new(gpu: GpuContext, scene: &SceneContext) -> Self {
        let mut pass = TerrainPass::new(&gpu.device, gpu.format());
        pass.upload_mesh(&gpu.device, &scene.terrain_vertices(), scene.terrain_indices());
        Self { gpu, pass }
    }
}

struct ValleyApp {
    config: SceneConfig,
    scene: SceneContext,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    proxy: EventLoopProxy<AppEvent>,
    last_frame: f64,
}

impl ValleyApp {
    fn new(config: SceneConfig, proxy: EventLoopProxy<AppEvent>) -> Result<Self> {
        let scene = SceneContext::new(&config)?;
        Ok(Self {
            config,
            scene,
            window: None,
            renderer: None,
            proxy,
            last_frame: now_seconds(),
        })
    }

    fn window_attributes(&self) -> WindowAttributes {
        let attrs = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));

        #[cfg(target_arch = "wasm32")]
        let attrs = {
            use winit::platform::web::WindowAttributesExtWebSys;
            attrs.with_canvas(web::mount_canvas())
        };

        attrs
    }

    /// Start GPU setup for `window`; the result arrives as [`AppEvent::GpuReady`].
    fn request_gpu(&self, window: Arc<Window>) {
        let gpu_config = GpuContextConfig {
            vsync: self.config.window.vsync,
            ..GpuContextConfig::default()
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            let result = GpuContext::new(window, gpu_config);
            if self.proxy.send_event(AppEvent::GpuReady(result)).is_err() {
                warn!("Event loop closed before the GPU was ready");
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = GpuContext::request(window, gpu_config).await;
                if proxy.send_event(AppEvent::GpuReady(result)).is_err() {
                    warn!("Event loop closed before the GPU was ready");
                }
            });
        }
    }

    fn render(&self) {
        let Some(renderer) = &self.renderer else {
            return;
        };

        renderer.pass.upload_uniforms(&renderer.gpu.queue, &self.scene.uniforms());
        match renderer.pass.render(&renderer.gpu) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                renderer.gpu.reconfigure();
            }
            Err(e) => warn!(error = ?e, "Render error"),
        }
    }
}

fn map_button(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Other(3),
        WinitMouseButton::Forward => MouseButton::Other(4),
        WinitMouseButton::Other(id) => MouseButton::Other(id),
    }
}

impl ApplicationHandler<AppEvent> for ValleyApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(self.window_attributes()) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.scene.resize(size.width, size.height);
        self.window = Some(Arc::clone(&window));
        self.request_gpu(window);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::GpuReady(Ok(gpu)) => {
                self.renderer = Some(Renderer::new(gpu, &self.scene));
                info!(indices = self.scene.terrain_indices().len(), "Terrain uploaded");
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            AppEvent::GpuReady(Err(e)) => {
                error!(error = %e, "GPU initialization failed");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                    && event.state == ElementState::Pressed
                {
                    event_loop.exit();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.scene
                    .handle_mouse_button(map_button(button), state == ElementState::Pressed);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.scene.handle_cursor_moved(position.x, position.y);
            }

            WindowEvent::CursorEntered { .. } => self.scene.handle_cursor_entered(),
            WindowEvent::CursorLeft { .. } => self.scene.handle_cursor_left(),

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => ScrollDelta::from_lines(x as f64, y as f64),
                    MouseScrollDelta::PixelDelta(pos) => ScrollDelta::from_pixels(pos.x, pos.y),
                };
                self.scene.handle_zoom(ZoomInput::from_scroll(scroll));
            }

            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.gpu.resize(new_size.width, new_size.height);
                }
                self.scene.resize(new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => {
                let now = now_seconds();
                let delta_time = now - self.last_frame;
                self.last_frame = now;

                self.scene.update(delta_time);
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Monotonic seconds since the first call.
#[cfg(not(target_arch = "wasm32"))]
fn now_seconds() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_secs_f64()
}

/// Page-relative seconds from the browser's high-resolution clock.
#[cfg(target_arch = "wasm32")]
fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or(0.0, |p| p.now() / 1000.0)
}

// ============================================================================
// MAIN
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install log subscriber: {e}");
    }

    println!("===========================================");
    println!("   Valley - Terrain Viewer");
    println!("===========================================");
    println!();
    println!("Controls:");
    println!("  Left mouse drag: Orbit");
    println!("  Right mouse drag: Pan");
    println!("  Scroll wheel: Zoom");
    println!("  ESC: Exit");
    println!();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| valley_engine::game::DEFAULT_CONFIG_PATH.to_string());

    if let Err(e) = run(&path) {
        error!(error = %e, "Valley exited with an error");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(config_path: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = SceneConfig::load(config_path)?;
    preload_models(&config);

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ValleyApp::new(config, event_loop.create_proxy())?;
    event_loop.run_app(&mut app)?;
    Ok(())
}

/// Read the configured characters' model files up front. Missing files are
/// logged by the catalog and do not stop the viewer.
#[cfg(not(target_arch = "wasm32"))]
fn preload_models(config: &SceneConfig) {
    use valley_engine::game::ModelCache;

    let mut cache: ModelCache<Arc<[u8]>> = ModelCache::new();
    let characters = config
        .models
        .preload_all(&mut cache, |path: &str| std::fs::read(path).map(Arc::<[u8]>::from));

    let bytes: usize = characters
        .values()
        .map(|c| c.model.len() + c.animations.values().map(|clip| clip.len()).sum::<usize>())
        .sum();
    info!(characters = characters.len(), files = cache.len(), bytes, "Model assets loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use super::*;

    /// Create the render canvas inside `#app` (falling back to `<body>`).
    pub fn mount_canvas() -> Option<HtmlCanvasElement> {
        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        let parent = document
            .get_element_by_id("app")
            .or_else(|| document.body().map(Into::into))?;
        parent.append_child(&canvas).ok()?;
        Some(canvas)
    }

    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        use winit::platform::web::EventLoopExtWebSys;

        console_error_panic_hook::set_once();

        let event_loop = match EventLoop::<AppEvent>::with_user_event().build() {
            Ok(event_loop) => event_loop,
            Err(e) => {
                error!(error = %e, "Failed to create event loop");
                return;
            }
        };
        event_loop.set_control_flow(ControlFlow::Poll);

        // Browsers have no config file; the defaults describe the scene
        match ValleyApp::new(SceneConfig::default(), event_loop.create_proxy()) {
            Ok(app) => event_loop.spawn_app(app),
            Err(e) => error!(error = %e, "Failed to build scene"),
        }
    }
}
