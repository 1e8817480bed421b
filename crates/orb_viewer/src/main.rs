mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use orb_core::{load_scene, CameraSettings, Scene, SceneDescription};
use orb_renderer::{render_image, Camera, RenderConfig};
use orb_viewport::{InputEvent, Key, LoopState, RenderContext, TextureSurface, ViewState};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cli::Args;

/// Application state
struct App {
    width: usize,
    height: usize,
    config: RenderConfig,
    /// Taken when the window opens
    view: Option<ViewState>,
    window: Option<Arc<Window>>,
    context: Option<RenderContext<TextureSurface>>,
    /// Input received since the last frame
    pending: Vec<InputEvent>,
    /// First fatal error, reported when the event loop returns
    error: Option<anyhow::Error>,
}

impl App {
    fn new(view: ViewState, width: usize, height: usize, config: RenderConfig) -> Self {
        Self {
            width,
            height,
            config,
            view: Some(view),
            window: None,
            context: None,
            pending: Vec::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(view) = self.view.take() else {
            return Ok(());
        };

        let window_attrs = Window::default_attributes()
            .with_title("Orb Viewer")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.width as u32,
                self.height as u32,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let surface = pollster::block_on(TextureSurface::new(window.clone()))
            .context("Failed to initialize GPU surface")?;
        let context = RenderContext::new(view, self.width, self.height, self.config, surface)?;

        self.window = Some(window);
        self.context = Some(context);
        log::info!("Window and render loop initialized");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.pending.push(InputEvent::Quit);
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(context) = &mut self.context {
                    if let Some(surface) = context.surface_mut() {
                        surface.resize(physical_size.width, physical_size.height);
                    }
                    context.resize(physical_size.width as usize, physical_size.height as usize);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(input) = decode_key(keycode) {
                    self.pending.push(input);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(context) = &mut self.context else {
                    return;
                };

                match context.tick(self.pending.drain(..)) {
                    Ok(LoopState::Shutdown) => {
                        event_loop.exit();
                        return;
                    }
                    Ok(_) => {}
                    // The frame is dropped; keep running with the previous one on screen
                    Err(e) => log::error!("Frame failed: {:#}", e),
                }

                // Continuous mode: render again as soon as possible
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(context) = &mut self.context {
            context.shutdown();
        }
    }
}

/// Map a physical key to a loop event.
fn decode_key(keycode: KeyCode) -> Option<InputEvent> {
    let key = match keycode {
        KeyCode::Escape => return Some(InputEvent::Quit),
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyO => Key::O,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(InputEvent::KeyDown(key))
}

fn load_view(args: &Args) -> Result<ViewState> {
    let description = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, using the demo scene");
            SceneDescription {
                scene: Scene::demo(),
                camera: CameraSettings::default(),
            }
        }
    };

    let camera = Camera::from_settings(&description.camera).context("Invalid camera settings")?;
    log::info!(
        "Scene has {} spheres, camera at {:?} looking {:?}",
        description.scene.len(),
        camera.position,
        camera.forward()
    );
    Ok(ViewState::new(description.scene, camera))
}

/// Render one frame and write it to `path`.
fn snapshot(view: &ViewState, args: &Args, path: &Path) -> Result<()> {
    let config = args.render_config();
    let framebuffer = render_image(&view.scene, &view.camera, args.width, args.height, &config)
        .context("Render failed")?;
    let image = framebuffer.to_ppm(255.0);

    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        image.save_png(path, config.pack_policy)?;
    } else {
        image.save(path)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Orb Viewer");

    let view = load_view(&args)?;

    if let Some(path) = &args.snapshot {
        return snapshot(&view, &args, path);
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(view, args.width, args.height, args.render_config());

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
