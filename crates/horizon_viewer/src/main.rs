mod display;

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use display::{Display, Hud};
use horizon_renderer::{draw_disk_outline, DragEvent, HorizonConfig, MouseButton, Session};
use serde::Deserialize;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const SCREENSHOT_PATH: &str = "frame.png";

/// Viewer settings: the session config plus window options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct ViewerConfig {
    #[serde(flatten)]
    horizon: HorizonConfig,
    /// Integer upscale from frame pixels to window pixels
    window_scale: u32,
    /// Render each batch of rows on the rayon pool
    parallel: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            horizon: HorizonConfig::default(),
            window_scale: 4,
            parallel: false,
        }
    }
}

impl ViewerConfig {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Window size in physical pixels: the frame scaled by `window_scale`.
    fn window_size(&self) -> Result<(u32, u32)> {
        anyhow::ensure!(self.window_scale > 0, "window_scale must be at least 1");
        let render = &self.horizon.render;
        let scaled = |n: u32| {
            n.checked_mul(self.window_scale).with_context(|| {
                format!(
                    "window of {}x{} at scale {} overflows",
                    render.width, render.height, self.window_scale
                )
            })
        };
        Ok((scaled(render.width)?, scaled(render.height)?))
    }
}

fn to_mouse_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Primary,
        winit::event::MouseButton::Right => MouseButton::Secondary,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

/// Application state
struct App {
    window: Option<Arc<Window>>,
    display: Option<Display>,
    session: Session,
    window_size: (u32, u32),

    // Input state
    last_mouse_pos: Option<(f64, f64)>,
    show_outline: bool,
    needs_upload: bool,
    last_frame_time: Instant,
}

impl App {
    fn new(session: Session, window_size: (u32, u32)) -> Self {
        Self {
            window: None,
            display: None,
            session,
            window_size,
            last_mouse_pos: None,
            show_outline: false,
            needs_upload: true,
            last_frame_time: Instant::now(),
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let frame = self.session.frame();
        let (width, height) = (frame.width, frame.height);

        let window_attrs = Window::default_attributes()
            .with_title("Black Hole Simulation")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.window_size.0,
                self.window_size.1,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        // Initialize display (async in pollster block)
        let display = pollster::block_on(Display::new(window.clone(), width, height))?;

        self.window = Some(window);
        self.display = Some(display);
        self.needs_upload = true;
        Ok(())
    }

    fn hud(&self) -> Hud {
        let renderer = self.session.renderer();
        let status = if renderer.is_active() {
            format!("Scanning {:.0}%", renderer.progress() * 100.0)
        } else {
            "Complete".to_string()
        };
        Hud {
            camera: self.session.camera().label(),
            status,
        }
    }

    fn upload_frame(&self) {
        let Some(display) = &self.display else {
            return;
        };

        if self.show_outline {
            let mut image = self.session.frame().clone();
            draw_disk_outline(&mut image, self.session.camera(), self.session.renderer().scene());
            display.upload(&image);
        } else {
            display.upload(self.session.frame());
        }
    }

    fn save_screenshot(&self) {
        match self.session.frame().save_png(SCREENSHOT_PATH) {
            Ok(()) => log::info!("Saved frame to {}", SCREENSHOT_PATH),
            Err(e) => log::error!("Failed to save frame: {}", e),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Calculate delta time
        let now = Instant::now();
        let delta_time = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        if self.session.advance(delta_time) {
            self.needs_upload = true;
        }
        if self.needs_upload {
            self.upload_frame();
            self.needs_upload = false;
        }

        let hud = self.hud();
        if let (Some(display), Some(window)) = (&mut self.display, &self.window) {
            if let Err(e) = display.render(window, &hud) {
                // Check if it's a surface error we can handle
                if let Some(surface_err) = e.downcast_ref::<wgpu::SurfaceError>() {
                    match surface_err {
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                            display.resize(display.size);
                        }
                        wgpu::SurfaceError::OutOfMemory => {
                            log::error!("Out of memory!");
                            event_loop.exit();
                        }
                        _ => {
                            log::error!("Surface error: {:?}", surface_err);
                        }
                    }
                } else {
                    log::error!("Render error: {:?}", e);
                }
            }
        }

        // Request next frame
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match self.create_window(event_loop) {
                Ok(()) => log::info!("Window and display initialized"),
                Err(e) => {
                    log::error!("Failed to initialize window: {:?}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui see the event first; the HUD never captures input
        if let (Some(display), Some(window)) = (&mut self.display, &self.window) {
            display.handle_egui_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(display) = &mut self.display {
                    display.resize((physical_size.width, physical_size.height));
                    log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let button = to_mouse_button(button);
                let event = match state {
                    ElementState::Pressed => DragEvent::Press { button },
                    ElementState::Released => DragEvent::Release { button },
                };
                self.session.handle_event(event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.last_mouse_pos {
                    self.session.handle_event(DragEvent::Motion {
                        dx: (position.x - last_x) as f32,
                        dy: (position.y - last_y) as f32,
                    });
                }
                self.last_mouse_pos = Some((position.x, position.y));
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_mouse_pos = None;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match keycode {
                KeyCode::KeyR => {
                    self.show_outline = !self.show_outline;
                    self.needs_upload = true;
                }
                KeyCode::KeyP => self.save_screenshot(),
                KeyCode::Escape => event_loop.exit(),
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Starting Horizon viewer");

    let config = match std::env::args_os().nth(1) {
        Some(path) => ViewerConfig::load(Path::new(&path))?,
        None => ViewerConfig::default(),
    };
    let window_size = config.window_size()?;

    let session = Session::new(&config.horizon)?.with_parallel(config.parallel);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(session, window_size);

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    Ok(())
}
