use std::sync::Arc;

use anyhow::Context;
use camp_view::cli::Cli;
use camp_view::core::{Command, InputAdapter, SurfaceRenderer};
use camp_view::frame::{FpsMeter, FrameIterator};
use camp_view::renderer::Viewport;
use camp_view::scenes::SceneBuilder;
use camp_view::{Session, SlotId};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

// === Application ===

struct App {
    cli: Cli,
    session: Session,
    window: Option<Arc<Window>>,
    renderer: Option<SurfaceRenderer>,
    viewport: Viewport,
    input: InputAdapter,
    frames: FrameIterator,
    fps: FpsMeter,
    /// Host-side pointer grab currently in effect
    grabbed: bool,
}

impl App {
    fn new(cli: Cli, session: Session) -> Self {
        let (width, height) = cli.frame_size(cli.width, cli.height);
        Self {
            cli,
            session,
            window: None,
            renderer: None,
            viewport: Viewport::new(width, height),
            input: InputAdapter::new(),
            frames: FrameIterator::new(),
            fps: FpsMeter::default(),
            grabbed: false,
        }
    }

    fn handle_command(&mut self, event_loop: &ActiveEventLoop, command: Command) {
        if command == Command::Escape && !self.session.is_capturing() {
            event_loop.exit();
            return;
        }
        if command == Command::Escape {
            self.release_grab();
        }
        if let Err(e) = self.session.apply(command) {
            log::warn!("{}", e);
        }
        self.sync_pointer();
    }

    /// Carry out pointer grab requests from the session and report back
    fn sync_pointer(&mut self) {
        while let Some(grab) = self.session.take_pointer_request() {
            let result = if grab {
                match self.try_grab() {
                    Ok(()) => self.session.pointer_lock_granted(),
                    Err(e) => {
                        log::warn!("pointer capture refused: {}", e);
                        self.session.pointer_lock_denied()
                    }
                }
            } else {
                self.release_grab();
                Ok(())
            };
            if let Err(e) = result {
                log::warn!("{}", e);
            }
        }
        self.refresh_title();
    }

    fn try_grab(&mut self) -> Result<(), winit::error::ExternalError> {
        let Some(window) = &self.window else {
            return Err(winit::error::ExternalError::Ignored);
        };
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))?;
        window.set_cursor_visible(false);
        self.grabbed = true;
        Ok(())
    }

    fn release_grab(&mut self) {
        if !self.grabbed {
            return;
        }
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                log::warn!("failed to release pointer: {}", e);
            }
            window.set_cursor_visible(true);
        }
        self.grabbed = false;
    }

    fn refresh_title(&mut self) {
        let events = self.session.drain_view_events();
        if events.is_empty() {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&title_for(self.session.active_slot()));
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (frame_width, frame_height) = self.cli.frame_size(width, height);
        self.viewport.resize(frame_width, frame_height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize_surface(width, height);
            renderer.resize_frame(frame_width, frame_height);
        }
    }

    fn redraw(&mut self) {
        if let Some(frame) = self.frames.next() {
            if let Some(fps) = self.fps.tick(frame.delta) {
                log::info!("FPS: {:.1}", fps);
            }
            self.session.animate(frame.time);
        }

        self.session.frame();

        let Some(renderer) = &self.renderer else {
            return;
        };
        let pixels = self.viewport.render(self.session.scene(), self.session.active_camera());
        if let Err(e) = renderer.present(pixels) {
            log::error!("Render error: {}", e);
        }
    }
}

fn title_for(slot: SlotId) -> String {
    format!("Camp View - {} view", slot)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(title_for(self.session.active_slot()))
                .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let (frame_width, frame_height) = self.cli.frame_size(size.width, size.height);
        let renderer = match SurfaceRenderer::new(window.clone(), frame_width, frame_height) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.viewport.resize(frame_width, frame_height);
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(command) = self.input.window_event(&event) {
            self.handle_command(event_loop, command);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(false) if self.grabbed => {
                self.release_grab();
                if let Err(e) = self.session.pointer_lock_released() {
                    log::warn!("{}", e);
                }
                self.refresh_title();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn device_event(&mut self, event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if !self.grabbed {
            return;
        }
        if let Some(command) = self.input.device_event(&event) {
            self.handle_command(event_loop, command);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.scene_config()?;
    if cli.dump_scene {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }

    let setup = SceneBuilder::build(&config).context("Failed to build scene")?;
    let session = Session::from_setup(setup, cli.sensitivity);

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli, session);

    log::info!("Controls: WASD/arrows move, 1-4 switch camera, R reset, drag to orbit, Escape to release/quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
