use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use progressive_tracer::cli::Cli;
use progressive_tracer::config::Config;
use progressive_tracer::core::{Clock, WinitController};
use progressive_tracer::renderer::RayTracer;
use progressive_tracer::screenshot::PngSink;
use progressive_tracer::session::{LoopControl, Session};
use progressive_tracer::uniforms::SeedSource;

struct App {
    config: Config,
    window: Option<Arc<Window>>,
    raytracer: Option<RayTracer>,
    controller: WinitController,
    session: Session,
    sink: PngSink,
    clock: Clock,
    cursor_grabbed: bool,
}

impl App {
    fn new(config: Config) -> Self {
        let session = Session::new(&config, SeedSource::from_entropy());
        let sink = PngSink::new(config.screenshot_dir.clone());
        Self {
            config,
            window: None,
            raytracer: None,
            controller: WinitController::new(),
            session,
            sink,
            clock: Clock::new(),
            cursor_grabbed: false,
        }
    }

    /// Make the OS cursor follow the controller's capture state
    fn sync_cursor(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let want = self.controller.is_captured();
        if want == self.cursor_grabbed {
            return;
        }

        if want {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                warn!("Cursor grab unavailable: {e}");
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                warn!("Failed to release cursor: {e}");
            }
            window.set_cursor_visible(true);
        }
        self.cursor_grabbed = want;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        let input = self.controller.take_snapshot();

        let Some(raytracer) = &mut self.raytracer else {
            return;
        };
        if self.session.step(&input, delta, raytracer, &mut self.sink) == LoopControl::Exit {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let raytracer = match pollster::block_on(RayTracer::new(window.clone(), &self.config)) {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to initialize ray tracer: {e:#}");
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);
        self.raytracer = Some(raytracer);
        self.sync_cursor();
        self.clock.reset();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(raytracer) = &mut self.raytracer {
            raytracer.handle_event(&event);
        }
        self.controller.process_event(&event);
        self.sync_cursor();

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(raytracer) = &mut self.raytracer {
                    raytracer.resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        self.controller.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    match &cli.config {
        Some(path) => info!("Preset {:?} with overrides from {}", cli.preset, path.display()),
        None => info!("Preset {:?}", cli.preset),
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(config);

    info!("Controls: WASD move, Space/Shift up/down, F5 pause, Ctrl+F frame mode, Enter step, F12 screenshot, Escape quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
