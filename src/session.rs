use glam::{Vec2, Vec3};
use log::{debug, error, info, warn};

use crate::accumulation::{Accumulator, FramePlan, RenderMode};
use crate::camera::Camera;
use crate::config::{Config, RenderSettings};
use crate::core::{FpsCounter, InputSnapshot};
use crate::traits::{RenderTargetPair, ScreenshotSink};
use crate::uniforms::{SeedSource, ShaderUniforms};

/// What the overlay shows about the running session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStatus {
    pub fps: f32,
    pub frame_count: u32,
    pub position: Vec3,
    pub paused: bool,
    pub step_mode: bool,
    pub mode: RenderMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Owns the camera and accumulation state and runs one loop iteration at a time
pub struct Session {
    camera: Camera,
    accumulator: Accumulator,
    seeds: SeedSource,
    render: RenderSettings,
    viewport: Vec2,
    elapsed: f32,
    fps: FpsCounter,
}

impl Session {
    pub fn new(config: &Config, seeds: SeedSource) -> Self {
        Self {
            camera: Camera::new(&config.camera),
            accumulator: Accumulator::new(),
            seeds,
            render: config.render,
            viewport: Vec2::new(config.window.width as f32, config.window.height as f32),
            elapsed: 0.0,
            fps: FpsCounter::new(),
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            fps: self.fps.fps(),
            frame_count: self.accumulator.frame_count(),
            position: self.camera.position(),
            paused: self.accumulator.is_paused(),
            step_mode: self.accumulator.is_step_mode(),
            mode: self.accumulator.mode(),
        }
    }

    /// Run one iteration: signals, camera, accumulate, screenshot, present.
    ///
    /// Collaborator failures are logged and the loop keeps going; only a quit
    /// request ends it.
    pub fn step(
        &mut self,
        input: &InputSnapshot,
        delta: f32,
        targets: &mut impl RenderTargetPair,
        sink: &mut dyn ScreenshotSink,
    ) -> LoopControl {
        self.elapsed += delta;
        if let Some(fps) = self.fps.tick(delta) {
            debug!("{fps:.1} fps, {} frames accumulated", self.accumulator.frame_count());
        }

        self.apply_signals(input);

        let axes = input.movement;
        self.camera.move_by(axes.strafe, axes.forward, axes.vertical);
        if input.look_delta != Vec2::ZERO {
            self.camera.add_rotation(input.look_delta.x, input.look_delta.y);
        }

        if let Some(plan) = self.accumulator.next_frame(self.camera.pose()) {
            if plan.reset {
                debug!("Accumulation reset");
            }
            let uniforms = self.uniforms_for(&plan);
            if let Err(e) = targets.render(&plan, &uniforms) {
                error!("Render failed: {e:#}");
                self.accumulator.abandon_frame(&plan);
            }
        }

        let displayed = self.accumulator.displayed();

        if input.screenshot {
            let saved = targets.capture(displayed).and_then(|image| sink.save(&image));
            match saved {
                Ok(path) => info!("Screenshot saved to {}", path.display()),
                Err(e) => warn!("Screenshot failed: {e:#}"),
            }
        }

        if let Err(e) = targets.present(displayed, &self.status()) {
            error!("Present failed: {e:#}");
        }

        if input.quit {
            info!("Quit requested");
            LoopControl::Exit
        } else {
            LoopControl::Continue
        }
    }

    fn apply_signals(&mut self, input: &InputSnapshot) {
        if input.toggle_pause {
            let paused = self.accumulator.toggle_pause();
            info!("{}", if paused { "Paused" } else { "Resumed" });
        }
        if input.toggle_step_mode {
            let on = self.accumulator.toggle_step_mode();
            info!("Frame mode {}", if on { "on" } else { "off" });
        }
        if input.step && !self.accumulator.request_step() {
            debug!("Step ignored");
        }
        // A regain can be followed by another loss within one snapshot
        if input.focus_regained {
            self.accumulator.invalidate();
        }
        if let Some(focused) = input.focus {
            self.accumulator.set_focused(focused);
        }
        if input.cursor_recaptured {
            self.accumulator.invalidate();
        }
    }

    fn uniforms_for(&mut self, plan: &FramePlan) -> ShaderUniforms {
        let sample_part = if self.render.accumulate {
            plan.blend_weight()
        } else {
            1.0
        };

        ShaderUniforms::from_camera(
            &self.camera,
            self.render.fov,
            self.viewport,
            sample_part,
            self.render.samples,
            &mut self.seeds,
            self.elapsed,
        )
    }
}
