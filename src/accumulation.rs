use crate::camera::Pose;

/// One of the two ping-pong accumulation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    A,
    B,
}

impl Target {
    pub fn other(self) -> Self {
        match self {
            Target::A => Target::B,
            Target::B => Target::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Target::A => 0,
            Target::B => 1,
        }
    }
}

/// Observable render-loop mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// A new frame is accumulated every loop iteration
    Running,
    /// Nothing is rendered; input still moves the camera
    Paused,
    /// Frames render only on an explicit step trigger
    SteppingArmed,
}

/// What the shading pass must do for one accumulated frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePlan {
    /// Frames blended into the result once this one lands, starting at 1
    pub frame_count: u32,
    /// Holds the previous accumulated result
    pub read: Target,
    /// Receives the blended result; displayed after the swap
    pub write: Target,
    /// True when this frame restarts the running average
    pub reset: bool,
}

impl FramePlan {
    /// Weight of the new sample in the running mean
    pub fn blend_weight(&self) -> f32 {
        1.0 / self.frame_count as f32
    }
}

/// Progressive accumulation state machine.
///
/// Decides per loop iteration whether a frame is rendered, whether it restarts
/// the running average, and which target is read versus written.
#[derive(Debug, Clone)]
pub struct Accumulator {
    frame_count: u32,
    displayed: Target,
    paused: bool,
    step_mode: bool,
    step_requested: bool,
    focused: bool,
    pending_reset: bool,
    last_pose: Option<Pose>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            frame_count: 1,
            displayed: Target::A,
            paused: false,
            step_mode: false,
            step_requested: false,
            focused: true,
            pending_reset: false,
            last_pose: None,
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Target holding the latest accumulated result
    pub fn displayed(&self) -> Target {
        self.displayed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_step_mode(&self) -> bool {
        self.step_mode
    }

    pub fn is_step_requested(&self) -> bool {
        self.step_requested
    }

    pub fn mode(&self) -> RenderMode {
        if self.step_mode {
            RenderMode::SteppingArmed
        } else if self.paused {
            RenderMode::Paused
        } else {
            RenderMode::Running
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn toggle_step_mode(&mut self) -> bool {
        self.step_mode = !self.step_mode;
        if !self.step_mode {
            self.step_requested = false;
        }
        self.step_mode
    }

    /// Arm a single frame. Ignored outside frame-step mode or while a step is
    /// already pending; returns whether the trigger was accepted.
    pub fn request_step(&mut self) -> bool {
        if !self.step_mode || self.step_requested {
            return false;
        }
        self.step_requested = true;
        true
    }

    /// Track surface focus; regaining it restarts accumulation
    pub fn set_focused(&mut self, focused: bool) {
        if focused && !self.focused {
            self.pending_reset = true;
        }
        self.focused = focused;
    }

    /// Force the next rendered frame to restart the average
    pub fn invalidate(&mut self) {
        self.pending_reset = true;
    }

    /// Whether this iteration issues a frame at all
    pub fn should_render(&self) -> bool {
        if self.step_mode {
            self.step_requested
        } else {
            !self.paused
        }
    }

    /// Advance the state machine by one loop iteration.
    ///
    /// Returns `None` when paused or waiting for a step. Otherwise commits the
    /// frame: the counter is updated, a pending step is consumed and the
    /// targets swap, so the returned `write` target is displayed afterwards.
    pub fn next_frame(&mut self, pose: Pose) -> Option<FramePlan> {
        if !self.should_render() {
            return None;
        }

        let reset = self.pending_reset || self.last_pose != Some(pose);
        let frame_count = if reset { 1 } else { self.frame_count + 1 };

        let plan = FramePlan {
            frame_count,
            read: self.displayed,
            write: self.displayed.other(),
            reset,
        };

        self.frame_count = frame_count;
        self.displayed = plan.write;
        self.last_pose = Some(pose);
        self.pending_reset = false;
        self.step_requested = false;

        Some(plan)
    }

    /// Roll back a frame whose render never landed. The previous result stays
    /// displayed and the next frame restarts the average.
    pub fn abandon_frame(&mut self, plan: &FramePlan) {
        self.displayed = plan.read;
        self.pending_reset = true;
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::new()
    }
}
