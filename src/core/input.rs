use glam::Vec2;

use super::controller::{Button, Controller};

/// Movement axes resolved from held keys
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveAxes {
    pub strafe: f32,
    pub forward: f32,
    pub vertical: f32,
}

impl MoveAxes {
    /// Opposing keys are summed, so W+S cancels out
    pub fn from_controller(controller: &dyn Controller) -> Self {
        let axis = |positive: Button, negative: Button| {
            controller.is_down(positive) as i32 as f32 - controller.is_down(negative) as i32 as f32
        };

        Self {
            strafe: axis(Button::KeyD, Button::KeyA),
            forward: axis(Button::KeyW, Button::KeyS),
            vertical: axis(Button::Space, Button::Shift),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.strafe == 0.0 && self.forward == 0.0 && self.vertical == 0.0
    }
}

/// Everything one loop iteration needs from the input system.
///
/// Continuous state (axes, pointer delta) is sampled; the flags are
/// edge-triggered and set at most once per snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub movement: MoveAxes,
    /// Pointer delta already oriented for `Camera::add_rotation`
    pub look_delta: Vec2,
    pub toggle_pause: bool,
    pub toggle_step_mode: bool,
    pub step: bool,
    pub screenshot: bool,
    pub quit: bool,
    /// Focus state at snapshot time, set only if it changed since the last one
    pub focus: Option<bool>,
    /// Focus came back at least once since the last snapshot, even if lost again
    pub focus_regained: bool,
    pub cursor_recaptured: bool,
}
