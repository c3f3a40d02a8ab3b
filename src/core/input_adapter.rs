use std::collections::HashSet;
use glam::Vec2;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};
use super::input::{InputSnapshot, MoveAxes};

/// Adapter that bridges Winit events to the Controller trait and
/// collects per-iteration input into an `InputSnapshot`
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Raw pointer motion since the last snapshot
    mouse_delta: (f32, f32),
    focused: bool,
    captured: bool,
    /// Edge flags gathered since the last snapshot
    pending: InputSnapshot,
}

impl WinitController {
    /// Start focused with the cursor captured
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_delta: (0.0, 0.0),
            focused: true,
            captured: true,
            pending: InputSnapshot::default(),
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Movement and look are only live while focused with the cursor grabbed
    pub fn look_enabled(&self) -> bool {
        self.focused && self.captured
    }

    /// Process a Winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.process_key(event),
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    match state {
                        ElementState::Pressed => {
                            if self.press(btn) && btn == Button::MouseLeft && !self.captured {
                                self.captured = true;
                                self.pending.cursor_recaptured = true;
                            }
                        }
                        ElementState::Released => self.release(btn),
                    }
                }
            }
            WindowEvent::Focused(focused) => self.set_focused(*focused),
            _ => {}
        }
    }

    /// Raw pointer motion, unaffected by cursor clamping at the window edge
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.look_enabled() {
                self.mouse_delta.0 += delta.0 as f32;
                self.mouse_delta.1 += delta.1 as f32;
            }
        }
    }

    fn process_key(&mut self, event: &KeyEvent) {
        let PhysicalKey::Code(keycode) = event.physical_key else {
            return;
        };
        let Some(button) = Self::keycode_to_button(keycode) else {
            return;
        };

        match event.state {
            ElementState::Released => self.release(button),
            ElementState::Pressed => {
                let fresh = self.press(button) && !event.repeat;
                if fresh {
                    self.on_key_down(button);
                }
            }
        }
    }

    fn on_key_down(&mut self, button: Button) {
        match button {
            Button::F5 => self.pending.toggle_pause = true,
            Button::KeyF if self.is_down(Button::Control) => self.pending.toggle_step_mode = true,
            Button::Enter => self.pending.step = true,
            Button::F12 => self.pending.screenshot = true,
            Button::Escape => self.pending.quit = true,
            _ => {}
        }
    }

    fn set_focused(&mut self, focused: bool) {
        if focused == self.focused {
            return;
        }
        self.focused = focused;
        self.pending.focus = Some(focused);
        if focused {
            self.pending.focus_regained = true;
        } else {
            // Release events never arrive for keys held while unfocused
            self.pressed_keys.clear();
            self.mouse_delta = (0.0, 0.0);
            self.captured = false;
        }
    }

    /// Returns true when the button was not already held
    fn press(&mut self, button: Button) -> bool {
        self.pressed_keys.insert(button)
    }

    fn release(&mut self, button: Button) {
        self.pressed_keys.remove(&button);
    }

    /// Drain everything gathered since the previous call.
    ///
    /// The look delta is negated: dragging right turns the view right
    /// under the camera's yaw convention.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let mut snapshot = std::mem::take(&mut self.pending);
        if self.look_enabled() {
            snapshot.movement = MoveAxes::from_controller(&*self);
            snapshot.look_delta = Vec2::new(-self.mouse_delta.0, -self.mouse_delta.1);
        }
        self.mouse_delta = (0.0, 0.0);
        snapshot
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::KeyD => Some(Button::KeyD),
            KeyCode::KeyF => Some(Button::KeyF),
            KeyCode::Space => Some(Button::Space),
            KeyCode::ShiftLeft => Some(Button::Shift),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Button::Control),
            KeyCode::Enter | KeyCode::NumpadEnter => Some(Button::Enter),
            KeyCode::F5 => Some(Button::F5),
            KeyCode::F12 => Some(Button::F12),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }
}
