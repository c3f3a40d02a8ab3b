/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyF,
    Space,
    Shift,
    Control,
    Enter,
    F5,
    F12,
    Escape,
    MouseLeft,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }
    }

    #[test]
    fn test_button_hash() {
        let mut set = HashSet::new();
        set.insert(Button::KeyW);
        set.insert(Button::F5);
        set.insert(Button::KeyW);

        assert!(set.contains(&Button::KeyW));
        assert!(set.contains(&Button::F5));
        assert!(!set.contains(&Button::F12));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::Control, Button::KeyF],
        };

        assert!(controller.is_down(Button::Control));
        assert!(controller.is_down(Button::KeyF));
        assert!(!controller.is_down(Button::Enter));
    }

    #[test]
    fn test_controller_no_keys_pressed() {
        let controller = MockController { pressed: vec![] };

        assert!(!controller.is_down(Button::KeyW));
        assert!(!controller.is_down(Button::MouseLeft));
    }
}
