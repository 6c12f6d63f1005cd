use super::types::{InputNotification, KeyCode, MouseButton};

/// Current input state as seen by the sketch.
///
/// Pointer coordinates are canvas pixels. The previous pointer position is
/// kept so sketches can compute motion between events.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Last key value (`CODED` for non-character keys).
    pub key: char,

    /// Last reported key code; printable keys do not clear it.
    pub key_code: Option<KeyCode>,

    pub mouse_x: f32,
    pub mouse_y: f32,
    pub pmouse_x: f32,
    pub pmouse_y: f32,

    /// Last button reported by a press or release.
    pub mouse_button: Option<MouseButton>,

    pub mouse_pressed: bool,
    pub key_pressed: bool,
}

impl InputState {
    pub fn update_key(&mut self, key: char, code: Option<KeyCode>) {
        self.key = key;
        if let Some(code) = code {
            self.key_code = Some(code);
        }
    }

    pub fn update_pointer(&mut self, x: f32, y: f32, button: Option<MouseButton>) {
        self.pmouse_x = self.mouse_x;
        self.pmouse_y = self.mouse_y;
        self.mouse_x = x;
        self.mouse_y = y;
        if let Some(button) = button {
            self.mouse_button = Some(button);
        }
    }

    /// Tracks held state from press/release notifications.
    pub fn apply_notification(&mut self, n: InputNotification) {
        match n {
            InputNotification::KeyPressed => self.key_pressed = true,
            InputNotification::KeyReleased => self.key_pressed = false,
            InputNotification::MousePressed => self.mouse_pressed = true,
            InputNotification::MouseReleased => self.mouse_pressed = false,
            InputNotification::MouseClicked
            | InputNotification::MouseMoved
            | InputNotification::MouseDragged => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_update_shifts_previous_position() {
        let mut s = InputState::default();
        s.update_pointer(10.0, 20.0, None);
        s.update_pointer(15.0, 25.0, Some(MouseButton::Left));
        assert_eq!((s.pmouse_x, s.pmouse_y), (10.0, 20.0));
        assert_eq!((s.mouse_x, s.mouse_y), (15.0, 25.0));
        assert_eq!(s.mouse_button, Some(MouseButton::Left));
    }

    #[test]
    fn motion_without_button_keeps_last_button() {
        let mut s = InputState::default();
        s.update_pointer(0.0, 0.0, Some(MouseButton::Right));
        s.update_pointer(1.0, 1.0, None);
        assert_eq!(s.mouse_button, Some(MouseButton::Right));
    }

    #[test]
    fn printable_key_keeps_previous_code() {
        let mut s = InputState::default();
        s.update_key(super::super::CODED, Some(KeyCode::Up));
        s.update_key('a', None);
        assert_eq!(s.key, 'a');
        assert_eq!(s.key_code, Some(KeyCode::Up));
    }

    #[test]
    fn press_release_tracks_held_flags() {
        let mut s = InputState::default();
        s.apply_notification(InputNotification::MousePressed);
        assert!(s.mouse_pressed);
        s.apply_notification(InputNotification::MouseClicked);
        assert!(s.mouse_pressed);
        s.apply_notification(InputNotification::MouseReleased);
        assert!(!s.mouse_pressed);
    }
}
