use std::fmt;

use crate::error::{DrawResult, LogicError};

/// Key value reported together with a `KeyCode` for keys that have no
/// character of their own (arrows, modifiers).
pub const CODED: char = '\u{ffff}';

/// Keys that carry a stable key code.
///
/// Printable keys only update the key character; these variants are the
/// ones a sketch compares `key_code()` against.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeyCode {
    Backspace,
    Tab,
    Enter,
    Return,
    Escape,
    Delete,

    Up,
    Down,
    Left,
    Right,

    Alt,
    Control,
    Shift,
}

impl KeyCode {
    /// Character value that accompanies this code, `CODED` for non-character keys.
    pub fn key_value(self) -> char {
        match self {
            KeyCode::Backspace => '\u{8}',
            KeyCode::Tab => '\t',
            KeyCode::Enter => '\n',
            KeyCode::Return => '\r',
            KeyCode::Escape => '\u{1b}',
            KeyCode::Delete => '\u{7f}',
            _ => CODED,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Center,
    Right,
}

/// Cursor shapes a sketch may request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CursorKind {
    Arrow,
    Cross,
    Hand,
    Move,
    Text,
    Wait,
}

impl TryFrom<i32> for CursorKind {
    type Error = LogicError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CursorKind::Arrow),
            1 => Ok(CursorKind::Cross),
            2 => Ok(CursorKind::Hand),
            3 => Ok(CursorKind::Move),
            4 => Ok(CursorKind::Text),
            5 => Ok(CursorKind::Wait),
            other => Err(LogicError::UnknownCursor(other)),
        }
    }
}

/// Zero-argument event notifications forwarded to sketch callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InputNotification {
    KeyPressed,
    KeyReleased,
    MousePressed,
    MouseReleased,
    MouseClicked,
    MouseMoved,
    MouseDragged,
}

impl fmt::Display for InputNotification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Update hooks the window-system adapter drives.
///
/// `None` for a key code or button means "leave the previous value alone",
/// matching motion events that carry no button information.
pub trait InputSink {
    fn update_key(&mut self, key: char, code: Option<KeyCode>);

    fn update_pointer(&mut self, x: f32, y: f32, button: Option<MouseButton>);

    fn update_size(&mut self, width: u32, height: u32);

    /// Forwards a notification to the sketch. A callback error is fatal.
    fn notify(&mut self, notification: InputNotification) -> DrawResult;

    /// Whether a mouse button is currently held (drag vs. move).
    fn is_mouse_pressed(&self) -> bool;

    /// Last pointer position, reused for button events that carry none.
    fn pointer_position(&self) -> (f32, f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_codes_follow_declaration_order() {
        assert_eq!(CursorKind::try_from(0), Ok(CursorKind::Arrow));
        assert_eq!(CursorKind::try_from(5), Ok(CursorKind::Wait));
        assert_eq!(CursorKind::try_from(6), Err(LogicError::UnknownCursor(6)));
    }

    #[test]
    fn coded_keys_have_no_character() {
        assert_eq!(KeyCode::Up.key_value(), CODED);
        assert_eq!(KeyCode::Shift.key_value(), CODED);
        assert_eq!(KeyCode::Tab.key_value(), '\t');
    }
}
