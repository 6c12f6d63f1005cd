use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

use crate::error::DrawResult;
use crate::input::{InputNotification, InputSink, KeyCode, MouseButton};

/// Translates a winit `WindowEvent` into `InputSink` calls.
///
/// Events that are not part of the input model are ignored. Size changes are
/// handled by the runtime because they also touch the GPU surface.
pub fn dispatch_window_event<S: InputSink>(
    window: &Window,
    event: &WindowEvent,
    sink: &mut S,
) -> DrawResult {
    match event {
        WindowEvent::KeyboardInput { event, .. } => {
            let Some((key, code)) = map_key(&event.logical_key) else {
                return Ok(());
            };
            sink.update_key(key, code);
            match event.state {
                ElementState::Pressed => sink.notify(InputNotification::KeyPressed),
                ElementState::Released => sink.notify(InputNotification::KeyReleased),
            }
        }

        WindowEvent::MouseInput { state, button, .. } => {
            let Some(button) = map_mouse_button(*button) else {
                log::debug!("ignoring unsupported mouse button {button:?}");
                return Ok(());
            };
            let (x, y) = sink.pointer_position();
            sink.update_pointer(x, y, Some(button));
            match state {
                ElementState::Pressed => sink.notify(InputNotification::MousePressed),
                ElementState::Released => {
                    sink.notify(InputNotification::MouseReleased)?;
                    sink.notify(InputNotification::MouseClicked)
                }
            }
        }

        WindowEvent::CursorMoved { position, .. } => {
            let (x, y) = to_logical_f32(window, *position);
            sink.update_pointer(x, y, None);
            if sink.is_mouse_pressed() {
                sink.notify(InputNotification::MouseDragged)
            } else {
                sink.notify(InputNotification::MouseMoved)
            }
        }

        _ => Ok(()),
    }
}

fn to_logical_f32(window: &Window, pos: PhysicalPosition<f64>) -> (f32, f32) {
    let scale = window.scale_factor();
    let logical = pos.to_logical::<f64>(scale);
    (logical.x as f32, logical.y as f32)
}

fn map_mouse_button(b: WinitMouseButton) -> Option<MouseButton> {
    match b {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Middle => Some(MouseButton::Center),
        WinitMouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

/// Maps a logical key to `(key value, key code)`.
///
/// Function and navigation keys without a key code are dropped.
fn map_key(key: &Key) -> Option<(char, Option<KeyCode>)> {
    let coded = |code: KeyCode| Some((code.key_value(), Some(code)));

    match key {
        Key::Named(named) => match named {
            NamedKey::Backspace => coded(KeyCode::Backspace),
            NamedKey::Tab => coded(KeyCode::Tab),
            NamedKey::Enter => coded(KeyCode::Enter),
            NamedKey::Escape => coded(KeyCode::Escape),
            NamedKey::Delete => coded(KeyCode::Delete),

            NamedKey::ArrowUp => coded(KeyCode::Up),
            NamedKey::ArrowDown => coded(KeyCode::Down),
            NamedKey::ArrowLeft => coded(KeyCode::Left),
            NamedKey::ArrowRight => coded(KeyCode::Right),

            NamedKey::Alt => coded(KeyCode::Alt),
            NamedKey::Control => coded(KeyCode::Control),
            NamedKey::Shift => coded(KeyCode::Shift),

            NamedKey::Space => Some((' ', None)),
            _ => None,
        },
        Key::Character(text) => text.chars().next().map(|c| (c, None)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::input::CODED;

    #[test]
    fn arrows_report_coded_value() {
        assert_eq!(
            map_key(&Key::Named(NamedKey::ArrowLeft)),
            Some((CODED, Some(KeyCode::Left)))
        );
    }

    #[test]
    fn characters_carry_no_code() {
        assert_eq!(map_key(&Key::Character("q".into())), Some(('q', None)));
    }

    #[test]
    fn function_keys_are_ignored() {
        assert_eq!(map_key(&Key::Named(NamedKey::F5)), None);
    }

    #[test]
    fn middle_button_maps_to_center() {
        assert_eq!(map_mouse_button(WinitMouseButton::Middle), Some(MouseButton::Center));
        assert_eq!(map_mouse_button(WinitMouseButton::Back), None);
    }
}
