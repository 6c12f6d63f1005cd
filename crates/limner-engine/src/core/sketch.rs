use std::fmt;

use crate::error::DrawResult;
use crate::input::InputNotification;

use super::Graphics;

/// A sketch callback. Returning `Err` stops the sketch.
pub type Callback = Box<dyn FnMut(&mut Graphics<'_>) -> DrawResult>;

/// Callbacks that make up a sketch.
///
/// `setup` is required and runs once. `draw` is optional: without it the
/// frame built by `setup` is captured and shown until the window closes.
/// Input handlers default to no-ops.
///
/// Sketch state lives in the closures; share it between callbacks with
/// `Rc<RefCell<_>>`.
#[derive(Default)]
pub struct Sketch {
    pub(crate) setup: Option<Callback>,
    pub(crate) draw: Option<Callback>,

    key_pressed: Option<Callback>,
    key_released: Option<Callback>,
    mouse_pressed: Option<Callback>,
    mouse_released: Option<Callback>,
    mouse_clicked: Option<Callback>,
    mouse_moved: Option<Callback>,
    mouse_dragged: Option<Callback>,
}

impl fmt::Debug for Sketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sketch")
            .field("setup", &self.setup.is_some())
            .field("draw", &self.draw.is_some())
            .finish_non_exhaustive()
    }
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn setup(mut self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.setup = Some(Box::new(f));
        self
    }

    pub fn draw(mut self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.draw = Some(Box::new(f));
        self
    }

    pub fn on_key_pressed(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::KeyPressed, f)
    }

    pub fn on_key_released(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::KeyReleased, f)
    }

    pub fn on_mouse_pressed(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::MousePressed, f)
    }

    pub fn on_mouse_released(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::MouseReleased, f)
    }

    pub fn on_mouse_clicked(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::MouseClicked, f)
    }

    pub fn on_mouse_moved(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::MouseMoved, f)
    }

    pub fn on_mouse_dragged(self, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        self.on(InputNotification::MouseDragged, f)
    }

    /// Registers the handler for `n`, replacing any previous one.
    pub fn on(mut self, n: InputNotification, f: impl FnMut(&mut Graphics<'_>) -> DrawResult + 'static) -> Self {
        *self.slot(n) = Some(Box::new(f));
        self
    }

    #[inline]
    pub fn has_draw(&self) -> bool {
        self.draw.is_some()
    }

    pub(crate) fn handler(&mut self, n: InputNotification) -> Option<&mut Callback> {
        self.slot(n).as_mut()
    }

    fn slot(&mut self, n: InputNotification) -> &mut Option<Callback> {
        match n {
            InputNotification::KeyPressed => &mut self.key_pressed,
            InputNotification::KeyReleased => &mut self.key_released,
            InputNotification::MousePressed => &mut self.mouse_pressed,
            InputNotification::MouseReleased => &mut self.mouse_released,
            InputNotification::MouseClicked => &mut self.mouse_clicked,
            InputNotification::MouseMoved => &mut self.mouse_moved,
            InputNotification::MouseDragged => &mut self.mouse_dragged,
        }
    }
}
