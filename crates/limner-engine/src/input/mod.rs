//! Input subsystem (the boundary adapter).
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Platform code translates native events into calls on an `InputSink`;
//! the processor implements the sink, updates `InputState` and forwards
//! notifications to the sketch's callbacks.

pub mod platform;

mod state;
mod types;

pub use state::InputState;
pub use types::{CursorKind, InputNotification, InputSink, KeyCode, MouseButton, CODED};
