//! Coordinate, color and geometry value types shared by the API and backends.
//!
//! Canonical canvas space:
//! - pixels, origin top-left
//! - +X right, +Y down, +Z towards the viewer
//!
//! Points and matrices are `glam` types; this module only adds what glam
//! does not model (colors, anchored rectangles, the canvas viewport).

mod color;
mod rect;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use viewport::Viewport;

pub use glam::{Mat4, Vec2, Vec3};
