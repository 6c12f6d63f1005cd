//! Renderer contract and helpers shared by backends.
//!
//! The core never talks to a concrete backend: every drawing call goes
//! through the `Renderer` trait object bound at startup.
//!
//! Convention:
//! - Canvas geometry is in pixels (top-left origin, +Y down, +Z toward the viewer).
//! - Angles are radians; colors are straight-alpha `[0, 1]` floats.
//! - Backends convert to whatever their device needs.

mod contract;
mod image;
mod ops;

pub mod tess;
pub mod transform;

pub use contract::{FrameSnapshot, Pass, Primitive, RenderVertex, Renderer, SolidStyle};
pub use image::Image;
pub use ops::RenderOp;
pub use transform::{Ortho, TransformState};
