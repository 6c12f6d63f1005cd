//! Immediate-mode shape builder.
//!
//! `begin` → `vertex`* → `end` buffers one shape, then renders it in two
//! passes through the bound renderer: interior first, outline second.

mod builder;
mod kind;

pub use builder::{FlushReport, ShapeBuilder, Vertex};
pub use kind::{CloseMode, ShapeKind};
