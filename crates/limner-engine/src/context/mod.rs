//! Drawing state shared by the API, the shape builder and backends.
//!
//! The context is an ordinary value owned by the processor and passed
//! explicitly; tests build as many isolated instances as they need.

mod anchor;
mod drawing;

pub use anchor::{resolve_anchor, AnchorMode};
pub use drawing::{Brush, DrawingContext, DEFAULT_HEIGHT, DEFAULT_WIDTH};
