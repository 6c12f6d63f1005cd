//! Limner engine crate.
//!
//! Immediate-mode sketch runtime: a sketch supplies `setup`/`draw`
//! callbacks, draws through `Graphics`, and a backend chosen at launch
//! renders and presents the result.
//!
//! ```no_run
//! use limner_engine::prelude::*;
//!
//! let sketch = Sketch::new().setup(|g| {
//!     g.size(200, 200)?;
//!     g.fill(ColorRgba::new(1.0, 0.5, 0.0, 1.0));
//!     g.rect(50.0, 50.0, 100.0, 100.0)
//! });
//! launch(sketch, LaunchConfig::default()).unwrap();
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod coords;
pub mod core;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod scheduler;
pub mod shape;
pub mod time;
pub mod window;

mod launch;

pub use launch::{launch, launch_with};

/// The names a sketch usually needs.
pub mod prelude {
    pub use crate::config::LaunchConfig;
    pub use crate::context::AnchorMode;
    pub use crate::coords::{ColorRgba, Mat4, Vec2, Vec3};
    pub use crate::core::{Graphics, Sketch};
    pub use crate::error::{DrawError, DrawResult};
    pub use crate::input::{CursorKind, KeyCode, MouseButton, CODED};
    pub use crate::render::Image;
    pub use crate::shape::{CloseMode, ShapeKind};
    pub use crate::{launch, launch_with};
}
