//! Main loops.
//!
//! `run_windowed` drives a processor from a winit event loop and presents
//! the raster canvas through wgpu; `run_headless` paces it with plain
//! sleeps and presents nothing.

mod headless;
mod runtime;

pub use headless::run_headless;
pub use runtime::run_windowed;
