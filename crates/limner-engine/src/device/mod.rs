//! GPU presentation for the window backend.
//!
//! The raster backend draws on the CPU; this module only owns the wgpu
//! device and surface and blits the finished canvas to the window.

mod gpu;
mod present;

pub use gpu::{Gpu, GpuInit, PresentOutcome};
pub use present::Presenter;
