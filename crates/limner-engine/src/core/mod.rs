//! Sketch-facing surface of the engine.
//!
//! - `Sketch`: the callbacks a host program supplies
//! - `Graphics`: the drawing API those callbacks receive
//! - `Processor`: owns all drawing state and runs callbacks on behalf of a
//!   main loop

mod graphics;
mod processor;
mod sketch;

pub use graphics::Graphics;
pub use processor::Processor;
pub use sketch::{Callback, Sketch};
