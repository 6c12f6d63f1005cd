//! Time subsystem.
//!
//! Frame pacing that is testable without a runtime: every method takes the
//! current `Instant` instead of reading the clock itself.
//! Intended usage:
//! - one `FramePacer` per sketch
//! - ask `is_due(now)` / `deadline()` to decide when to wake up
//! - call `tick(now)` once per executed draw to obtain `FrameTime`

mod pacer;

pub use pacer::{FramePacer, FrameTime};
