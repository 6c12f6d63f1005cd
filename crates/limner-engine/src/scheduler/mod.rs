//! Frame scheduler.
//!
//! Decides, for every repaint, whether the sketch's draw callback runs or
//! the cached frame is replayed, and when the next paced frame is due.
//!
//! States:
//! - `Setup`: before `setup` finishes; nothing is drawn or replayed
//! - `Continuous`: draw runs on every paced tick
//! - `SingleShot`: draw ran once and was captured; repaints replay the capture
//!
//! The scheduler never touches a renderer. The processor asks it what to
//! do, does it, and reports back (`end_draw`, `store_capture`).

use std::time::Instant;

use crate::render::FrameSnapshot;
use crate::time::{FramePacer, FrameTime};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LoopState {
    Setup,
    Continuous,
    SingleShot,
}

/// Answer to a repaint request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RedrawAction {
    /// Build a frame: the draw callback, or setup again for sketches
    /// without one. Call `end_draw` afterwards.
    Draw,
    /// Re-display the cached frame.
    Replay,
    /// Nothing to show (still in setup, or hidden).
    Skip,
}

/// What the event loop should do next.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Poll {
    /// Ask the window system for a repaint now.
    Redraw,
    /// Sleep until the next paced frame.
    WaitUntil(Instant),
    /// Nothing scheduled; wait for input or an explicit redraw.
    Idle,
}

#[derive(Debug)]
pub struct Scheduler {
    state: LoopState,
    has_draw: bool,
    wants_loop: bool,
    pacer: FramePacer,
    visible: bool,
    size: (u32, u32),

    cache: Option<FrameSnapshot>,
    redraw_requested: bool,
    tick_pending: bool,
    last_frame: Option<FrameTime>,

    draws: u64,
    replays: u64,
}

impl Scheduler {
    /// `has_draw`: whether the sketch supplied a draw callback. Without one
    /// the sketch starts in `SingleShot` after setup.
    pub fn new(has_draw: bool, frame_rate: f32, size: (u32, u32)) -> Self {
        Self {
            state: LoopState::Setup,
            has_draw,
            wants_loop: true,
            pacer: FramePacer::new(frame_rate),
            visible: true,
            size,
            cache: None,
            redraw_requested: false,
            tick_pending: false,
            last_frame: None,
            draws: 0,
            replays: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn frame_rate(&self) -> f32 {
        self.pacer.rate()
    }

    /// Frames built so far.
    #[inline]
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Cache replays so far.
    #[inline]
    pub fn replays(&self) -> u64 {
        self.replays
    }

    #[inline]
    pub fn cached(&self) -> Option<&FrameSnapshot> {
        self.cache.as_ref()
    }

    /// Timing of the most recent paced frame.
    #[inline]
    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last_frame
    }

    /// Leaves `Setup`. Returns `true` when the frame built by setup must be
    /// captured right away (sketches without a draw callback).
    pub fn finish_setup(&mut self, now: Instant) -> bool {
        if self.state != LoopState::Setup {
            return false;
        }
        self.state = if self.has_draw && self.wants_loop {
            LoopState::Continuous
        } else {
            LoopState::SingleShot
        };
        self.pacer.reset(now);
        let capture = !self.has_draw;
        log::debug!("scheduler: setup finished, entering {:?}", self.state);
        capture
    }

    // ── repaint dispatch ──────────────────────────────────────────────────

    /// Single dispatch point for every repaint, paced or passive.
    pub fn on_redraw_requested(&mut self, now: Instant) -> RedrawAction {
        if !self.visible {
            return RedrawAction::Skip;
        }
        match self.state {
            LoopState::Setup => RedrawAction::Skip,
            LoopState::Continuous => {
                if std::mem::take(&mut self.tick_pending) || self.pacer.is_due(now) {
                    self.last_frame = Some(self.pacer.tick(now));
                }
                self.redraw_requested = false;
                self.draws += 1;
                RedrawAction::Draw
            }
            LoopState::SingleShot => {
                let explicit = std::mem::take(&mut self.redraw_requested);
                if self.needs_build(explicit) {
                    self.last_frame = Some(self.pacer.tick(now));
                    self.draws += 1;
                    RedrawAction::Draw
                } else if self.cache.is_some() {
                    self.replays += 1;
                    RedrawAction::Replay
                } else {
                    RedrawAction::Skip
                }
            }
        }
    }

    /// Whether a single-shot repaint must build a new frame. Without a draw
    /// callback the frame is rebuilt by setup, and only when the cache is
    /// gone; explicit redraws just replay.
    fn needs_build(&self, explicit: bool) -> bool {
        self.cache.is_none() || (self.has_draw && explicit)
    }

    /// Called after the frame is built (draw, or setup for sketches
    /// without draw). `true` means the frame must
    /// be captured and handed back through `store_capture`.
    ///
    /// This includes the draw that switched to `SingleShot` via `no_loop`.
    pub fn end_draw(&self) -> bool {
        self.state == LoopState::SingleShot
    }

    /// Replaces the cached frame. The old one is dropped only once the new
    /// one is in place.
    pub fn store_capture(&mut self, snapshot: FrameSnapshot) {
        drop(self.cache.replace(snapshot));
    }

    /// What the event loop should do now.
    pub fn poll(&mut self, now: Instant) -> Poll {
        if !self.visible {
            return Poll::Idle;
        }
        match self.state {
            LoopState::Setup => Poll::Idle,
            LoopState::Continuous => {
                if self.pacer.is_due(now) {
                    self.tick_pending = true;
                    Poll::Redraw
                } else {
                    match self.pacer.deadline() {
                        Some(deadline) => Poll::WaitUntil(deadline),
                        None => Poll::Redraw,
                    }
                }
            }
            LoopState::SingleShot => {
                if self.needs_build(self.redraw_requested) {
                    Poll::Redraw
                } else {
                    Poll::Idle
                }
            }
        }
    }

    // ── control ───────────────────────────────────────────────────────────

    /// Stops the paced loop. The next draw is captured and later repaints
    /// replay it.
    pub fn no_loop(&mut self) {
        match self.state {
            LoopState::Setup => self.wants_loop = false,
            LoopState::Continuous => {
                self.state = LoopState::SingleShot;
                self.tick_pending = false;
            }
            LoopState::SingleShot => {}
        }
    }

    /// Resumes the paced loop from `now`.
    pub fn start_loop(&mut self, now: Instant) {
        match self.state {
            LoopState::Setup => self.wants_loop = true,
            LoopState::SingleShot if self.has_draw => {
                self.state = LoopState::Continuous;
                self.cache = None;
                self.pacer.reset(now);
            }
            _ => {}
        }
    }

    /// Forces exactly one more draw execution while in `SingleShot`.
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn set_frame_rate(&mut self, rate: f32) -> bool {
        self.pacer.set_rate(rate)
    }

    /// Canvas size changed. Drops the cache so the next repaint redraws.
    /// Returns `false` when the size is unchanged.
    pub fn invalidate(&mut self, width: u32, height: u32) -> bool {
        if self.size == (width, height) {
            return false;
        }
        self.size = (width, height);
        self.cache = None;
        log::debug!("scheduler: canvas now {width}x{height}, frame cache dropped");
        true
    }

    /// Suspends pacing while hidden. On return the deadline is re-anchored to
    /// `now` so missed ticks are not replayed.
    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        if visible && !self.visible {
            self.pacer.reset(now);
        }
        if !visible {
            self.tick_pending = false;
        }
        self.visible = visible;
    }
}
