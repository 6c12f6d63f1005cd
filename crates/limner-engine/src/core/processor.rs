use std::time::Instant;

use crate::context::DrawingContext;
use crate::coords::ColorRgba;
use crate::error::{BackendError, DrawError, DrawResult, StartupError};
use crate::input::{InputNotification, InputSink, InputState, KeyCode, MouseButton};
use crate::logging::{ReportLevel, ReportPolicy, Reporter};
use crate::render::{Image, Renderer};
use crate::scheduler::{LoopState, Poll, RedrawAction, Scheduler};
use crate::shape::ShapeBuilder;

use super::{Callback, Graphics, Sketch};

/// Everything a callback can touch, kept apart from the sketch so that a
/// callback can borrow it mutably while it is itself borrowed from the sketch.
struct Core {
    ctx: DrawingContext,
    input: InputState,
    shape: ShapeBuilder,
    backend: Box<dyn Renderer>,
    reporter: Reporter,
    scheduler: Scheduler,
    frame_count: u64,
    /// Fatal error raised outside a callback, returned by the next repaint.
    pending: Option<DrawError>,
}

impl Core {
    fn graphics(&mut self, now: Instant) -> Graphics<'_> {
        Graphics {
            ctx: &mut self.ctx,
            input: &self.input,
            shape: &mut self.shape,
            backend: &mut *self.backend,
            reporter: &mut self.reporter,
            scheduler: &mut self.scheduler,
            frame_count: self.frame_count,
            now,
        }
    }

    fn run(&mut self, name: &str, callback: &mut Callback, now: Instant) -> DrawResult {
        let result = callback(&mut self.graphics(now));
        if self.shape.is_building() {
            self.shape.abort();
            self.reporter.report(
                ReportLevel::Warning,
                format_args!("{name} returned with an open shape; it was discarded"),
            );
        }
        result
    }

    /// Applies the backend error policy outside of a callback.
    fn settle(&mut self, op: &str, e: BackendError) -> DrawResult {
        if self.reporter.report(ReportLevel::Warning, format_args!("{op}: {e}")) {
            Err(DrawError::Backend(e))
        } else {
            Ok(())
        }
    }

    fn capture(&mut self) -> DrawResult {
        match self.backend.capture_frame() {
            Ok(snapshot) => {
                self.scheduler.store_capture(snapshot);
                Ok(())
            }
            Err(e) => self.settle("capture_frame", e),
        }
    }

    fn replay(&mut self) -> DrawResult {
        let Some(snapshot) = self.scheduler.cached() else {
            return Ok(());
        };
        match self.backend.replay_frame(snapshot) {
            Ok(()) => Ok(()),
            Err(e) => self.settle("replay_frame", e),
        }
    }
}

/// Runs a sketch against one renderer.
///
/// Main loops own a `Processor` and drive it with three calls: `start`
/// once, then `poll` to learn when to wake and `on_redraw_requested` for
/// every repaint. Input arrives through the `InputSink` impl.
pub struct Processor {
    sketch: Sketch,
    core: Core,
}

impl Processor {
    pub fn new(sketch: Sketch, ctx: DrawingContext, backend: Box<dyn Renderer>, policy: ReportPolicy) -> Self {
        let scheduler = Scheduler::new(sketch.has_draw(), ctx.frame_rate, (ctx.width, ctx.height));
        Self {
            sketch,
            core: Core {
                ctx,
                input: InputState::default(),
                shape: ShapeBuilder::new(),
                backend,
                reporter: Reporter::new(policy),
                scheduler,
                frame_count: 0,
                pending: None,
            },
        }
    }

    /// Applies the default drawing state, runs `setup`, and leaves the
    /// scheduler ready to draw.
    pub fn start(&mut self, now: Instant) -> Result<(), StartupError> {
        let Some(setup) = self.sketch.setup.as_mut() else {
            return Err(StartupError::MissingSetup);
        };

        default_setup(&mut self.core.graphics(now)).map_err(StartupError::Setup)?;
        self.core.run("setup", setup, now).map_err(StartupError::Setup)?;

        if self.core.scheduler.finish_setup(now) {
            self.core.capture().map_err(StartupError::Setup)?;
        }
        log::info!(
            "sketch started: {}x{} on {:?}, {:?}",
            self.core.ctx.width,
            self.core.ctx.height,
            self.core.backend.name(),
            self.core.scheduler.state()
        );
        Ok(())
    }

    /// Handles one repaint: runs draw, replays the cache, or does nothing.
    ///
    /// A fatal backend error raised since the last repaint is returned first.
    pub fn on_redraw_requested(&mut self, now: Instant) -> DrawResult<RedrawAction> {
        if let Some(e) = self.core.pending.take() {
            return Err(e);
        }
        let action = self.core.scheduler.on_redraw_requested(now);
        match action {
            RedrawAction::Draw => {
                if let Some(draw) = self.sketch.draw.as_mut() {
                    self.core.frame_count += 1;
                    self.core.run("draw", draw, now)?;
                } else if let Some(setup) = self.sketch.setup.as_mut() {
                    // No draw callback: setup is the only thing that builds a frame.
                    default_setup(&mut self.core.graphics(now))?;
                    self.core.run("setup", setup, now)?;
                }
                if self.core.scheduler.end_draw() {
                    self.core.capture()?;
                }
            }
            RedrawAction::Replay => self.core.replay()?,
            RedrawAction::Skip => {}
        }
        Ok(action)
    }

    #[inline]
    pub fn poll(&mut self, now: Instant) -> Poll {
        self.core.scheduler.poll(now)
    }

    pub fn set_visible(&mut self, visible: bool, now: Instant) {
        self.core.scheduler.set_visible(visible, now);
    }

    /// Pixels to present, for off-screen renderers.
    #[inline]
    pub fn framebuffer(&self) -> Option<&Image> {
        self.core.backend.framebuffer()
    }

    #[inline]
    pub fn context(&self) -> &DrawingContext {
        &self.core.ctx
    }

    #[inline]
    pub fn input(&self) -> &InputState {
        &self.core.input
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.core.scheduler
    }

    #[inline]
    pub fn reporter(&self) -> &Reporter {
        &self.core.reporter
    }

    #[inline]
    pub fn loop_state(&self) -> LoopState {
        self.core.scheduler.state()
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.core.frame_count
    }

    #[inline]
    pub fn backend_name(&self) -> &'static str {
        self.core.backend.name()
    }
}

/// Drawing state every sketch starts from.
fn default_setup(g: &mut Graphics<'_>) -> DrawResult {
    g.background(ColorRgba::white())?;
    g.stroke(ColorRgba::black());
    g.fill(ColorRgba::black());
    Ok(())
}

impl InputSink for Processor {
    fn update_key(&mut self, key: char, code: Option<KeyCode>) {
        self.core.input.update_key(key, code);
    }

    fn update_pointer(&mut self, x: f32, y: f32, button: Option<MouseButton>) {
        self.core.input.update_pointer(x, y, button);
    }

    /// Window resized: the canvas follows, and the cached frame is dropped.
    fn update_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.core.ctx.width, self.core.ctx.height) {
            return;
        }
        if let Err(e) = self.core.backend.size(width, height) {
            if let Err(fatal) = self.core.settle("size", e) {
                self.core.pending.get_or_insert(fatal);
            }
            return;
        }
        self.core.ctx.width = width;
        self.core.ctx.height = height;
        self.core.scheduler.invalidate(width, height);
    }

    fn notify(&mut self, notification: InputNotification) -> DrawResult {
        self.core.input.apply_notification(notification);
        if self.core.scheduler.state() == LoopState::Setup {
            return Ok(());
        }
        match self.sketch.handler(notification) {
            Some(handler) => {
                let name = notification.to_string();
                self.core.run(&name, handler, Instant::now())
            }
            None => Ok(()),
        }
    }

    fn is_mouse_pressed(&self) -> bool {
        self.core.input.mouse_pressed
    }

    fn pointer_position(&self) -> (f32, f32) {
        (self.core.input.mouse_x, self.core.input.mouse_y)
    }
}
