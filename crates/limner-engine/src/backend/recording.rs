//! Command-journal backend.
//!
//! Draws nothing. Every successful renderer call is appended to a shared
//! `CommandLog`, which makes this backend the natural test double for the
//! renderer contract and a cheap way to inspect what a sketch emits.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec3};

use crate::coords::{ColorRgba, Rect, Viewport};
use crate::error::{BackendError, BackendResult};
use crate::input::CursorKind;
use crate::render::{
    FrameSnapshot, Image, Ortho, Pass, Primitive, RenderOp, RenderVertex, Renderer, SolidStyle, TransformState,
};

/// Shared handle to the journal. Clones see the same ops.
#[derive(Debug, Clone, Default)]
pub struct CommandLog(Rc<RefCell<Vec<RenderOp>>>);

impl CommandLog {
    pub fn ops(&self) -> Vec<RenderOp> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Number of journaled ops with the given renderer entry name.
    pub fn count(&self, name: &str) -> usize {
        self.0.borrow().iter().filter(|op| op.name() == name).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    fn push(&self, op: RenderOp) {
        self.0.borrow_mut().push(op);
    }

    fn since(&self, start: usize) -> Vec<RenderOp> {
        self.0.borrow().get(start..).map(<[_]>::to_vec).unwrap_or_default()
    }
}

pub struct RecordingRenderer {
    log: CommandLog,
    /// Journal index where the current frame began (after the last capture
    /// or replay).
    frame_start: usize,
    transform: TransformState,
    size: (u32, u32),
    failing: Vec<&'static str>,
}

impl RecordingRenderer {
    pub const NAME: &'static str = "recording";

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            log: CommandLog::default(),
            frame_start: 0,
            transform: TransformState::new(Viewport::new(width as f32, height as f32)),
            size: (width, height),
            failing: Vec::new(),
        }
    }

    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Makes every call to the named entry fail with a device error.
    /// Failed calls are not journaled.
    pub fn fail_on(&mut self, op: &'static str) {
        self.failing.push(op);
    }

    fn record(&mut self, op: RenderOp) -> BackendResult {
        let name = op.name();
        if self.failing.contains(&name) {
            return Err(BackendError::Device(format!("{name} failed (injected)")));
        }
        self.log.push(op);
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn size(&mut self, width: u32, height: u32) -> BackendResult {
        self.record(RenderOp::Size { width, height })?;
        self.size = (width, height);
        self.transform.resize(Viewport::new(width as f32, height as f32));
        Ok(())
    }

    fn smooth(&mut self, enabled: bool) -> BackendResult {
        self.record(RenderOp::Smooth(enabled))
    }

    fn stroke_weight(&mut self, weight: f32) -> BackendResult {
        self.record(RenderOp::StrokeWeight(weight))
    }

    fn background(&mut self, color: ColorRgba) -> BackendResult {
        self.record(RenderOp::Background(color))
    }

    fn push_matrix(&mut self) -> BackendResult {
        self.record(RenderOp::PushMatrix)?;
        self.transform.push()
    }

    fn pop_matrix(&mut self) -> BackendResult {
        self.record(RenderOp::PopMatrix)?;
        self.transform.pop()
    }

    fn reset_matrix(&mut self) -> BackendResult {
        self.record(RenderOp::ResetMatrix)?;
        self.transform.reset();
        Ok(())
    }

    fn apply_matrix(&mut self, m: Mat4) -> BackendResult {
        self.record(RenderOp::ApplyMatrix(m))?;
        self.transform.apply(m);
        Ok(())
    }

    fn translate(&mut self, by: Vec3) -> BackendResult {
        self.record(RenderOp::Translate(by))?;
        self.transform.translate(by);
        Ok(())
    }

    fn rotate(&mut self, angle: f32, axis: Vec3) -> BackendResult {
        self.record(RenderOp::Rotate { angle, axis })?;
        self.transform.rotate(angle, axis);
        Ok(())
    }

    fn scale(&mut self, by: Vec3) -> BackendResult {
        self.record(RenderOp::Scale(by))?;
        self.transform.scale(by);
        Ok(())
    }

    fn current_matrix(&self) -> Mat4 {
        self.transform.model()
    }

    fn begin_shape(&mut self, primitive: Primitive, pass: Pass) -> BackendResult {
        self.record(RenderOp::BeginShape { primitive, pass })
    }

    fn vertex(&mut self, v: &RenderVertex) -> BackendResult {
        self.record(RenderOp::Vertex(*v))
    }

    fn end_shape(&mut self) -> BackendResult {
        self.record(RenderOp::EndShape)
    }

    fn arc(&mut self, bounds: Rect, start: f32, stop: f32, style: SolidStyle) -> BackendResult {
        self.record(RenderOp::Arc {
            bounds,
            start,
            stop,
            style,
        })
    }

    fn draw_box(&mut self, size: Vec3, style: SolidStyle) -> BackendResult {
        self.record(RenderOp::Box { size, style })
    }

    fn draw_sphere(&mut self, radius: f32, detail: u32, style: SolidStyle) -> BackendResult {
        self.record(RenderOp::Sphere {
            radius,
            detail,
            style,
        })
    }

    fn image(&mut self, image: &Image, dest: Rect) -> BackendResult {
        self.record(RenderOp::Image {
            width: image.width(),
            height: image.height(),
            dest,
        })
    }

    fn read_pixels(&mut self) -> BackendResult<Image> {
        self.record(RenderOp::ReadPixels)?;
        Ok(Image::new(self.size.0, self.size.1))
    }

    fn camera_default(&mut self) -> BackendResult {
        self.record(RenderOp::CameraDefault)?;
        self.transform.camera_default();
        Ok(())
    }

    fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> BackendResult {
        self.record(RenderOp::Camera { eye, center, up })?;
        self.transform.camera(eye, center, up)
    }

    fn begin_camera(&mut self) -> BackendResult {
        self.record(RenderOp::BeginCamera)?;
        self.transform.begin_camera()
    }

    fn end_camera(&mut self) -> BackendResult {
        self.record(RenderOp::EndCamera)?;
        self.transform.end_camera()
    }

    fn ortho(&mut self, bounds: Ortho) -> BackendResult {
        self.record(RenderOp::Ortho(bounds))?;
        self.transform.ortho(bounds)
    }

    fn cursor(&mut self, kind: Option<CursorKind>) -> BackendResult {
        self.record(RenderOp::Cursor(kind))
    }

    /// The ops journaled since the previous capture or replay.
    fn capture_frame(&mut self) -> BackendResult<FrameSnapshot> {
        let ops = self.log.since(self.frame_start);
        self.record(RenderOp::CaptureFrame)?;
        self.frame_start = self.log.len();
        Ok(FrameSnapshot::Commands(ops))
    }

    fn replay_frame(&mut self, snapshot: &FrameSnapshot) -> BackendResult {
        let FrameSnapshot::Commands(ops) = snapshot else {
            return Err(BackendError::Unsupported {
                backend: Self::NAME,
                op: "replay_frame(pixels)",
            });
        };
        self.record(RenderOp::ReplayFrame { ops: ops.len() })?;
        self.frame_start = self.log.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journals_calls_in_order() {
        let mut r = RecordingRenderer::new(10, 10);
        let log = r.log();
        r.background(ColorRgba::white()).unwrap();
        r.translate(Vec3::X).unwrap();

        assert_eq!(
            log.ops(),
            vec![RenderOp::Background(ColorRgba::white()), RenderOp::Translate(Vec3::X)]
        );
        assert_eq!(r.current_matrix(), Mat4::from_translation(Vec3::X));
    }

    #[test]
    fn injected_failures_are_not_journaled() {
        let mut r = RecordingRenderer::new(10, 10);
        let log = r.log();
        r.fail_on("background");

        assert!(matches!(r.background(ColorRgba::black()), Err(BackendError::Device(_))));
        assert!(log.is_empty());
        r.smooth(true).unwrap();
        assert_eq!(log.count("smooth"), 1);
    }

    #[test]
    fn capture_holds_ops_since_last_frame() {
        let mut r = RecordingRenderer::new(10, 10);
        r.background(ColorRgba::black()).unwrap();
        let first = r.capture_frame().unwrap();
        assert_eq!(first, FrameSnapshot::Commands(vec![RenderOp::Background(ColorRgba::black())]));

        r.replay_frame(&first).unwrap();
        r.smooth(false).unwrap();
        let second = r.capture_frame().unwrap();
        assert_eq!(second, FrameSnapshot::Commands(vec![RenderOp::Smooth(false)]));
    }

    #[test]
    fn pop_without_push_still_underflows() {
        let mut r = RecordingRenderer::new(10, 10);
        assert_eq!(r.pop_matrix(), Err(BackendError::StackUnderflow));
    }
}
