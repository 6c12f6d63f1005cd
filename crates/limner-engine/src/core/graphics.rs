use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec2, Vec3};

use crate::context::{resolve_anchor, AnchorMode, DrawingContext};
use crate::coords::{ColorRgba, Rect};
use crate::error::{BackendError, BackendResult, DrawError, DrawResult, LogicError};
use crate::input::{CursorKind, InputState, KeyCode, MouseButton};
use crate::logging::{ReportLevel, Reporter};
use crate::render::{Image, Ortho, Renderer, SolidStyle};
use crate::scheduler::Scheduler;
use crate::shape::{CloseMode, ShapeBuilder, ShapeKind};

/// Drawing API handed to sketch callbacks.
///
/// Every call either updates the drawing context, buffers geometry, or goes
/// straight to the bound renderer. Failures follow one rule:
/// - API misuse (`LogicError`) is reported at error level and returned
/// - renderer failures are reported as warnings and swallowed, unless the
///   report policy makes warnings fatal
pub struct Graphics<'a> {
    pub(crate) ctx: &'a mut DrawingContext,
    pub(crate) input: &'a InputState,
    pub(crate) shape: &'a mut ShapeBuilder,
    pub(crate) backend: &'a mut dyn Renderer,
    pub(crate) reporter: &'a mut Reporter,
    pub(crate) scheduler: &'a mut Scheduler,
    pub(crate) frame_count: u64,
    pub(crate) now: Instant,
}

impl Graphics<'_> {
    // ── error plumbing ────────────────────────────────────────────────────

    fn logic(&mut self, e: LogicError) -> DrawError {
        self.reporter.report(ReportLevel::Error, &e);
        DrawError::Logic(e)
    }

    fn settle(&mut self, op: &'static str, e: BackendError) -> DrawResult {
        if self.reporter.report(ReportLevel::Warning, format_args!("{op}: {e}")) {
            Err(DrawError::Backend(e))
        } else {
            Ok(())
        }
    }

    /// Runs one renderer call and applies the backend error policy.
    fn call(&mut self, op: &'static str, f: impl FnOnce(&mut dyn Renderer) -> BackendResult) -> DrawResult {
        log::trace!(target: "limner::api", "{op}");
        match f(&mut *self.backend) {
            Ok(()) => Ok(()),
            Err(e) => self.settle(op, e),
        }
    }

    fn style(&self) -> SolidStyle {
        SolidStyle {
            fill: self.ctx.fill.active(),
            stroke: self.ctx.stroke.active(),
        }
    }

    /// Converts a raw integer code (shape kind, anchor mode, close mode,
    /// cursor) to its enum, reporting unknown codes.
    pub fn decode<T>(&mut self, raw: i32) -> DrawResult<T>
    where
        T: TryFrom<i32, Error = LogicError>,
    {
        T::try_from(raw).map_err(|e| self.logic(e))
    }

    // ── canvas & queries ──────────────────────────────────────────────────

    /// Resizes the canvas. Drops the cached frame when the size changes.
    pub fn size(&mut self, width: u32, height: u32) -> DrawResult {
        if let Err(e) = self.backend.size(width, height) {
            return self.settle("size", e);
        }
        self.ctx.width = width;
        self.ctx.height = height;
        self.scheduler.invalidate(width, height);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.ctx.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.ctx.height
    }

    #[inline]
    pub fn mouse_x(&self) -> f32 {
        self.input.mouse_x
    }

    #[inline]
    pub fn mouse_y(&self) -> f32 {
        self.input.mouse_y
    }

    #[inline]
    pub fn pmouse_x(&self) -> f32 {
        self.input.pmouse_x
    }

    #[inline]
    pub fn pmouse_y(&self) -> f32 {
        self.input.pmouse_y
    }

    #[inline]
    pub fn mouse_button(&self) -> Option<MouseButton> {
        self.input.mouse_button
    }

    #[inline]
    pub fn mouse_pressed(&self) -> bool {
        self.input.mouse_pressed
    }

    #[inline]
    pub fn key(&self) -> char {
        self.input.key
    }

    #[inline]
    pub fn key_code(&self) -> Option<KeyCode> {
        self.input.key_code
    }

    #[inline]
    pub fn key_pressed(&self) -> bool {
        self.input.key_pressed
    }

    /// Draw executions so far; 0 during `setup`.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn context(&self) -> &DrawingContext {
        self.ctx
    }

    // ── color state ───────────────────────────────────────────────────────

    pub fn stroke(&mut self, color: impl Into<ColorRgba>) {
        self.ctx.set_stroke(color.into().clamped());
    }

    pub fn no_stroke(&mut self) {
        self.ctx.stroke.enabled = false;
    }

    /// Turns stroke back on with the last stroke color.
    pub fn enable_stroke(&mut self) {
        self.ctx.stroke.enabled = true;
    }

    pub fn fill(&mut self, color: impl Into<ColorRgba>) {
        self.ctx.set_fill(color.into().clamped());
    }

    pub fn no_fill(&mut self) {
        self.ctx.fill.enabled = false;
    }

    /// Turns fill back on with the last fill color.
    pub fn enable_fill(&mut self) {
        self.ctx.fill.enabled = true;
    }

    pub fn background(&mut self, color: impl Into<ColorRgba>) -> DrawResult {
        let color = color.into().clamped();
        self.call("background", |r| r.background(color))
    }

    pub fn stroke_weight(&mut self, weight: f32) -> DrawResult {
        self.call("stroke_weight", |r| r.stroke_weight(weight))?;
        if weight.is_finite() && weight >= 0.0 {
            self.ctx.stroke_weight = weight;
        }
        Ok(())
    }

    pub fn smooth(&mut self) -> DrawResult {
        self.ctx.smooth = true;
        self.call("smooth", |r| r.smooth(true))
    }

    pub fn no_smooth(&mut self) -> DrawResult {
        self.ctx.smooth = false;
        self.call("smooth", |r| r.smooth(false))
    }

    // ── transforms ────────────────────────────────────────────────────────

    pub fn push_matrix(&mut self) -> DrawResult {
        self.call("push_matrix", |r| r.push_matrix())
    }

    pub fn pop_matrix(&mut self) -> DrawResult {
        self.call("pop_matrix", |r| r.pop_matrix())
    }

    pub fn reset_matrix(&mut self) -> DrawResult {
        self.call("reset_matrix", |r| r.reset_matrix())
    }

    /// Multiplies the current matrix by `m`, given row by row.
    pub fn apply_matrix(&mut self, m: [f32; 16]) -> DrawResult {
        let m = Mat4::from_cols_array(&m).transpose();
        self.call("apply_matrix", |r| r.apply_matrix(m))
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> DrawResult {
        self.call("translate", |r| r.translate(Vec3::new(x, y, z)))
    }

    /// Rotates `angle` radians about the axis `(x, y, z)`.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) -> DrawResult {
        self.call("rotate", |r| r.rotate(angle, Vec3::new(x, y, z)))
    }

    pub fn rotate_x(&mut self, angle: f32) -> DrawResult {
        self.rotate(angle, 1.0, 0.0, 0.0)
    }

    pub fn rotate_y(&mut self, angle: f32) -> DrawResult {
        self.rotate(angle, 0.0, 1.0, 0.0)
    }

    pub fn rotate_z(&mut self, angle: f32) -> DrawResult {
        self.rotate(angle, 0.0, 0.0, 1.0)
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> DrawResult {
        self.call("scale", |r| r.scale(Vec3::new(x, y, z)))
    }

    pub fn current_matrix(&self) -> Mat4 {
        self.backend.current_matrix()
    }

    /// Logs the current matrix, one row per line.
    pub fn print_matrix(&mut self) {
        let m = self.backend.current_matrix().transpose().to_cols_array_2d();
        for row in m {
            log::info!(
                target: "limner",
                "{:>10.4} {:>10.4} {:>10.4} {:>10.4}",
                row[0],
                row[1],
                row[2],
                row[3]
            );
        }
    }

    // ── shape bracket ─────────────────────────────────────────────────────

    pub fn begin_shape(&mut self, kind: ShapeKind) -> DrawResult {
        log::trace!(target: "limner::api", "begin_shape({kind:?})");
        self.shape.begin(kind).map_err(|e| self.logic(e))
    }

    pub fn vertex(&mut self, x: f32, y: f32, z: f32) -> DrawResult {
        self.shape
            .vertex(self.ctx, Vec3::new(x, y, z), Vec2::ZERO)
            .map_err(|e| self.logic(e))
    }

    /// Vertex with texture coordinates. Backends may ignore `u, v`.
    pub fn textured_vertex(&mut self, x: f32, y: f32, z: f32, u: f32, v: f32) -> DrawResult {
        self.shape
            .vertex(self.ctx, Vec3::new(x, y, z), Vec2::new(u, v))
            .map_err(|e| self.logic(e))
    }

    /// Cubic curve from the previous vertex through two control points.
    pub fn bezier_vertex(
        &mut self,
        c1: impl Into<Vec3>,
        c2: impl Into<Vec3>,
        end: impl Into<Vec3>,
    ) -> DrawResult {
        if self.ctx.bezier_detail == 0 && self.shape.is_building() {
            self.reporter.report(
                ReportLevel::Note,
                "bezier_detail is 0; the curve collapses to a line to its endpoint",
            );
        }
        self.shape
            .curve_vertex(self.ctx, c1.into(), c2.into(), end.into())
            .map(|_| ())
            .map_err(|e| self.logic(e))
    }

    pub fn end_shape(&mut self, close: CloseMode) -> DrawResult {
        let report = self
            .shape
            .end(self.ctx, close, &mut *self.backend)
            .map_err(|e| self.logic(e))?;

        let mut fatal = None;
        for e in report.errors {
            if let Err(err) = self.settle("end_shape", e) {
                fatal.get_or_insert(err);
            }
        }
        fatal.map_or(Ok(()), Err)
    }

    fn polyline(&mut self, kind: ShapeKind, close: CloseMode, points: &[Vec3]) -> DrawResult {
        self.begin_shape(kind)?;
        for p in points {
            self.vertex(p.x, p.y, p.z)?;
        }
        self.end_shape(close)
    }

    // ── derived shapes ────────────────────────────────────────────────────

    pub fn line(&mut self, a: impl Into<Vec3>, b: impl Into<Vec3>) -> DrawResult {
        self.polyline(ShapeKind::Lines, CloseMode::Open, &[a.into(), b.into()])
    }

    pub fn point(&mut self, p: impl Into<Vec3>) -> DrawResult {
        self.polyline(ShapeKind::Points, CloseMode::Open, &[p.into()])
    }

    pub fn triangle(&mut self, a: impl Into<Vec2>, b: impl Into<Vec2>, c: impl Into<Vec2>) -> DrawResult {
        let pts = [a.into(), b.into(), c.into()].map(|p| p.extend(0.0));
        self.polyline(ShapeKind::Triangles, CloseMode::Close, &pts)
    }

    pub fn quad(
        &mut self,
        a: impl Into<Vec2>,
        b: impl Into<Vec2>,
        c: impl Into<Vec2>,
        d: impl Into<Vec2>,
    ) -> DrawResult {
        let pts = [a.into(), b.into(), c.into(), d.into()].map(|p| p.extend(0.0));
        self.polyline(ShapeKind::Quads, CloseMode::Close, &pts)
    }

    /// Rectangle interpreted through the current rect anchor mode.
    pub fn rect(&mut self, a: f32, b: f32, c: f32, d: f32) -> DrawResult {
        let r = resolve_anchor(self.ctx.rect_mode, a, b, c, d);
        let pts = r.corners().map(|p| p.extend(0.0));
        self.polyline(ShapeKind::Quads, CloseMode::Close, &pts)
    }

    pub fn rect_mode(&mut self, mode: AnchorMode) {
        self.ctx.rect_mode = mode;
    }

    /// Ellipse interpreted through the current ellipse anchor mode.
    pub fn ellipse(&mut self, a: f32, b: f32, c: f32, d: f32) -> DrawResult {
        let r = resolve_anchor(self.ctx.ellipse_mode, a, b, c, d);
        self.arc_rect(r, 0.0, TAU)
    }

    pub fn ellipse_mode(&mut self, mode: AnchorMode) {
        self.ctx.ellipse_mode = mode;
    }

    /// Elliptical arc from `start` to `stop` radians, clockwise on screen.
    pub fn arc(&mut self, a: f32, b: f32, c: f32, d: f32, start: f32, stop: f32) -> DrawResult {
        let r = resolve_anchor(self.ctx.ellipse_mode, a, b, c, d);
        self.arc_rect(r, start, stop)
    }

    fn arc_rect(&mut self, bounds: Rect, start: f32, stop: f32) -> DrawResult {
        let style = self.style();
        self.call("arc", |r| r.arc(bounds, start, stop, style))
    }

    /// Cubic Bézier from `p0` to `p1`, tessellated at the current detail.
    pub fn bezier(
        &mut self,
        p0: impl Into<Vec3>,
        c1: impl Into<Vec3>,
        c2: impl Into<Vec3>,
        p1: impl Into<Vec3>,
    ) -> DrawResult {
        let p0 = p0.into();
        self.begin_shape(ShapeKind::Polygon)?;
        self.vertex(p0.x, p0.y, p0.z)?;
        self.bezier_vertex(c1, c2, p1)?;
        self.end_shape(CloseMode::Open)
    }

    pub fn bezier_detail(&mut self, segments: u32) {
        self.ctx.bezier_detail = segments;
    }

    // ── solids ────────────────────────────────────────────────────────────

    /// Box centered on the origin of the current matrix.
    pub fn draw_box(&mut self, width: f32, height: f32, depth: f32) -> DrawResult {
        let style = self.style();
        self.call("box", |r| r.draw_box(Vec3::new(width, height, depth), style))
    }

    pub fn sphere(&mut self, radius: f32) -> DrawResult {
        let style = self.style();
        let detail = self.ctx.sphere_detail;
        self.call("sphere", |r| r.draw_sphere(radius, detail, style))
    }

    pub fn sphere_detail(&mut self, segments: u32) {
        self.ctx.sphere_detail = segments;
    }

    // ── images ────────────────────────────────────────────────────────────

    /// Copies the current frame. `None` when the renderer could not read it
    /// back (already reported).
    pub fn save(&mut self) -> DrawResult<Option<Image>> {
        match self.backend.read_pixels() {
            Ok(img) => Ok(Some(img)),
            Err(e) => self.settle("save", e).map(|()| None),
        }
    }

    pub fn image(&mut self, image: &Image, x: f32, y: f32, width: f32, height: f32) -> DrawResult {
        self.call("image", |r| r.image(image, Rect::new(x, y, width, height)))
    }

    // ── camera & projection ───────────────────────────────────────────────

    pub fn camera_default(&mut self) -> DrawResult {
        self.call("camera_default", |r| r.camera_default())
    }

    pub fn camera(&mut self, eye: impl Into<Vec3>, center: impl Into<Vec3>, up: impl Into<Vec3>) -> DrawResult {
        let (eye, center, up) = (eye.into(), center.into(), up.into());
        self.call("camera", |r| r.camera(eye, center, up))
    }

    /// Opens a camera block: transforms until `end_camera` move the camera.
    pub fn begin_camera(&mut self) -> DrawResult {
        if self.ctx.camera_block {
            return Err(self.logic(LogicError::CameraBlockOpen));
        }
        self.ctx.camera_block = true;
        self.call("begin_camera", |r| r.begin_camera())
    }

    pub fn end_camera(&mut self) -> DrawResult {
        if !self.ctx.camera_block {
            return Err(self.logic(LogicError::NoCameraBlock));
        }
        self.ctx.camera_block = false;
        self.call("end_camera", |r| r.end_camera())
    }

    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> DrawResult {
        let bounds = Ortho {
            left,
            right,
            bottom,
            top,
            near,
            far,
        };
        self.call("ortho", |r| r.ortho(bounds))
    }

    // ── loop control ──────────────────────────────────────────────────────

    pub fn no_loop(&mut self) {
        self.scheduler.no_loop();
    }

    pub fn start_loop(&mut self) {
        self.scheduler.start_loop(self.now);
    }

    /// Runs the draw callback once more, even when not looping.
    pub fn redraw(&mut self) {
        self.scheduler.request_redraw();
    }

    /// Target frames per second. Non-positive rates are ignored with a warning.
    pub fn frame_rate(&mut self, rate: f32) {
        if self.scheduler.set_frame_rate(rate) {
            self.ctx.frame_rate = rate;
        } else {
            self.reporter
                .report(ReportLevel::Warning, format_args!("frame_rate({rate}) ignored"));
        }
    }

    /// Blocks the sketch thread.
    pub fn delay(&mut self, millis: u64) {
        std::thread::sleep(Duration::from_millis(millis));
    }

    pub fn cursor(&mut self, kind: CursorKind) -> DrawResult {
        self.ctx.cursor = Some(kind);
        self.call("cursor", |r| r.cursor(Some(kind)))
    }

    pub fn no_cursor(&mut self) -> DrawResult {
        self.ctx.cursor = None;
        self.call("cursor", |r| r.cursor(None))
    }
}
