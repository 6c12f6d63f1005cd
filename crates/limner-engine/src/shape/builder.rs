use glam::{Vec2, Vec3};

use crate::context::DrawingContext;
use crate::coords::ColorRgba;
use crate::error::{BackendError, LogicError};
use crate::render::{tess, Pass, Primitive, RenderVertex, Renderer};

use super::{CloseMode, ShapeKind};

/// One buffered vertex with the colors that were active when it was added.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub fill: ColorRgba,
    pub stroke: ColorRgba,
}

impl Vertex {
    fn capture(ctx: &DrawingContext, position: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            uv,
            fill: ctx.fill.color,
            stroke: ctx.stroke.color,
        }
    }

    #[inline]
    fn for_pass(&self, pass: Pass) -> RenderVertex {
        RenderVertex {
            position: self.position,
            color: match pass {
                Pass::Fill => self.fill,
                Pass::Outline => self.stroke,
            },
            uv: self.uv,
        }
    }
}

/// What `end` sent to the renderer.
///
/// Backend failures do not stop the flush; they are collected here for the
/// caller to report.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlushReport {
    pub fill_vertices: usize,
    pub stroke_vertices: usize,
    pub errors: Vec<BackendError>,
}

#[derive(Debug)]
struct OpenShape {
    kind: ShapeKind,
    vertices: Vec<Vertex>,
}

/// Geometry buffer plus the Idle/Building state machine.
///
/// Every logic error leaves the builder Idle with an empty buffer, so a
/// failed bracket never leaks vertices into the next one.
#[derive(Debug, Default)]
pub struct ShapeBuilder {
    open: Option<OpenShape>,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_building(&self) -> bool {
        self.open.is_some()
    }

    /// Vertices currently buffered (0 when Idle).
    #[inline]
    pub fn len(&self) -> usize {
        self.open.as_ref().map_or(0, |s| s.vertices.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.open.as_ref().map_or(&[], |s| &s.vertices)
    }

    pub fn begin(&mut self, kind: ShapeKind) -> Result<(), LogicError> {
        if self.open.take().is_some() {
            return Err(LogicError::ShapeAlreadyOpen);
        }
        self.open = Some(OpenShape {
            kind,
            vertices: Vec::new(),
        });
        Ok(())
    }

    pub fn vertex(&mut self, ctx: &DrawingContext, position: Vec3, uv: Vec2) -> Result<(), LogicError> {
        let shape = self.open.as_mut().ok_or(LogicError::NoOpenShape("vertex"))?;
        shape.vertices.push(Vertex::capture(ctx, position, uv));
        Ok(())
    }

    /// Appends `bezier_detail + 1` points along the cubic curve from the last
    /// buffered vertex through `c1`, `c2` to `end`. Returns how many points
    /// were added.
    pub fn curve_vertex(
        &mut self,
        ctx: &DrawingContext,
        c1: Vec3,
        c2: Vec3,
        end: Vec3,
    ) -> Result<usize, LogicError> {
        let shape = self.open.as_mut().ok_or(LogicError::NoOpenShape("bezier_vertex"))?;
        let Some(start) = shape.vertices.last().map(|v| v.position) else {
            self.open = None;
            return Err(LogicError::CurveWithoutStart);
        };

        let steps = ctx.bezier_detail as usize + 1;
        shape.vertices.reserve(steps);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            let p = tess::bezier_point(start, c1, c2, end, t);
            shape.vertices.push(Vertex::capture(ctx, p, Vec2::ZERO));
        }
        Ok(steps)
    }

    /// Renders the buffered shape and returns to Idle.
    ///
    /// The buffer is consumed up front, so it is gone no matter which passes
    /// run or how the renderer behaves.
    pub fn end(
        &mut self,
        ctx: &DrawingContext,
        close: CloseMode,
        backend: &mut dyn Renderer,
    ) -> Result<FlushReport, LogicError> {
        let shape = self.open.take().ok_or(LogicError::NoOpenShape("end_shape"))?;
        let mut report = FlushReport::default();

        if ctx.fill.enabled && shape.kind.has_fill() {
            report.fill_vertices = emit(
                backend,
                shape.kind.primitive(),
                Pass::Fill,
                &shape.vertices,
                &mut report.errors,
            );
        }

        if ctx.stroke.enabled {
            report.stroke_vertices = emit(
                backend,
                shape.kind.outline_primitive(close),
                Pass::Outline,
                &shape.vertices,
                &mut report.errors,
            );
        }

        Ok(report)
    }

    /// Drops any open shape without drawing it.
    pub fn abort(&mut self) {
        self.open = None;
    }
}

/// Sends one pass to the renderer. A failed `begin_shape` skips the pass.
fn emit(
    backend: &mut dyn Renderer,
    primitive: Primitive,
    pass: Pass,
    vertices: &[Vertex],
    errors: &mut Vec<BackendError>,
) -> usize {
    if let Err(e) = backend.begin_shape(primitive, pass) {
        errors.push(e);
        return 0;
    }

    let mut sent = 0;
    for v in vertices {
        match backend.vertex(&v.for_pass(pass)) {
            Ok(()) => sent += 1,
            Err(e) => errors.push(e),
        }
    }

    if let Err(e) = backend.end_shape() {
        errors.push(e);
    }
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingRenderer;
    use crate::render::RenderOp;

    fn red() -> ColorRgba {
        ColorRgba::new(1.0, 0.0, 0.0, 1.0)
    }

    fn blue() -> ColorRgba {
        ColorRgba::new(0.0, 0.0, 1.0, 1.0)
    }

    fn vertex_colors(ops: &[RenderOp], pass: Pass) -> Vec<ColorRgba> {
        let mut in_pass = false;
        let mut out = Vec::new();
        for op in ops {
            match op {
                RenderOp::BeginShape { pass: p, .. } => in_pass = *p == pass,
                RenderOp::EndShape => in_pass = false,
                RenderOp::Vertex(v) if in_pass => out.push(v.color),
                _ => {}
            }
        }
        out
    }

    // ── per-vertex colors ─────────────────────────────────────────────────

    #[test]
    fn fill_pass_uses_color_at_vertex_time() {
        let mut ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let log = backend.log();
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Triangles).unwrap();
        ctx.set_fill(red());
        b.vertex(&ctx, Vec3::new(0.0, 0.0, 0.0), Vec2::ZERO).unwrap();
        b.vertex(&ctx, Vec3::new(10.0, 0.0, 0.0), Vec2::ZERO).unwrap();
        ctx.set_fill(blue());
        b.vertex(&ctx, Vec3::new(0.0, 10.0, 0.0), Vec2::ZERO).unwrap();
        ctx.set_fill(ColorRgba::white());

        let report = b.end(&ctx, CloseMode::Close, &mut backend).unwrap();

        assert_eq!(report.fill_vertices, 3);
        assert_eq!(vertex_colors(&log.ops(), Pass::Fill), vec![red(), red(), blue()]);
    }

    #[test]
    fn stroke_pass_uses_stroke_colors() {
        let mut ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let log = backend.log();
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Lines).unwrap();
        ctx.set_stroke(red());
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();
        ctx.set_stroke(blue());
        b.vertex(&ctx, Vec3::X, Vec2::ZERO).unwrap();
        let report = b.end(&ctx, CloseMode::Open, &mut backend).unwrap();

        assert_eq!(report.fill_vertices, 0);
        assert_eq!(report.stroke_vertices, 2);
        assert_eq!(vertex_colors(&log.ops(), Pass::Outline), vec![red(), blue()]);
    }

    // ── passes ────────────────────────────────────────────────────────────

    #[test]
    fn fill_runs_before_stroke() {
        let ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let log = backend.log();
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Polygon).unwrap();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y] {
            b.vertex(&ctx, p, Vec2::ZERO).unwrap();
        }
        b.end(&ctx, CloseMode::Close, &mut backend).unwrap();

        let begins: Vec<_> = log
            .ops()
            .into_iter()
            .filter_map(|op| match op {
                RenderOp::BeginShape { primitive, pass } => Some((primitive, pass)),
                _ => None,
            })
            .collect();
        assert_eq!(
            begins,
            vec![(Primitive::Polygon, Pass::Fill), (Primitive::LineLoop, Pass::Outline)]
        );
    }

    #[test]
    fn open_polygon_outline_is_a_strip() {
        let ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let log = backend.log();
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Polygon).unwrap();
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();
        b.vertex(&ctx, Vec3::X, Vec2::ZERO).unwrap();
        b.end(&ctx, CloseMode::Open, &mut backend).unwrap();

        assert!(log.ops().contains(&RenderOp::BeginShape {
            primitive: Primitive::LineStrip,
            pass: Pass::Outline,
        }));
    }

    #[test]
    fn disabled_brushes_skip_passes_and_still_clear() {
        let mut ctx = DrawingContext::default();
        ctx.fill.enabled = false;
        ctx.stroke.enabled = false;
        let mut backend = RecordingRenderer::new(100, 100);
        let log = backend.log();
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Quads).unwrap();
        for _ in 0..4 {
            b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();
        }
        let report = b.end(&ctx, CloseMode::Close, &mut backend).unwrap();

        assert_eq!(report, FlushReport::default());
        assert!(log.ops().is_empty());
        assert!(!b.is_building());
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn points_have_no_fill_pass() {
        let ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Points).unwrap();
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();
        let report = b.end(&ctx, CloseMode::Open, &mut backend).unwrap();
        assert_eq!((report.fill_vertices, report.stroke_vertices), (0, 1));
    }

    // ── curves ────────────────────────────────────────────────────────────

    #[test]
    fn curve_vertex_on_empty_buffer_fails_and_resets() {
        let ctx = DrawingContext::default();
        let mut b = ShapeBuilder::new();
        b.begin(ShapeKind::Polygon).unwrap();

        assert_eq!(
            b.curve_vertex(&ctx, Vec3::X, Vec3::Y, Vec3::ONE),
            Err(LogicError::CurveWithoutStart)
        );
        assert!(!b.is_building());
        assert_eq!(b.len(), 0);
    }

    #[test]
    fn curve_vertex_appends_detail_plus_one_points() {
        let mut ctx = DrawingContext::default();
        ctx.bezier_detail = 4;
        let mut b = ShapeBuilder::new();
        b.begin(ShapeKind::Polygon).unwrap();
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();

        let end = Vec3::new(30.0, 0.0, 0.0);
        let added = b
            .curve_vertex(&ctx, Vec3::new(10.0, 10.0, 0.0), Vec3::new(20.0, 10.0, 0.0), end)
            .unwrap();

        assert_eq!(added, 5);
        assert_eq!(b.len(), 6);
        assert_eq!(b.vertices()[5].position, end);
    }

    #[test]
    fn zero_detail_degenerates_to_endpoint() {
        let ctx = DrawingContext::default();
        let mut b = ShapeBuilder::new();
        b.begin(ShapeKind::Polygon).unwrap();
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();
        assert_eq!(b.curve_vertex(&ctx, Vec3::X, Vec3::Y, Vec3::ONE), Ok(1));
        assert_eq!(b.vertices()[1].position, Vec3::ONE);
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn idle_calls_are_logic_errors() {
        let ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let mut b = ShapeBuilder::new();

        assert_eq!(
            b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO),
            Err(LogicError::NoOpenShape("vertex"))
        );
        assert_eq!(
            b.end(&ctx, CloseMode::Open, &mut backend),
            Err(LogicError::NoOpenShape("end_shape"))
        );
    }

    #[test]
    fn nested_begin_fails_and_discards_buffer() {
        let ctx = DrawingContext::default();
        let mut b = ShapeBuilder::new();
        b.begin(ShapeKind::Lines).unwrap();
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();

        assert_eq!(b.begin(ShapeKind::Lines), Err(LogicError::ShapeAlreadyOpen));
        assert!(!b.is_building());
    }

    #[test]
    fn failed_begin_skips_the_pass() {
        let ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        let log = backend.log();
        backend.fail_on("begin_shape");
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Polygon).unwrap();
        b.vertex(&ctx, Vec3::ZERO, Vec2::ZERO).unwrap();
        let report = b.end(&ctx, CloseMode::Close, &mut backend).unwrap();

        assert_eq!(report.errors.len(), 2);
        assert!(log.ops().is_empty());
    }

    #[test]
    fn vertex_failures_are_collected() {
        let ctx = DrawingContext::default();
        let mut backend = RecordingRenderer::new(100, 100);
        backend.fail_on("vertex");
        let mut b = ShapeBuilder::new();

        b.begin(ShapeKind::Triangles).unwrap();
        for p in [Vec3::ZERO, Vec3::X, Vec3::Y] {
            b.vertex(&ctx, p, Vec2::ZERO).unwrap();
        }
        let report = b.end(&ctx, CloseMode::Close, &mut backend).unwrap();

        assert_eq!(report.fill_vertices, 0);
        assert_eq!(report.stroke_vertices, 0);
        assert_eq!(report.errors.len(), 6);
        assert!(!b.is_building());
    }
}
