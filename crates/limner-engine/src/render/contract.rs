use glam::{Mat4, Vec2, Vec3};

use crate::coords::{ColorRgba, Rect};
use crate::error::BackendResult;
use crate::input::CursorKind;

use super::{Image, Ortho, RenderOp};

/// Rasterization primitive handed to `Renderer::begin_shape`.
///
/// Shape kinds map one-to-one; `LineStrip` and `LineLoop` only appear in
/// outline passes of polygons.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    Polygon,
}

impl Primitive {
    /// Whether the primitive encloses area (has a fill pass).
    #[inline]
    pub fn is_fillable(self) -> bool {
        !matches!(
            self,
            Primitive::Points | Primitive::Lines | Primitive::LineStrip | Primitive::LineLoop
        )
    }
}

/// Which half of the two-pass render a shape belongs to.
///
/// `Outline` draws the primitive's edges (polygon-mode lines) rather than
/// its interior.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Pass {
    Fill,
    Outline,
}

/// One vertex as the backend sees it: the color is already resolved for
/// the pass being drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderVertex {
    pub position: Vec3,
    pub color: ColorRgba,
    pub uv: Vec2,
}

impl RenderVertex {
    #[inline]
    pub fn new(position: Vec3, color: ColorRgba) -> Self {
        Self {
            position,
            color,
            uv: Vec2::ZERO,
        }
    }
}

/// Fill and stroke for primitives the backend tessellates itself.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SolidStyle {
    pub fill: Option<ColorRgba>,
    pub stroke: Option<ColorRgba>,
}

impl SolidStyle {
    #[inline]
    pub fn is_invisible(self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }
}

/// Opaque copy of a rendered frame, replayed without rebuilding geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSnapshot {
    Pixels(Image),
    Commands(Vec<RenderOp>),
}

/// The operations every backend implements.
///
/// All entries are required: a type that compiles against this trait is a
/// complete backend. Calls return `BackendError` on device failure; the
/// caller reports them and keeps drawing.
pub trait Renderer {
    fn name(&self) -> &'static str;

    // ── canvas state ──────────────────────────────────────────────────────

    fn size(&mut self, width: u32, height: u32) -> BackendResult;
    fn smooth(&mut self, enabled: bool) -> BackendResult;
    fn stroke_weight(&mut self, weight: f32) -> BackendResult;
    fn background(&mut self, color: ColorRgba) -> BackendResult;

    // ── transform stack ───────────────────────────────────────────────────

    fn push_matrix(&mut self) -> BackendResult;
    fn pop_matrix(&mut self) -> BackendResult;
    fn reset_matrix(&mut self) -> BackendResult;
    fn apply_matrix(&mut self, m: Mat4) -> BackendResult;
    fn translate(&mut self, by: Vec3) -> BackendResult;
    fn rotate(&mut self, angle: f32, axis: Vec3) -> BackendResult;
    fn scale(&mut self, by: Vec3) -> BackendResult;
    fn current_matrix(&self) -> Mat4;

    // ── shapes ────────────────────────────────────────────────────────────

    fn begin_shape(&mut self, primitive: Primitive, pass: Pass) -> BackendResult;
    fn vertex(&mut self, v: &RenderVertex) -> BackendResult;
    fn end_shape(&mut self) -> BackendResult;

    fn arc(&mut self, bounds: Rect, start: f32, stop: f32, style: SolidStyle) -> BackendResult;
    fn draw_box(&mut self, size: Vec3, style: SolidStyle) -> BackendResult;
    fn draw_sphere(&mut self, radius: f32, detail: u32, style: SolidStyle) -> BackendResult;

    // ── images ────────────────────────────────────────────────────────────

    fn image(&mut self, image: &Image, dest: Rect) -> BackendResult;
    fn read_pixels(&mut self) -> BackendResult<Image>;

    // ── camera & projection ───────────────────────────────────────────────

    fn camera_default(&mut self) -> BackendResult;
    fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> BackendResult;
    fn begin_camera(&mut self) -> BackendResult;
    fn end_camera(&mut self) -> BackendResult;
    fn ortho(&mut self, bounds: Ortho) -> BackendResult;

    fn cursor(&mut self, kind: Option<CursorKind>) -> BackendResult;

    // ── frame cache ───────────────────────────────────────────────────────

    fn capture_frame(&mut self) -> BackendResult<FrameSnapshot>;
    fn replay_frame(&mut self, snapshot: &FrameSnapshot) -> BackendResult;

    /// Pixels to present, for backends that render off-screen.
    fn framebuffer(&self) -> Option<&Image> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_primitives_have_no_fill() {
        assert!(!Primitive::Points.is_fillable());
        assert!(!Primitive::LineLoop.is_fillable());
        assert!(Primitive::Polygon.is_fillable());
        assert!(Primitive::QuadStrip.is_fillable());
    }

    #[test]
    fn style_without_brushes_is_invisible() {
        assert!(SolidStyle::default().is_invisible());
        let s = SolidStyle {
            fill: None,
            stroke: Some(ColorRgba::black()),
        };
        assert!(!s.is_invisible());
    }
}
