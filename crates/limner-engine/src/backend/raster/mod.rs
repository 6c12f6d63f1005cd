//! Software rasterizer backend.
//!
//! Renders into a CPU framebuffer. The window backend presents that buffer
//! through wgpu; the headless backend just keeps it. Frame snapshots are
//! pixel copies, so a replay costs one memcpy.

mod surface;

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3};

use crate::coords::{ColorRgba, Rect, Viewport};
use crate::error::{BackendError, BackendResult};
use crate::input::CursorKind;
use crate::render::tess::{self, Mesh};
use crate::render::{
    FrameSnapshot, Image, Ortho, Pass, Primitive, RenderVertex, Renderer, SolidStyle, TransformState,
};

pub use surface::{ScreenVertex, Surface};

#[derive(Debug)]
struct PendingShape {
    primitive: Primitive,
    pass: Pass,
    vertices: Vec<RenderVertex>,
}

pub struct RasterRenderer {
    surface: Surface,
    transform: TransformState,
    smooth: bool,
    stroke_weight: f32,
    cursor: Option<CursorKind>,

    pending: Option<PendingShape>,
    box_mesh: Mesh,
    /// Unit sphere for the last requested detail.
    sphere: Option<(u32, Mesh)>,
}

impl RasterRenderer {
    pub const NAME: &'static str = "raster";

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            surface: Surface::new(width, height),
            transform: TransformState::new(Viewport::new(width as f32, height as f32)),
            smooth: false,
            stroke_weight: 1.0,
            cursor: Some(CursorKind::Arrow),
            pending: None,
            box_mesh: tess::box_mesh(),
            sphere: None,
        }
    }

    /// Cursor last requested by the sketch (`None` = hidden).
    #[inline]
    pub fn cursor_kind(&self) -> Option<CursorKind> {
        self.cursor
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    fn project(&self, mvp: Mat4, v: &RenderVertex) -> Option<ScreenVertex> {
        let pos = crate::render::transform::project_with(mvp, self.transform.viewport(), v.position)?;
        Some(ScreenVertex {
            pos,
            color: v.color,
            uv: v.uv,
        })
    }

    fn project_all(&self, vertices: &[RenderVertex]) -> Vec<Option<ScreenVertex>> {
        let mvp = self.transform.mvp();
        vertices.iter().map(|v| self.project(mvp, v)).collect()
    }

    /// Rasterizes already-projected vertices laid out as `primitive`.
    fn draw_projected(&mut self, primitive: Primitive, pass: Pass, verts: &[Option<ScreenVertex>]) {
        let smooth = self.smooth;
        let weight = self.stroke_weight;

        if primitive == Primitive::Points {
            for v in verts.iter().flatten() {
                self.surface.point(*v, weight, smooth);
            }
            return;
        }

        let fill = pass == Pass::Fill && primitive.is_fillable();
        if fill {
            for [a, b, c] in tess::fill_triangles(primitive, verts.len()) {
                if let (Some(a), Some(b), Some(c)) = (verts[a], verts[b], verts[c]) {
                    self.surface.fill_triangle([a, b, c], smooth, None);
                }
            }
        } else {
            for [a, b] in tess::outline_segments(primitive, verts.len()) {
                if let (Some(a), Some(b)) = (verts[a], verts[b]) {
                    self.surface.line(a, b, weight, smooth);
                }
            }
        }
    }

    /// Fill then outline of an indexed mesh scaled by `scale`.
    fn draw_mesh(&mut self, mesh: &Mesh, scale: Vec3, style: SolidStyle) {
        let mvp = self.transform.mvp() * Mat4::from_scale(scale);
        let viewport = self.transform.viewport();
        let projected: Vec<Option<Vec3>> = mesh
            .positions
            .iter()
            .map(|p| crate::render::transform::project_with(mvp, viewport, *p))
            .collect();
        let at = |i: u32, color: ColorRgba| {
            projected[i as usize].map(|pos| ScreenVertex {
                pos,
                color,
                uv: Vec2::ZERO,
            })
        };

        if let Some(color) = style.fill {
            for &[a, b, c] in &mesh.triangles {
                if let (Some(a), Some(b), Some(c)) = (at(a, color), at(b, color), at(c, color)) {
                    self.surface.fill_triangle([a, b, c], self.smooth, None);
                }
            }
        }
        if let Some(color) = style.stroke {
            for &[a, b] in &mesh.edges {
                if let (Some(a), Some(b)) = (at(a, color), at(b, color)) {
                    self.surface.line(a, b, self.stroke_weight, self.smooth);
                }
            }
        }
    }

    fn invalid(op: &'static str, reason: impl Into<String>) -> BackendError {
        BackendError::InvalidArgument {
            op,
            reason: reason.into(),
        }
    }
}

impl Renderer for RasterRenderer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn size(&mut self, width: u32, height: u32) -> BackendResult {
        if width == 0 || height == 0 {
            return Err(Self::invalid("size", format!("{width}x{height}")));
        }
        if (width, height) != (self.surface.width(), self.surface.height()) {
            self.surface.resize(width, height);
            self.transform.resize(Viewport::new(width as f32, height as f32));
        }
        Ok(())
    }

    fn smooth(&mut self, enabled: bool) -> BackendResult {
        self.smooth = enabled;
        Ok(())
    }

    fn stroke_weight(&mut self, weight: f32) -> BackendResult {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Self::invalid("stroke_weight", format!("{weight}")));
        }
        self.stroke_weight = weight;
        Ok(())
    }

    fn background(&mut self, color: ColorRgba) -> BackendResult {
        self.surface.clear(color.clamped());
        Ok(())
    }

    fn push_matrix(&mut self) -> BackendResult {
        self.transform.push()
    }

    fn pop_matrix(&mut self) -> BackendResult {
        self.transform.pop()
    }

    fn reset_matrix(&mut self) -> BackendResult {
        self.transform.reset();
        Ok(())
    }

    fn apply_matrix(&mut self, m: Mat4) -> BackendResult {
        if !m.is_finite() {
            return Err(Self::invalid("apply_matrix", "non-finite matrix"));
        }
        self.transform.apply(m);
        Ok(())
    }

    fn translate(&mut self, by: Vec3) -> BackendResult {
        self.transform.translate(by);
        Ok(())
    }

    fn rotate(&mut self, angle: f32, axis: Vec3) -> BackendResult {
        self.transform.rotate(angle, axis);
        Ok(())
    }

    fn scale(&mut self, by: Vec3) -> BackendResult {
        self.transform.scale(by);
        Ok(())
    }

    fn current_matrix(&self) -> Mat4 {
        self.transform.model()
    }

    fn begin_shape(&mut self, primitive: Primitive, pass: Pass) -> BackendResult {
        if self.pending.is_some() {
            return Err(Self::invalid("begin_shape", "previous shape not ended"));
        }
        self.pending = Some(PendingShape {
            primitive,
            pass,
            vertices: Vec::new(),
        });
        Ok(())
    }

    fn vertex(&mut self, v: &RenderVertex) -> BackendResult {
        let shape = self
            .pending
            .as_mut()
            .ok_or_else(|| Self::invalid("vertex", "outside begin_shape/end_shape"))?;
        shape.vertices.push(*v);
        Ok(())
    }

    fn end_shape(&mut self) -> BackendResult {
        let shape = self
            .pending
            .take()
            .ok_or_else(|| Self::invalid("end_shape", "no shape begun"))?;
        let projected = self.project_all(&shape.vertices);
        self.draw_projected(shape.primitive, shape.pass, &projected);
        Ok(())
    }

    fn arc(&mut self, bounds: Rect, start: f32, stop: f32, style: SolidStyle) -> BackendResult {
        if !bounds.is_finite() || !start.is_finite() || !stop.is_finite() {
            return Err(Self::invalid("arc", "non-finite bounds or angles"));
        }
        if style.is_invisible() || stop <= start {
            return Ok(());
        }
        let full = stop - start >= TAU;
        let stop = if full { start + TAU } else { stop };
        let rim: Vec<RenderVertex> = tess::arc_points(bounds, start, stop)
            .into_iter()
            .map(|p| RenderVertex::new(p.extend(0.0), ColorRgba::transparent()))
            .collect();

        if let Some(color) = style.fill {
            let center = RenderVertex::new(bounds.center().extend(0.0), color);
            let fan: Vec<RenderVertex> = std::iter::once(center)
                .chain(rim.iter().map(|v| RenderVertex { color, ..*v }))
                .collect();
            let projected = self.project_all(&fan);
            self.draw_projected(Primitive::TriangleFan, Pass::Fill, &projected);
        }
        if let Some(color) = style.stroke {
            let line: Vec<RenderVertex> = rim.iter().map(|v| RenderVertex { color, ..*v }).collect();
            let projected = self.project_all(&line);
            let primitive = if full { Primitive::LineLoop } else { Primitive::LineStrip };
            self.draw_projected(primitive, Pass::Outline, &projected);
        }
        Ok(())
    }

    fn draw_box(&mut self, size: Vec3, style: SolidStyle) -> BackendResult {
        if !size.is_finite() {
            return Err(Self::invalid("box", "non-finite size"));
        }
        let mesh = std::mem::take(&mut self.box_mesh);
        self.draw_mesh(&mesh, size, style);
        self.box_mesh = mesh;
        Ok(())
    }

    fn draw_sphere(&mut self, radius: f32, detail: u32, style: SolidStyle) -> BackendResult {
        if !radius.is_finite() {
            return Err(Self::invalid("sphere", "non-finite radius"));
        }
        let (cached, mesh) = match self.sphere.take() {
            Some((d, mesh)) if d == detail => (d, mesh),
            stale => {
                drop(stale);
                log::debug!("raster: building sphere mesh for detail {detail}");
                (detail, tess::sphere_mesh(detail))
            }
        };
        self.draw_mesh(&mesh, Vec3::splat(radius), style);
        self.sphere = Some((cached, mesh));
        Ok(())
    }

    fn image(&mut self, image: &Image, dest: Rect) -> BackendResult {
        if image.is_empty() || dest.is_empty() {
            return Ok(());
        }
        let [tl, tr, br, bl] = dest.corners();
        let quad = [
            (tl, Vec2::new(0.0, 0.0)),
            (tr, Vec2::new(1.0, 0.0)),
            (br, Vec2::new(1.0, 1.0)),
            (bl, Vec2::new(0.0, 1.0)),
        ]
        .map(|(p, uv)| RenderVertex {
            position: p.extend(0.0),
            color: ColorRgba::white(),
            uv,
        });
        let projected = self.project_all(&quad);
        let smooth = self.smooth;
        for [a, b, c] in tess::fill_triangles(Primitive::Quads, 4) {
            if let (Some(a), Some(b), Some(c)) = (projected[a], projected[b], projected[c]) {
                self.surface.fill_triangle([a, b, c], smooth, Some(image));
            }
        }
        Ok(())
    }

    fn read_pixels(&mut self) -> BackendResult<Image> {
        Ok(self.surface.color().clone())
    }

    fn camera_default(&mut self) -> BackendResult {
        self.transform.camera_default();
        Ok(())
    }

    fn camera(&mut self, eye: Vec3, center: Vec3, up: Vec3) -> BackendResult {
        self.transform.camera(eye, center, up)
    }

    fn begin_camera(&mut self) -> BackendResult {
        self.transform.begin_camera()
    }

    fn end_camera(&mut self) -> BackendResult {
        self.transform.end_camera()
    }

    fn ortho(&mut self, bounds: Ortho) -> BackendResult {
        self.transform.ortho(bounds)
    }

    fn cursor(&mut self, kind: Option<CursorKind>) -> BackendResult {
        self.cursor = kind;
        Ok(())
    }

    fn capture_frame(&mut self) -> BackendResult<FrameSnapshot> {
        Ok(FrameSnapshot::Pixels(self.surface.color().clone()))
    }

    fn replay_frame(&mut self, snapshot: &FrameSnapshot) -> BackendResult {
        match snapshot {
            FrameSnapshot::Pixels(img)
                if (img.width(), img.height()) == (self.surface.width(), self.surface.height()) =>
            {
                self.surface.restore(img);
                Ok(())
            }
            FrameSnapshot::Pixels(img) => Err(Self::invalid(
                "replay_frame",
                format!(
                    "snapshot is {}x{}, canvas is {}x{}",
                    img.width(),
                    img.height(),
                    self.surface.width(),
                    self.surface.height()
                ),
            )),
            FrameSnapshot::Commands(_) => Err(BackendError::Unsupported {
                backend: Self::NAME,
                op: "replay_frame(commands)",
            }),
        }
    }

    fn framebuffer(&self) -> Option<&Image> {
        Some(self.surface.color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> ColorRgba {
        ColorRgba::new(1.0, 0.0, 0.0, 1.0)
    }

    fn px(r: &RasterRenderer, x: u32, y: u32) -> [u8; 4] {
        r.framebuffer().and_then(|f| f.pixel(x, y)).unwrap()
    }

    fn shape(r: &mut RasterRenderer, primitive: Primitive, pass: Pass, pts: &[(f32, f32)], color: ColorRgba) {
        r.begin_shape(primitive, pass).unwrap();
        for &(x, y) in pts {
            r.vertex(&RenderVertex::new(Vec3::new(x, y, 0.0), color)).unwrap();
        }
        r.end_shape().unwrap();
    }

    // ── shapes ────────────────────────────────────────────────────────────

    #[test]
    fn filled_quad_lands_on_canvas_pixels() {
        let mut r = RasterRenderer::new(40, 40);
        r.background(ColorRgba::white()).unwrap();
        let quad = [(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)];
        shape(&mut r, Primitive::Quads, Pass::Fill, &quad, red());

        assert_eq!(px(&r, 20, 20), [255, 0, 0, 255]);
        assert_eq!(px(&r, 5, 5), [255, 255, 255, 255]);
        assert_eq!(px(&r, 35, 20), [255, 255, 255, 255]);
    }

    #[test]
    fn outline_pass_leaves_interior_untouched() {
        let mut r = RasterRenderer::new(40, 40);
        r.background(ColorRgba::white()).unwrap();
        r.stroke_weight(3.0).unwrap();
        let quad = [(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (10.0, 30.0)];
        shape(&mut r, Primitive::LineLoop, Pass::Outline, &quad, red());

        assert_eq!(px(&r, 20, 20), [255, 255, 255, 255]);
        assert_eq!(px(&r, 20, 10), [255, 0, 0, 255]);
    }

    #[test]
    fn translate_shifts_geometry() {
        let mut r = RasterRenderer::new(40, 40);
        r.translate(Vec3::new(20.0, 0.0, 0.0)).unwrap();
        shape(&mut r, Primitive::Points, Pass::Outline, &[(5.2, 5.2)], red());
        assert_eq!(px(&r, 25, 5), [255, 0, 0, 255]);
        assert_eq!(px(&r, 5, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn vertex_outside_shape_is_rejected() {
        let mut r = RasterRenderer::new(4, 4);
        assert!(r.vertex(&RenderVertex::new(Vec3::ZERO, red())).is_err());
        assert!(r.end_shape().is_err());
    }

    // ── solids & arcs ─────────────────────────────────────────────────────

    #[test]
    fn full_arc_fills_ellipse_center() {
        let mut r = RasterRenderer::new(40, 40);
        let style = SolidStyle {
            fill: Some(red()),
            stroke: None,
        };
        r.arc(Rect::new(10.0, 10.0, 20.0, 20.0), 0.0, TAU, style).unwrap();
        assert_eq!(px(&r, 20, 20), [255, 0, 0, 255]);
        assert_eq!(px(&r, 11, 11), [0, 0, 0, 0]);
    }

    #[test]
    fn box_covers_its_center() {
        let mut r = RasterRenderer::new(50, 50);
        r.translate(Vec3::new(25.0, 25.0, 0.0)).unwrap();
        let style = SolidStyle {
            fill: Some(red()),
            stroke: None,
        };
        r.draw_box(Vec3::splat(10.0), style).unwrap();
        assert_eq!(px(&r, 25, 25), [255, 0, 0, 255]);
        assert_eq!(px(&r, 2, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn sphere_mesh_is_cached_per_detail() {
        let mut r = RasterRenderer::new(20, 20);
        let style = SolidStyle::default();
        r.draw_sphere(5.0, 12, style).unwrap();
        assert_eq!(r.sphere.as_ref().map(|(d, _)| *d), Some(12));
        r.draw_sphere(5.0, 12, style).unwrap();
        r.draw_sphere(5.0, 6, style).unwrap();
        assert_eq!(r.sphere.as_ref().map(|(d, _)| *d), Some(6));
    }

    // ── images & snapshots ────────────────────────────────────────────────

    #[test]
    fn image_blits_into_dest_rect() {
        let mut r = RasterRenderer::new(20, 20);
        let img = Image::filled(4, 4, ColorRgba::new(0.0, 0.0, 1.0, 1.0));
        r.image(&img, Rect::new(5.0, 5.0, 10.0, 10.0)).unwrap();
        assert_eq!(px(&r, 10, 10), [0, 0, 255, 255]);
        assert_eq!(px(&r, 2, 10), [0, 0, 0, 0]);
    }

    #[test]
    fn snapshot_replay_restores_pixels() {
        let mut r = RasterRenderer::new(8, 8);
        r.background(red()).unwrap();
        let snap = r.capture_frame().unwrap();
        r.background(ColorRgba::black()).unwrap();
        r.replay_frame(&snap).unwrap();
        assert_eq!(px(&r, 3, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn snapshot_of_other_size_is_rejected() {
        let mut r = RasterRenderer::new(8, 8);
        let snap = r.capture_frame().unwrap();
        r.size(16, 8).unwrap();
        assert!(matches!(
            r.replay_frame(&snap),
            Err(BackendError::InvalidArgument { op: "replay_frame", .. })
        ));
    }

    #[test]
    fn read_pixels_matches_framebuffer() {
        let mut r = RasterRenderer::new(3, 2);
        r.background(ColorRgba::gray(0.5)).unwrap();
        let img = r.read_pixels().unwrap();
        assert_eq!(Some(&img), r.framebuffer());
    }
}
