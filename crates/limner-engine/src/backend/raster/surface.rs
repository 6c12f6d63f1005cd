//! CPU color + depth buffers and the scan-conversion routines that write them.
//!
//! Pixel `(x, y)` covers `[x, x + 1) × [y, y + 1)` and is sampled at its
//! center. Depth is NDC z, smaller is nearer; the test is less-or-equal so
//! an outline drawn over its own fill at the same depth stays visible.

use glam::{Vec2, Vec3};

use crate::coords::ColorRgba;
use crate::render::Image;

/// A vertex after projection: `pos.x/pos.y` in canvas pixels, `pos.z` depth.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenVertex {
    pub pos: Vec3,
    pub color: ColorRgba,
    pub uv: Vec2,
}

impl ScreenVertex {
    #[inline]
    fn xy(&self) -> Vec2 {
        self.pos.truncate()
    }
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[derive(Debug, Clone)]
pub struct Surface {
    color: Image,
    depth: Vec<f32>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color: Image::new(width, height),
            depth: vec![f32::INFINITY; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    #[inline]
    pub fn color(&self) -> &Image {
        &self.color
    }

    /// Reallocates both buffers. Contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Fills color and resets depth.
    pub fn clear(&mut self, color: ColorRgba) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    /// Overwrites the color buffer with `image` and resets depth. Sizes must
    /// match; the caller checks.
    pub fn restore(&mut self, image: &Image) {
        self.color.pixels_mut().copy_from_slice(image.pixels());
        self.depth.fill(f32::INFINITY);
    }

    /// Depth test, then source-over blend of `src` scaled by `coverage`.
    fn plot(&mut self, x: u32, y: u32, z: f32, src: ColorRgba, coverage: f32) {
        if !(-1.0..=1.0).contains(&z) {
            return;
        }
        let i = y as usize * self.width() as usize + x as usize;
        if z > self.depth[i] {
            return;
        }
        let a = (src.a * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        if let Some(dst) = self.color.pixel(x, y) {
            let d = ColorRgba::from_rgba8(dst);
            let mut out = d.lerp(src, a);
            out.a = a + d.a * (1.0 - a);
            self.color.set_pixel(x, y, out.to_rgba8());
            self.depth[i] = z;
        }
    }

    /// Pixel range covering `[lo, hi]` on one axis, clamped to `limit`.
    fn span(lo: f32, hi: f32, limit: u32) -> std::ops::Range<u32> {
        let start = lo.floor().max(0.0) as u32;
        let end = (hi.ceil().max(0.0) as u32).min(limit);
        start.min(end)..end
    }

    // ── triangles ─────────────────────────────────────────────────────────

    /// Gouraud-shaded triangle, optionally textured (texel × vertex color).
    ///
    /// With `smooth`, pixels straddling an edge get partial coverage from
    /// their distance to it.
    pub fn fill_triangle(&mut self, tri: [ScreenVertex; 3], smooth: bool, texture: Option<&Image>) {
        let [a, mut b, mut c] = tri;
        let mut area = edge(a.xy(), b.xy(), c.xy());
        if !area.is_finite() || area.abs() < 1e-6 {
            return;
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }

        let (pa, pb, pc) = (a.xy(), b.xy(), c.xy());
        let lens = [(pc - pb).length(), (pa - pc).length(), (pb - pa).length()];
        let pad = if smooth { 1.0 } else { 0.0 };
        let min = pa.min(pb).min(pc) - Vec2::splat(pad);
        let max = pa.max(pb).max(pc) + Vec2::splat(pad);

        for y in Self::span(min.y, max.y, self.height()) {
            for x in Self::span(min.x, max.x, self.width()) {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w = [edge(pb, pc, p), edge(pc, pa, p), edge(pa, pb, p)];

                let coverage = if smooth {
                    let nearest = (0..3).map(|i| w[i] / lens[i]).fold(f32::INFINITY, f32::min);
                    (nearest + 0.5).clamp(0.0, 1.0)
                } else if w.iter().all(|&v| v >= 0.0) {
                    1.0
                } else {
                    0.0
                };
                if coverage <= 0.0 {
                    continue;
                }

                // Outside pixels (smooth edges) extrapolate; clamp back inside.
                let bary = Vec3::new(w[0], w[1], w[2]).max(Vec3::ZERO);
                let sum = bary.x + bary.y + bary.z;
                if sum <= 0.0 {
                    continue;
                }
                let bary = bary / sum;

                let z = a.pos.z * bary.x + b.pos.z * bary.y + c.pos.z * bary.z;
                let mut color = ColorRgba::new(
                    a.color.r * bary.x + b.color.r * bary.y + c.color.r * bary.z,
                    a.color.g * bary.x + b.color.g * bary.y + c.color.g * bary.z,
                    a.color.b * bary.x + b.color.b * bary.y + c.color.b * bary.z,
                    a.color.a * bary.x + b.color.a * bary.y + c.color.a * bary.z,
                );
                if let Some(tex) = texture {
                    let uv = a.uv * bary.x + b.uv * bary.y + c.uv * bary.z;
                    color = tex.sample(uv.x, uv.y).modulate(color);
                }

                self.plot(x, y, z, color, coverage);
            }
        }
    }

    // ── lines & points ────────────────────────────────────────────────────

    /// Segment of the given width, colors and depth interpolated along it.
    ///
    /// Pixels are tested against the segment's own frame: `along` runs from
    /// `a` to `b`, `across` is the signed distance from the center line.
    pub fn line(&mut self, a: ScreenVertex, b: ScreenVertex, width: f32, smooth: bool) {
        let (pa, pb) = (a.xy(), b.xy());
        let d = pb - pa;
        let len = d.length();
        if !len.is_finite() {
            return;
        }
        if len < 1e-4 {
            self.point(a, width, smooth);
            return;
        }
        let dir = d / len;
        let normal = Vec2::new(-dir.y, dir.x);
        let half = width.max(1.0) * 0.5;
        let pad = half + 1.0;

        let min = pa.min(pb) - Vec2::splat(pad);
        let max = pa.max(pb) + Vec2::splat(pad);

        for y in Self::span(min.y, max.y, self.height()) {
            for x in Self::span(min.x, max.x, self.width()) {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - pa;
                let along = p.dot(dir);
                let across = p.dot(normal);

                let coverage = if smooth {
                    let side = (half - across.abs() + 0.5).clamp(0.0, 1.0);
                    let end = (along.min(len - along) + 0.5).clamp(0.0, 1.0);
                    side * end
                } else if across > -half && across <= half && (0.0..=len).contains(&along) {
                    1.0
                } else {
                    0.0
                };
                if coverage <= 0.0 {
                    continue;
                }

                let t = (along / len).clamp(0.0, 1.0);
                let z = a.pos.z + (b.pos.z - a.pos.z) * t;
                self.plot(x, y, z, a.color.lerp(b.color, t), coverage);
            }
        }
    }

    /// Axis-aligned square of side `size` centered on the vertex.
    pub fn point(&mut self, v: ScreenVertex, size: f32, smooth: bool) {
        let half = size.max(1.0) * 0.5;
        let c = v.xy();
        if !c.is_finite() {
            return;
        }
        let pad = half + 1.0;

        for y in Self::span(c.y - pad, c.y + pad, self.height()) {
            for x in Self::span(c.x - pad, c.x + pad, self.width()) {
                let off = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - c;
                let coverage = if smooth {
                    (half - off.abs().max_element() + 0.5).clamp(0.0, 1.0)
                } else if off.x > -half && off.x <= half && off.y > -half && off.y <= half {
                    1.0
                } else {
                    0.0
                };
                if coverage > 0.0 {
                    self.plot(x, y, v.pos.z, v.color, coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sv(x: f32, y: f32, color: ColorRgba) -> ScreenVertex {
        ScreenVertex {
            pos: Vec3::new(x, y, 0.0),
            color,
            uv: Vec2::ZERO,
        }
    }

    fn red() -> ColorRgba {
        ColorRgba::new(1.0, 0.0, 0.0, 1.0)
    }

    // ── triangles ─────────────────────────────────────────────────────────

    #[test]
    fn triangle_covers_interior_either_winding() {
        for flip in [false, true] {
            let mut s = Surface::new(20, 20);
            s.clear(ColorRgba::white());
            let (b, c) = (sv(18.0, 2.0, red()), sv(2.0, 18.0, red()));
            let tri = if flip { [sv(2.0, 2.0, red()), c, b] } else { [sv(2.0, 2.0, red()), b, c] };
            s.fill_triangle(tri, false, None);

            assert_eq!(s.color().pixel(4, 4), Some([255, 0, 0, 255]));
            assert_eq!(s.color().pixel(16, 16), Some([255, 255, 255, 255]));
        }
    }

    #[test]
    fn triangle_interpolates_vertex_colors() {
        let mut s = Surface::new(64, 64);
        let blue = ColorRgba::new(0.0, 0.0, 1.0, 1.0);
        s.fill_triangle(
            [sv(0.0, 0.0, red()), sv(64.0, 0.0, blue), sv(0.0, 64.0, red())],
            false,
            None,
        );
        let near_a = s.color().pixel(1, 1).unwrap();
        let near_b = s.color().pixel(60, 1).unwrap();
        assert!(near_a[0] > 240 && near_a[2] < 15);
        assert!(near_b[2] > 220 && near_b[0] < 35);
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let mut s = Surface::new(10, 10);
        let blue = ColorRgba::new(0.0, 0.0, 1.0, 1.0);
        let tri = |z: f32, color| {
            [
                ScreenVertex { pos: Vec3::new(0.0, 0.0, z), color, uv: Vec2::ZERO },
                ScreenVertex { pos: Vec3::new(10.0, 0.0, z), color, uv: Vec2::ZERO },
                ScreenVertex { pos: Vec3::new(0.0, 10.0, z), color, uv: Vec2::ZERO },
            ]
        };
        s.fill_triangle(tri(-0.5, red()), false, None);
        s.fill_triangle(tri(0.5, blue), false, None);
        assert_eq!(s.color().pixel(2, 2), Some([255, 0, 0, 255]));
    }

    #[test]
    fn smooth_edges_blend_partially() {
        let mut s = Surface::new(20, 20);
        s.clear(ColorRgba::white());
        s.fill_triangle(
            [sv(0.0, 0.0, red()), sv(20.0, 0.0, red()), sv(0.0, 20.0, red())],
            true,
            None,
        );
        // Pixel (10, 9) straddles the hypotenuse x + y = 20.
        let px = s.color().pixel(10, 9).unwrap();
        assert!(px[1] > 0 && px[1] < 255);
    }

    #[test]
    fn texture_modulates_white() {
        let mut s = Surface::new(4, 4);
        let tex = Image::filled(2, 2, ColorRgba::new(0.0, 1.0, 0.0, 1.0));
        let v = |x: f32, y: f32, u: f32, t: f32| ScreenVertex {
            pos: Vec3::new(x, y, 0.0),
            color: ColorRgba::white(),
            uv: Vec2::new(u, t),
        };
        s.fill_triangle([v(0.0, 0.0, 0.0, 0.0), v(4.0, 0.0, 1.0, 0.0), v(0.0, 4.0, 0.0, 1.0)], false, Some(&tex));
        assert_eq!(s.color().pixel(0, 0), Some([0, 255, 0, 255]));
    }

    // ── lines & points ────────────────────────────────────────────────────

    #[test]
    fn one_pixel_line_hits_a_single_row() {
        let mut s = Surface::new(20, 20);
        s.line(sv(2.0, 10.0, red()), sv(18.0, 10.0, red()), 1.0, false);
        assert_eq!(s.color().pixel(8, 10), Some([255, 0, 0, 255]));
        assert_eq!(s.color().pixel(8, 9), Some([0, 0, 0, 0]));
        assert_eq!(s.color().pixel(8, 11), Some([0, 0, 0, 0]));
    }

    #[test]
    fn point_lights_its_pixel() {
        let mut s = Surface::new(20, 20);
        s.point(sv(10.0, 10.0, red()), 1.0, false);
        assert_eq!(s.color().pixel(10, 10), Some([255, 0, 0, 255]));
        let lit = s.color().pixels().chunks_exact(4).filter(|p| p[3] != 0).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn geometry_outside_surface_is_clipped() {
        let mut s = Surface::new(8, 8);
        s.line(sv(-50.0, -50.0, red()), sv(-10.0, -10.0, red()), 3.0, true);
        s.point(sv(100.0, 4.0, red()), 4.0, false);
        assert!(s.color().pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn clear_resets_depth() {
        let mut s = Surface::new(4, 4);
        let near = ScreenVertex { pos: Vec3::new(0.0, 0.0, -0.9), color: red(), uv: Vec2::ZERO };
        s.point(near, 8.0, false);
        s.clear(ColorRgba::black());
        s.point(sv(1.0, 1.0, red()), 1.0, false);
        assert_eq!(s.color().pixel(1, 1), Some([255, 0, 0, 255]));
    }
}
