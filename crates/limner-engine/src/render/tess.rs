//! Tessellation helpers: how each primitive breaks into triangles and
//! edges, plus meshes for the built-in solids.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::coords::Rect;

use super::Primitive;

/// Minimum segment count for curved outlines and spheres.
pub const MIN_SEGMENTS: u32 = 3;

/// Upper bound on sphere segments; keeps vertex indices within `u32`.
pub const MAX_SPHERE_SEGMENTS: u32 = 512;

/// Triangles covering the interior of `n` vertices laid out as `primitive`.
///
/// Incomplete trailing groups (a lone vertex after the last full quad, say)
/// are ignored, as are primitives without an interior.
pub fn fill_triangles(primitive: Primitive, n: usize) -> Vec<[usize; 3]> {
    let mut out = Vec::new();
    match primitive {
        Primitive::Triangles => {
            for i in (0..n.saturating_sub(2)).step_by(3) {
                out.push([i, i + 1, i + 2]);
            }
        }
        Primitive::TriangleStrip => {
            for i in 0..n.saturating_sub(2) {
                out.push([i, i + 1, i + 2]);
            }
        }
        Primitive::TriangleFan | Primitive::Polygon => {
            for i in 1..n.saturating_sub(1) {
                out.push([0, i, i + 1]);
            }
        }
        Primitive::Quads => {
            for i in (0..n.saturating_sub(3)).step_by(4) {
                out.push([i, i + 1, i + 2]);
                out.push([i, i + 2, i + 3]);
            }
        }
        Primitive::QuadStrip => {
            for i in (0..n.saturating_sub(3)).step_by(2) {
                out.push([i, i + 1, i + 3]);
                out.push([i, i + 3, i + 2]);
            }
        }
        Primitive::Points | Primitive::Lines | Primitive::LineStrip | Primitive::LineLoop => {}
    }
    out
}

/// Edges drawn by the outline pass of `n` vertices laid out as `primitive`.
///
/// Area primitives outline every sub-polygon, the way a polygon-mode line
/// rasterizer would. A `Polygon` outline is closed.
pub fn outline_segments(primitive: Primitive, n: usize) -> Vec<[usize; 2]> {
    fn ring(out: &mut Vec<[usize; 2]>, idx: &[usize]) {
        for k in 0..idx.len() {
            out.push([idx[k], idx[(k + 1) % idx.len()]]);
        }
    }

    let mut out = Vec::new();
    match primitive {
        Primitive::Points => {}
        Primitive::Lines => {
            for i in (0..n.saturating_sub(1)).step_by(2) {
                out.push([i, i + 1]);
            }
        }
        Primitive::LineStrip => {
            for i in 0..n.saturating_sub(1) {
                out.push([i, i + 1]);
            }
        }
        Primitive::LineLoop | Primitive::Polygon => {
            if n >= 2 {
                ring(&mut out, &(0..n).collect::<Vec<_>>());
            }
        }
        Primitive::QuadStrip => {
            for i in (0..n.saturating_sub(3)).step_by(2) {
                ring(&mut out, &[i, i + 1, i + 3, i + 2]);
            }
        }
        Primitive::Quads => {
            for i in (0..n.saturating_sub(3)).step_by(4) {
                ring(&mut out, &[i, i + 1, i + 2, i + 3]);
            }
        }
        Primitive::Triangles | Primitive::TriangleStrip | Primitive::TriangleFan => {
            for [a, b, c] in fill_triangles(primitive, n) {
                ring(&mut out, &[a, b, c]);
            }
        }
    }
    out
}

/// Point on the cubic Bézier `p0, c1, c2, p3` at `t`.
pub fn bezier_point(p0: Vec3, c1: Vec3, c2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Segment count for an elliptical arc inside `bounds` sweeping `sweep` radians.
pub fn arc_segments(bounds: Rect, sweep: f32) -> u32 {
    let r = bounds.width.abs().max(bounds.height.abs()) * 0.5;
    let full = (r * TAU / 4.0).clamp(16.0, 256.0);
    ((full * sweep.abs() / TAU).ceil() as u32).max(MIN_SEGMENTS)
}

/// Points along the ellipse inscribed in `bounds` from `start` to `stop`.
///
/// Angles run clockwise on screen (y down). The first and last points sit
/// exactly on `start` and `stop`.
pub fn arc_points(bounds: Rect, start: f32, stop: f32) -> Vec<Vec2> {
    let center = bounds.center();
    let radii = Vec2::new(bounds.width * 0.5, bounds.height * 0.5);
    let segments = arc_segments(bounds, stop - start);
    (0..=segments)
        .map(|i| {
            let a = start + (stop - start) * (i as f32 / segments as f32);
            center + radii * Vec2::new(a.cos(), a.sin())
        })
        .collect()
}

/// Indexed triangle mesh with its wireframe edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub edges: Vec<[u32; 2]>,
}

/// Unit cube centered on the origin (edge length 1).
pub fn box_mesh() -> Mesh {
    let positions = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -0.5 } else { 0.5 },
                if i & 2 == 0 { -0.5 } else { 0.5 },
                if i & 4 == 0 { -0.5 } else { 0.5 },
            )
        })
        .collect();

    const FACES: [[u32; 4]; 6] = [
        [0, 1, 3, 2],
        [4, 6, 7, 5],
        [0, 4, 5, 1],
        [2, 3, 7, 6],
        [0, 2, 6, 4],
        [1, 5, 7, 3],
    ];
    let triangles = FACES
        .iter()
        .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
        .collect();

    let mut edges = Vec::with_capacity(12);
    for a in 0u32..8 {
        for bit in [1, 2, 4] {
            if a & bit == 0 {
                edges.push([a, a | bit]);
            }
        }
    }

    Mesh {
        positions,
        triangles,
        edges,
    }
}

/// Unit-radius UV sphere with `detail` segments around and `detail` rings
/// from pole to pole. `detail` is clamped to
/// `MIN_SEGMENTS..=MAX_SPHERE_SEGMENTS`.
pub fn sphere_mesh(detail: u32) -> Mesh {
    let slices = detail.clamp(MIN_SEGMENTS, MAX_SPHERE_SEGMENTS);
    let rings = slices;

    // (rings + 1) rows of slices vertices; poles are repeated per slice so
    // the indexing stays a regular grid.
    let mut positions = Vec::with_capacity(((rings + 1) * slices) as usize);
    for r in 0..=rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        let (sp, cp) = phi.sin_cos();
        for s in 0..slices {
            let theta = TAU * s as f32 / slices as f32;
            let (st, ct) = theta.sin_cos();
            positions.push(Vec3::new(sp * ct, -cp, sp * st));
        }
    }

    let at = |r: u32, s: u32| r * slices + (s % slices);
    let mut triangles = Vec::with_capacity((rings * slices * 2) as usize);
    let mut edges = Vec::with_capacity((rings * slices * 2) as usize);
    for r in 0..rings {
        for s in 0..slices {
            let (a, b, c, d) = (at(r, s), at(r, s + 1), at(r + 1, s + 1), at(r + 1, s));
            if r != 0 {
                triangles.push([a, b, c]);
                edges.push([a, b]);
            }
            if r + 1 != rings {
                triangles.push([a, c, d]);
            }
            edges.push([a, d]);
        }
    }

    Mesh {
        positions,
        triangles,
        edges,
    }
}
