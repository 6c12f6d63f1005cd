use glam::{Mat4, Vec3};

use crate::coords::{ColorRgba, Rect};
use crate::input::CursorKind;

use super::{Ortho, Pass, Primitive, RenderVertex, SolidStyle};

/// One renderer call, as journaled by command-list backends.
///
/// A list of these is also a frame snapshot: replaying it reproduces the
/// frame without running the sketch's draw callback.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Size { width: u32, height: u32 },
    Smooth(bool),
    StrokeWeight(f32),
    Background(ColorRgba),

    PushMatrix,
    PopMatrix,
    ResetMatrix,
    ApplyMatrix(Mat4),
    Translate(Vec3),
    Rotate { angle: f32, axis: Vec3 },
    Scale(Vec3),

    BeginShape { primitive: Primitive, pass: Pass },
    Vertex(RenderVertex),
    EndShape,

    Arc { bounds: Rect, start: f32, stop: f32, style: SolidStyle },
    Box { size: Vec3, style: SolidStyle },
    Sphere { radius: f32, detail: u32, style: SolidStyle },

    Image { width: u32, height: u32, dest: Rect },
    ReadPixels,

    CameraDefault,
    Camera { eye: Vec3, center: Vec3, up: Vec3 },
    BeginCamera,
    EndCamera,
    Ortho(Ortho),

    Cursor(Option<CursorKind>),

    CaptureFrame,
    /// Marker for a cache replay; `ops` is the length of the replayed list.
    ReplayFrame { ops: usize },
}

impl RenderOp {
    /// Name of the renderer entry this op records.
    pub fn name(&self) -> &'static str {
        match self {
            RenderOp::Size { .. } => "size",
            RenderOp::Smooth(_) => "smooth",
            RenderOp::StrokeWeight(_) => "stroke_weight",
            RenderOp::Background(_) => "background",
            RenderOp::PushMatrix => "push_matrix",
            RenderOp::PopMatrix => "pop_matrix",
            RenderOp::ResetMatrix => "reset_matrix",
            RenderOp::ApplyMatrix(_) => "apply_matrix",
            RenderOp::Translate(_) => "translate",
            RenderOp::Rotate { .. } => "rotate",
            RenderOp::Scale(_) => "scale",
            RenderOp::BeginShape { .. } => "begin_shape",
            RenderOp::Vertex(_) => "vertex",
            RenderOp::EndShape => "end_shape",
            RenderOp::Arc { .. } => "arc",
            RenderOp::Box { .. } => "box",
            RenderOp::Sphere { .. } => "sphere",
            RenderOp::Image { .. } => "image",
            RenderOp::ReadPixels => "read_pixels",
            RenderOp::CameraDefault => "camera_default",
            RenderOp::Camera { .. } => "camera",
            RenderOp::BeginCamera => "begin_camera",
            RenderOp::EndCamera => "end_camera",
            RenderOp::Ortho(_) => "ortho",
            RenderOp::Cursor(_) => "cursor",
            RenderOp::CaptureFrame => "capture_frame",
            RenderOp::ReplayFrame { .. } => "replay_frame",
        }
    }

    /// Whether the op changes pixels (as opposed to state or queries).
    pub fn draws(&self) -> bool {
        matches!(
            self,
            RenderOp::Background(_)
                | RenderOp::EndShape
                | RenderOp::Arc { .. }
                | RenderOp::Box { .. }
                | RenderOp::Sphere { .. }
                | RenderOp::Image { .. }
                | RenderOp::ReplayFrame { .. }
        )
    }
}
