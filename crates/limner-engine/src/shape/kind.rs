use crate::error::LogicError;
use crate::render::Primitive;

/// Primitive type chosen at `begin_shape`.
///
/// Discriminants are the raw codes sketches pass as integers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum ShapeKind {
    Points = 16,
    Lines = 32,
    Triangles = 64,
    TriangleStrip = 65,
    TriangleFan = 66,
    Quads = 128,
    QuadStrip = 129,
    Polygon = 256,
}

impl ShapeKind {
    /// Points and lines have no interior, so they skip the fill pass.
    #[inline]
    pub fn has_fill(self) -> bool {
        !matches!(self, ShapeKind::Points | ShapeKind::Lines)
    }

    #[inline]
    pub fn primitive(self) -> Primitive {
        match self {
            ShapeKind::Points => Primitive::Points,
            ShapeKind::Lines => Primitive::Lines,
            ShapeKind::Triangles => Primitive::Triangles,
            ShapeKind::TriangleStrip => Primitive::TriangleStrip,
            ShapeKind::TriangleFan => Primitive::TriangleFan,
            ShapeKind::Quads => Primitive::Quads,
            ShapeKind::QuadStrip => Primitive::QuadStrip,
            ShapeKind::Polygon => Primitive::Polygon,
        }
    }

    /// Primitive for the outline pass. Only polygons care about `close`.
    #[inline]
    pub fn outline_primitive(self, close: CloseMode) -> Primitive {
        match (self, close) {
            (ShapeKind::Polygon, CloseMode::Close) => Primitive::LineLoop,
            (ShapeKind::Polygon, CloseMode::Open) => Primitive::LineStrip,
            (other, _) => other.primitive(),
        }
    }
}

impl TryFrom<i32> for ShapeKind {
    type Error = LogicError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            16 => ShapeKind::Points,
            32 => ShapeKind::Lines,
            64 => ShapeKind::Triangles,
            65 => ShapeKind::TriangleStrip,
            66 => ShapeKind::TriangleFan,
            128 => ShapeKind::Quads,
            129 => ShapeKind::QuadStrip,
            256 => ShapeKind::Polygon,
            other => return Err(LogicError::UnknownShapeKind(other)),
        })
    }
}

/// Whether a polygon's outline returns to its first vertex.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum CloseMode {
    #[default]
    Open = 1,
    Close = 2,
}

impl TryFrom<i32> for CloseMode {
    type Error = LogicError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CloseMode::Open),
            2 => Ok(CloseMode::Close),
            other => Err(LogicError::UnknownCloseMode(other)),
        }
    }
}
