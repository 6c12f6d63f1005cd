use crate::coords::Rect;
use crate::error::LogicError;

/// Convention for interpreting the four numbers passed to `rect`/`ellipse`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AnchorMode {
    /// `(x, y)` is the top-left corner, then width and height.
    Corner,
    /// `(x1, y1)` and `(x2, y2)` are opposite corners.
    Corners,
    /// `(x, y)` is the center, then half-width and half-height.
    Radius,
    /// `(x, y)` is the center, then full width and height.
    Center,
}

impl TryFrom<i32> for AnchorMode {
    type Error = LogicError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AnchorMode::Corner),
            1 => Ok(AnchorMode::Corners),
            2 => Ok(AnchorMode::Radius),
            3 => Ok(AnchorMode::Center),
            other => Err(LogicError::UnknownAnchorMode(other)),
        }
    }
}

/// Resolves anchored arguments to a top-left/size rectangle.
///
/// Pure arithmetic; `Corners` input may come in any order and is normalized.
pub fn resolve_anchor(mode: AnchorMode, a: f32, b: f32, c: f32, d: f32) -> Rect {
    match mode {
        AnchorMode::Corner => Rect::new(a, b, c, d),
        AnchorMode::Corners => Rect::new(a, b, c - a, d - b).normalized(),
        AnchorMode::Radius => Rect::new(a - c, b - d, c * 2.0, d * 2.0),
        AnchorMode::Center => Rect::new(a - c * 0.5, b - d * 0.5, c, d),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn center_mode_corners() {
        let c = resolve_anchor(AnchorMode::Center, 10.0, 10.0, 4.0, 4.0).corners();
        assert_eq!(
            c,
            [
                Vec2::new(8.0, 8.0),
                Vec2::new(12.0, 8.0),
                Vec2::new(12.0, 12.0),
                Vec2::new(8.0, 12.0),
            ]
        );
    }

    #[test]
    fn corner_mode_corners() {
        let c = resolve_anchor(AnchorMode::Corner, 10.0, 10.0, 4.0, 4.0).corners();
        assert_eq!(
            c,
            [
                Vec2::new(10.0, 10.0),
                Vec2::new(14.0, 10.0),
                Vec2::new(14.0, 14.0),
                Vec2::new(10.0, 14.0),
            ]
        );
    }

    #[test]
    fn corners_mode_accepts_reversed_points() {
        let r = resolve_anchor(AnchorMode::Corners, 14.0, 14.0, 10.0, 10.0);
        assert_eq!(r, Rect::new(10.0, 10.0, 4.0, 4.0));
    }

    #[test]
    fn radius_mode_doubles_extent() {
        let r = resolve_anchor(AnchorMode::Radius, 10.0, 10.0, 4.0, 2.0);
        assert_eq!(r, Rect::new(6.0, 8.0, 8.0, 4.0));
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(AnchorMode::try_from(3), Ok(AnchorMode::Center));
        assert_eq!(AnchorMode::try_from(7), Err(LogicError::UnknownAnchorMode(7)));
    }
}
