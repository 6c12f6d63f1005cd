/// Canvas size in pixels.
///
/// Backends use this as the basis for mapping normalized device coordinates
/// back to canvas pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    #[inline]
    pub fn aspect(self) -> f32 {
        if self.height > 0.0 { self.width / self.height } else { 1.0 }
    }

    /// Maps NDC `x, y` in `[-1, 1]` to canvas pixels.
    ///
    /// NDC `y = -1` lands on the top row: the default camera looks at a
    /// y-down world with a y-up basis, so no flip is needed here.
    #[inline]
    pub fn ndc_to_screen(self, x: f32, y: f32) -> (f32, f32) {
        ((x + 1.0) * 0.5 * self.width, (y + 1.0) * 0.5 * self.height)
    }
}
