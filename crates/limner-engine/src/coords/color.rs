/// Straight-alpha RGBA color with four channels in `[0, 1]`.
///
/// This is the encoding used at the drawing API surface. Backends convert to
/// whatever their device needs (8-bit channels, premultiplied, ...).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all color channels set to `v`.
    #[inline]
    pub const fn gray(v: f32) -> Self {
        Self::new(v, v, v, 1.0)
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Clamps every channel to `[0, 1]`. Non-finite channels become 0.
    #[inline]
    pub fn clamped(self) -> Self {
        fn c(v: f32) -> f32 {
            if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
        }
        Self::new(c(self.r), c(self.g), c(self.b), c(self.a))
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    #[inline]
    pub fn lerp(self, other: ColorRgba, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Componentwise product, used to tint sampled texels.
    #[inline]
    pub fn modulate(self, other: ColorRgba) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b, self.a * other.a)
    }

    /// Converts to 8-bit straight-alpha RGBA.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    #[inline]
    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }
}

impl From<[f32; 4]> for ColorRgba {
    #[inline]
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<(f32, f32, f32, f32)> for ColorRgba {
    #[inline]
    fn from((r, g, b, a): (f32, f32, f32, f32)) -> Self {
        Self::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_round_trip_of_extremes() {
        assert_eq!(ColorRgba::white().to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(ColorRgba::transparent().to_rgba8(), [0, 0, 0, 0]);
        assert_eq!(ColorRgba::from_rgba8([255, 0, 255, 0]), ColorRgba::new(1.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn clamped_handles_out_of_range_and_nan() {
        let c = ColorRgba::new(1.5, -0.5, f32::NAN, 0.5).clamped();
        assert_eq!(c, ColorRgba::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn lerp_midpoint() {
        let c = ColorRgba::black().lerp(ColorRgba::white(), 0.5);
        assert_eq!(c, ColorRgba::new(0.5, 0.5, 0.5, 1.0));
    }
}
