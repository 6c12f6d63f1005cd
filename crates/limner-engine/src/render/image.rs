use crate::coords::ColorRgba;
use crate::error::{BackendError, BackendResult};

/// Tightly packed RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Image {
    /// Transparent image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn filled(width: u32, height: u32, color: ColorRgba) -> Self {
        let mut img = Self::new(width, height);
        img.fill(color);
        img
    }

    /// Wraps existing RGBA8 bytes; the length must match the size.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> BackendResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(BackendError::InvalidArgument {
                op: "image",
                reason: format!("{} bytes for {width}x{height} (expected {expected})", pixels.len()),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixels as RGBA quadruples, row-major.
    #[inline]
    pub fn texels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn texels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.pixels)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(x, y)?;
        Some(self.texels()[i])
    }

    /// Writes one pixel; out-of-bounds writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.texels_mut()[i] = px;
        }
    }

    pub fn fill(&mut self, color: ColorRgba) {
        self.texels_mut().fill(color.to_rgba8());
    }

    /// Nearest-neighbour lookup with `u, v` clamped to `[0, 1]`.
    pub fn sample(&self, u: f32, v: f32) -> ColorRgba {
        if self.is_empty() {
            return ColorRgba::transparent();
        }
        let x = ((u.clamp(0.0, 1.0) * self.width as f32) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f32) as u32).min(self.height - 1);
        self.pixel(x, y).map(ColorRgba::from_rgba8).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_checks_length() {
        assert!(Image::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Image::from_rgba8(2, 2, vec![0; 15]),
            Err(BackendError::InvalidArgument { op: "image", .. })
        ));
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut img = Image::new(2, 2);
        img.set_pixel(5, 0, [1, 2, 3, 4]);
        assert_eq!(img.pixel(5, 0), None);
        assert!(img.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn sample_picks_nearest_texel() {
        let mut img = Image::new(2, 1);
        img.set_pixel(1, 0, [255, 0, 0, 255]);
        assert_eq!(img.sample(0.9, 0.5), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(img.sample(1.0, 0.0), ColorRgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(img.sample(0.1, 0.5), ColorRgba::transparent());
    }
}
