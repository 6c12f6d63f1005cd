use crate::coords::{ColorRgba, Viewport};
use crate::input::CursorKind;

use super::AnchorMode;

pub const DEFAULT_WIDTH: u32 = 100;
pub const DEFAULT_HEIGHT: u32 = 100;

/// Stroke or fill setting: an on/off switch and a color.
///
/// The two are independent. Turning a brush off keeps its color so that
/// turning it back on restores exactly what was set before.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Brush {
    pub enabled: bool,
    pub color: ColorRgba,
}

impl Brush {
    pub const fn new(color: ColorRgba) -> Self {
        Self { enabled: true, color }
    }

    /// The color to paint with, or `None` when disabled.
    #[inline]
    pub fn active(self) -> Option<ColorRgba> {
        self.enabled.then_some(self.color)
    }
}

/// Mutable drawing state read by the shape builder and backends.
#[derive(Debug, Clone)]
pub struct DrawingContext {
    pub width: u32,
    pub height: u32,

    pub stroke: Brush,
    pub fill: Brush,
    pub stroke_weight: f32,

    pub rect_mode: AnchorMode,
    pub ellipse_mode: AnchorMode,

    /// Segments per Bézier curve. Zero means unset: curves collapse to
    /// a single segment ending at the curve's endpoint.
    pub bezier_detail: u32,
    pub sphere_detail: u32,

    pub frame_rate: f32,
    pub smooth: bool,

    /// `None` hides the cursor.
    pub cursor: Option<CursorKind>,

    /// Inside a `begin_camera`/`end_camera` block.
    pub camera_block: bool,
}

impl Default for DrawingContext {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            stroke: Brush::new(ColorRgba::black()),
            fill: Brush::new(ColorRgba::black()),
            stroke_weight: 1.0,
            rect_mode: AnchorMode::Corner,
            ellipse_mode: AnchorMode::Center,
            bezier_detail: 0,
            sphere_detail: 30,
            frame_rate: 60.0,
            smooth: false,
            cursor: Some(CursorKind::Arrow),
            camera_block: false,
        }
    }
}

impl DrawingContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32, self.height as f32)
    }

    pub fn set_stroke(&mut self, color: ColorRgba) {
        self.stroke = Brush::new(color);
    }

    pub fn set_fill(&mut self, color: ColorRgba) {
        self.fill = Brush::new(color);
    }
}
