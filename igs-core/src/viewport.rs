/// Display space to device pixels
use nalgebra::Point2;

use crate::geometry::Segment2;

/// Fraction of the device area the window is mapped onto
pub const WINDOW_TO_VIEWPORT_RATIO: f64 = 0.95;

/// A device surface of `width × height` pixels with a y-down origin.
///
/// Display coordinates in `[0, 1]²` are shrunk by `ratio` around the center
/// so the clip border stays visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ratio: WINDOW_TO_VIEWPORT_RATIO,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn to_screen(&self, point: &Point2<f64>) -> Point2<f64> {
        let offset = (1.0 - self.ratio) / 2.0;
        Point2::new(
            (offset + point.x * self.ratio) * self.width,
            (1.0 - (offset + point.y * self.ratio)) * self.height,
        )
    }

    pub fn segment_to_screen(&self, segment: &Segment2) -> Segment2 {
        Segment2::new(self.to_screen(&segment.start), self.to_screen(&segment.end))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
