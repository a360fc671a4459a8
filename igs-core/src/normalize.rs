/// Mapping between window coordinates, normalized device space and clip space
use nalgebra::{Point2, Vector2};

use crate::error::{Error, Result};

const EPSILON: f64 = 1e-12;

/// Axis-aligned window bounds in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds {
    pub fn new(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_coords(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::new(Point2::new(x_min, y_min), Point2::new(x_max, y_max))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Fail unless both extents are finite and non-zero
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        if !width.is_finite() || !height.is_finite() || width.abs() < EPSILON || height.abs() < EPSILON
        {
            return Err(Error::DegenerateWindow { width, height });
        }
        Ok(())
    }
}

/// Map window coordinates into `[0, 1]²`
pub fn normalize(vertices: &[Point2<f64>], bounds: &Bounds) -> Result<Vec<Point2<f64>>> {
    bounds.validate()?;
    let (width, height) = (bounds.width(), bounds.height());
    Ok(vertices
        .iter()
        .map(|p| Point2::new((p.x - bounds.min.x) / width, (p.y - bounds.min.y) / height))
        .collect())
}

/// Inverse of [`normalize`] for a single point
pub fn denormalize(point: &Point2<f64>, bounds: &Bounds) -> Result<Point2<f64>> {
    bounds.validate()?;
    Ok(Point2::new(
        bounds.min.x + point.x * bounds.width(),
        bounds.min.y + point.y * bounds.height(),
    ))
}

/// Angle (radians, clockwise from +Y) of the 2D view-up vector
pub fn up_angle(up: &Vector2<f64>) -> Result<f64> {
    if up.norm() < EPSILON {
        return Err(Error::DegenerateVector { name: "view-up" });
    }
    Ok(up.x.atan2(up.y))
}

/// Rotate `vertices` about the window center so that `up` points along +Y.
pub fn align_z_axis(
    vertices: &[Point2<f64>],
    bounds: &Bounds,
    up: &Vector2<f64>,
) -> Result<Vec<Point2<f64>>> {
    let (sin_a, cos_a) = up_angle(up)?.sin_cos();
    let center = bounds.center();

    Ok(vertices
        .iter()
        .map(|p| {
            let (x, y) = (p.x - center.x, p.y - center.y);
            Point2::new(
                x * cos_a - y * sin_a + center.x,
                x * sin_a + y * cos_a + center.y,
            )
        })
        .collect())
}

/// `[0, 1]²` to clip space `[-1, 1]²`
pub fn to_clip_space(point: &Point2<f64>) -> Point2<f64> {
    Point2::new(point.x * 2.0 - 1.0, point.y * 2.0 - 1.0)
}

/// Clip space `[-1, 1]²` back to `[0, 1]²`
pub fn from_clip_space(point: &Point2<f64>) -> Point2<f64> {
    Point2::new((point.x + 1.0) / 2.0, (point.y + 1.0) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_normalize_corners() {
        let bounds = Bounds::from_coords(0.0, 0.0, 1920.0, 1080.0);
        let out = normalize(
            &[Point2::new(0.0, 0.0), Point2::new(960.0, 540.0), Point2::new(1920.0, 1080.0)],
            &bounds,
        )
        .unwrap();
        assert_abs_diff_eq!(out[0], Point2::new(0.0, 0.0), epsilon = 1e-12);
        assert_abs_diff_eq!(out[1], Point2::new(0.5, 0.5), epsilon = 1e-12);
        assert_abs_diff_eq!(out[2], Point2::new(1.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_round_trip() {
        let windows = [
            Bounds::from_coords(0.0, 0.0, 1920.0, 1080.0),
            Bounds::from_coords(-3.5, 2.0, 7.25, 2.5),
            Bounds::from_coords(-1e4, -1e-2, 1e4, 1e-2),
        ];
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(-123.4, 567.8),
            Point2::new(1e3, -1e3),
        ];
        for bounds in &windows {
            let normalized = normalize(&points, bounds).unwrap();
            for (original, n) in points.iter().zip(&normalized) {
                let back = denormalize(n, bounds).unwrap();
                assert_abs_diff_eq!(back, *original, epsilon = 1e-9 * original.coords.norm().max(1.0));
            }
        }
    }

    #[test]
    fn test_degenerate_window_fails() {
        let flat = Bounds::from_coords(0.0, 5.0, 10.0, 5.0);
        assert!(matches!(
            normalize(&[Point2::origin()], &flat),
            Err(Error::DegenerateWindow { .. })
        ));
        assert!(denormalize(&Point2::origin(), &flat).is_err());
    }

    #[test]
    fn test_align_identity_for_default_up() {
        let bounds = Bounds::from_coords(0.0, 0.0, 100.0, 50.0);
        let p = Point2::new(12.0, 34.0);
        let aligned = align_z_axis(&[p], &bounds, &Vector2::new(0.0, 1.0)).unwrap();
        assert_abs_diff_eq!(aligned[0], p, epsilon = 1e-12);
    }

    #[test]
    fn test_align_rotates_up_onto_y() {
        // Window up points along +X: a point right of center ends up above it
        let bounds = Bounds::from_coords(-10.0, -10.0, 10.0, 10.0);
        let aligned = align_z_axis(&[Point2::new(5.0, 0.0)], &bounds, &Vector2::new(1.0, 0.0)).unwrap();
        assert_abs_diff_eq!(aligned[0], Point2::new(0.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_align_keeps_window_center() {
        let bounds = Bounds::from_coords(100.0, 100.0, 200.0, 300.0);
        let center = bounds.center();
        let aligned = align_z_axis(&[center], &bounds, &Vector2::new(-0.6, 0.8)).unwrap();
        assert_abs_diff_eq!(aligned[0], center, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_up_fails() {
        let bounds = Bounds::from_coords(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            align_z_axis(&[Point2::origin()], &bounds, &Vector2::zeros()),
            Err(Error::DegenerateVector { name: "view-up" })
        );
    }

    #[test]
    fn test_clip_space_conversion() {
        let p = Point2::new(0.25, 1.0);
        assert_eq!(to_clip_space(&p), Point2::new(-0.5, 1.0));
        assert_eq!(from_clip_space(&to_clip_space(&p)), p);
    }
}
