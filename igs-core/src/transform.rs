/// Homogeneous transformation matrices
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

use crate::error::{Error, Result};

/// Below this magnitude the homogeneous w component is left undivided
const W_EPSILON: f64 = 1e-10;

/// Rotation angles around the three world axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisAngles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AxisAngles {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation around the X axis
    #[rustfmt::skip]
    pub fn rotation_x(degrees: f64) -> Matrix4<f64> {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Y axis
    #[rustfmt::skip]
    pub fn rotation_y(degrees: f64) -> Matrix4<f64> {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix4::new(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Z axis
    #[rustfmt::skip]
    pub fn rotation_z(degrees: f64) -> Matrix4<f64> {
        let (s, c) = degrees.to_radians().sin_cos();
        Matrix4::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Composite rotation `Rx * Ry * Rz`, so Z is applied to a point first.
    pub fn rotation(angles: &AxisAngles) -> Matrix4<f64> {
        Self::rotation_x(angles.x) * Self::rotation_y(angles.y) * Self::rotation_z(angles.z)
    }

    /// Rotation by `degrees` around the axis running from `axis_start` to `axis_end`
    pub fn rotation_about_axis(
        axis_start: &Point3<f64>,
        axis_end: &Point3<f64>,
        degrees: f64,
    ) -> Result<Matrix4<f64>> {
        let direction = axis_end - axis_start;
        if direction.norm() < W_EPSILON {
            return Err(Error::CoincidentAxisPoints);
        }

        let axis = Unit::new_normalize(direction);
        let rotation = Rotation3::from_axis_angle(&axis, degrees.to_radians()).to_homogeneous();
        Ok(Self::about(axis_start, &rotation))
    }

    /// Create a translation matrix
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(dx, dy, dz))
    }

    /// Create a scale matrix
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Conjugate `matrix` so it acts around `origin` instead of the world origin
    pub fn about(origin: &Point3<f64>, matrix: &Matrix4<f64>) -> Matrix4<f64> {
        Self::translation(origin.x, origin.y, origin.z)
            * matrix
            * Self::translation(-origin.x, -origin.y, -origin.z)
    }

    /// Perspective divide for a center of projection `focal_distance` behind
    /// the view plane on the +Z axis: `w = 1 - z / d`.
    #[rustfmt::skip]
    pub fn perspective(focal_distance: f64) -> Matrix4<f64> {
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, -1.0 / focal_distance, 1.0,
        )
    }

    /// Apply `matrix` to `point`, normalizing by the resulting w component
    pub fn apply(matrix: &Matrix4<f64>, point: &Point3<f64>) -> Point3<f64> {
        let mut result = matrix * point.to_homogeneous();
        let w = result.w;
        if w.abs() > W_EPSILON {
            result /= w;
        }
        Point3::new(result.x, result.y, result.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_axis_angles() {
        assert!(AxisAngles::zero().is_zero());
        assert!(!AxisAngles::new(0.0, 0.0, 15.0).is_zero());
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation(&AxisAngles::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_x_maps_y_to_z() {
        let p = Transform::apply(&Transform::rotation_x(90.0), &Point3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_offset_axis() {
        // Vertical axis through (1, 0, 0)
        let m = Transform::rotation_about_axis(
            &Point3::new(1.0, 0.0, 0.0),
            &Point3::new(1.0, 0.0, 5.0),
            180.0,
        )
        .unwrap();
        let p = Transform::apply(&m, &Point3::new(2.0, 0.0, 3.0));
        assert_abs_diff_eq!(p, Point3::new(0.0, 0.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_about_coincident_points_fails() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(
            Transform::rotation_about_axis(&p, &p, 45.0),
            Err(Error::CoincidentAxisPoints)
        );
    }

    #[test]
    fn test_scale_about_point() {
        let m = Transform::about(&Point3::new(1.0, 1.0, 1.0), &Transform::scale(2.0, 2.0, 2.0));
        let p = Transform::apply(&m, &Point3::new(2.0, 1.0, 0.0));
        assert_abs_diff_eq!(p, Point3::new(3.0, 1.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_perspective_divides_by_depth() {
        // Point 100 units in front of the view plane, d = 100: w = 2
        let p = Transform::apply(&Transform::perspective(100.0), &Point3::new(10.0, 20.0, -100.0));
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 10.0, epsilon = 1e-12);
    }
}
