/// 3D camera and projection
use std::fmt;
use std::str::FromStr;

use log::debug;
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::config::ViewConfig;
use crate::error::{Error, Result};
use crate::geometry::{Segment2, Segment3};
use crate::transform::{AxisAngles, Transform};

const EPSILON: f64 = 1e-10;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Parallel,
    Perspective,
}

impl ProjectionMode {
    pub fn label(self) -> &'static str {
        match self {
            ProjectionMode::Parallel => "parallel",
            ProjectionMode::Perspective => "perspective",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Parallel => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Parallel,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "parallel" => Ok(ProjectionMode::Parallel),
            "perspective" => Ok(ProjectionMode::Perspective),
            _ => Err(Error::UnknownProjection(s.to_string())),
        }
    }
}

/// Extract `(pitch, yaw, roll)` in radians from a view-plane normal and view-up.
///
/// The camera orientation is `Ry(yaw) * Rx(pitch) * Rz(roll)` applied to the
/// canonical frame (VPN = +Z, VUP = +Y). Looking straight up or down leaves
/// yaw undefined, so it is reported as 0 and the heading ends up in roll.
/// A VUP parallel to VPN has no usable projection and yields roll 0.
pub fn orientation_angles(vpn: &Vector3<f64>, vup: &Vector3<f64>) -> (f64, f64, f64) {
    let pitch = (-vpn.y).clamp(-1.0, 1.0).asin();

    let yaw = if vpn.x.abs() < EPSILON && vpn.z.abs() < EPSILON {
        0.0
    } else {
        vpn.x.atan2(vpn.z)
    };

    let projected = vup - vpn * vup.dot(vpn);
    let roll = if projected.norm() < EPSILON {
        0.0
    } else {
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let (sin_pitch, cos_pitch) = pitch.sin_cos();
        let right = Vector3::new(cos_yaw, 0.0, -sin_yaw);
        let up = Vector3::new(sin_yaw * sin_pitch, cos_pitch, cos_yaw * sin_pitch);
        (-projected.dot(&right)).atan2(projected.dot(&up))
    };

    (pitch, yaw, roll)
}

fn unit(v: &Vector3<f64>, name: &'static str) -> Result<Vector3<f64>> {
    let norm = v.norm();
    if !norm.is_finite() || norm < EPSILON {
        return Err(Error::DegenerateVector { name });
    }
    Ok(v / norm)
}

/// Camera state for the 3D viewing pipeline.
///
/// View space has its origin at the view-reference point, +Y along the view-up
/// vector and +Z along the view-plane normal, so the camera looks down -Z.
/// Depth is measured in front of the view plane (`-z`).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub vrp: Point3<f64>,
    pub vpn: Vector3<f64>,
    pub vup: Vector3<f64>,
    pub focal_distance: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
    view_matrix: Matrix4<f64>,
    projection_matrix: Matrix4<f64>,
}

impl Camera {
    pub fn new(vrp: Point3<f64>, vpn: Vector3<f64>, vup: Vector3<f64>) -> Result<Self> {
        let defaults = ViewConfig::default();
        Self::with_planes(vrp, vpn, vup, defaults.focal_distance, defaults.near, defaults.far)
    }

    pub fn with_planes(
        vrp: Point3<f64>,
        vpn: Vector3<f64>,
        vup: Vector3<f64>,
        focal_distance: f64,
        near: f64,
        far: f64,
    ) -> Result<Self> {
        let mut camera = Self {
            vrp,
            vpn,
            vup,
            focal_distance,
            near,
            far,
            mode: ProjectionMode::default(),
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        camera.recompute()?;
        Ok(camera)
    }

    pub fn from_config(config: &ViewConfig) -> Result<Self> {
        let mut camera = Self::with_planes(
            config.vrp,
            config.vpn,
            config.vup,
            config.focal_distance,
            config.near,
            config.far,
        )?;
        camera.mode = config.projection;
        camera.recompute()?;
        Ok(camera)
    }

    /// World to view space
    pub fn view_matrix(&self) -> &Matrix4<f64> {
        &self.view_matrix
    }

    /// World to projected view space, before the homogeneous divide
    pub fn projection_matrix(&self) -> &Matrix4<f64> {
        &self.projection_matrix
    }

    /// Orthonormal `(right, up, vpn)` basis of the camera
    pub fn basis(&self) -> Result<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> {
        let vpn = unit(&self.vpn, "view-plane normal")?;
        let vup = unit(&self.vup, "view-up")?;
        let right = vup.cross(&vpn);
        if right.norm() < EPSILON {
            return Err(Error::ParallelViewVectors);
        }
        let right = right.normalize();
        let up = vpn.cross(&right).normalize();
        Ok((right, up, vpn))
    }

    /// Rebuild the view and projection matrices from the current state.
    pub fn recompute(&mut self) -> Result<()> {
        self.vpn = unit(&self.vpn, "view-plane normal")?;
        self.vup = unit(&self.vup, "view-up")?;
        if self.vup.cross(&self.vpn).norm() < EPSILON {
            return Err(Error::ParallelViewVectors);
        }
        if !self.focal_distance.is_finite() || self.focal_distance <= 0.0 {
            return Err(Error::InvalidFocalDistance {
                distance: self.focal_distance,
            });
        }

        let (pitch, yaw, roll) = orientation_angles(&self.vpn, &self.vup);
        let align = Transform::rotation_z(-roll.to_degrees())
            * Transform::rotation_x(-pitch.to_degrees())
            * Transform::rotation_y(-yaw.to_degrees());
        self.view_matrix = align * Transform::translation(-self.vrp.x, -self.vrp.y, -self.vrp.z);

        self.projection_matrix = match self.mode {
            ProjectionMode::Parallel => self.view_matrix,
            ProjectionMode::Perspective => Transform::perspective(self.focal_distance) * self.view_matrix,
        };

        debug!(
            "camera recomputed: vrp={:?} pitch={:.3} yaw={:.3} roll={:.3} mode={}",
            self.vrp, pitch, yaw, roll, self.mode
        );
        Ok(())
    }

    /// Move the view-reference point by a displacement in camera-local axes
    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) -> Result<()> {
        let (right, up, vpn) = self.basis()?;
        let mut next = self.clone();
        next.vrp += right * dx + up * dy + vpn * dz;
        next.recompute()?;
        *self = next;
        Ok(())
    }

    /// Rotate VPN and VUP about the world X, then Y, then Z axes (degrees)
    pub fn rotate(&mut self, angles: &AxisAngles) -> Result<()> {
        let mut next = self.clone();
        let steps = [
            (angles.x, Transform::rotation_x as fn(f64) -> Matrix4<f64>),
            (angles.y, Transform::rotation_y),
            (angles.z, Transform::rotation_z),
        ];
        for (angle, rotation) in steps {
            if angle == 0.0 {
                continue;
            }
            let matrix = rotation(angle);
            next.vpn = matrix.transform_vector(&next.vpn);
            next.vup = matrix.transform_vector(&next.vup);
        }
        // recompute re-normalizes both vectors
        next.recompute()?;
        *self = next;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) -> Result<()> {
        let mut next = self.clone();
        next.mode = mode;
        next.recompute()?;
        *self = next;
        Ok(())
    }

    pub fn set_focal_distance(&mut self, focal_distance: f64) -> Result<()> {
        let mut next = self.clone();
        next.focal_distance = focal_distance;
        next.recompute()?;
        *self = next;
        Ok(())
    }

    /// Depth of `point` in front of the view plane
    pub fn depth(&self, point: &Point3<f64>) -> f64 {
        -(self.view_matrix * point.to_homogeneous()).z
    }

    /// Project a world point into 2D view space.
    ///
    /// Returns `None` when the point lies outside the `[near, far]` depth slab
    /// or behind the perspective center of projection.
    pub fn project(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        let depth = self.depth(point);
        if depth < self.near || depth > self.far {
            return None;
        }

        let projected = self.projection_matrix * point.to_homogeneous();
        if projected.w <= EPSILON {
            return None;
        }
        Some(Point2::new(projected.x / projected.w, projected.y / projected.w))
    }

    /// Project both endpoints; a segment with either endpoint culled is dropped.
    pub fn project_segment(&self, segment: &Segment3) -> Option<Segment2> {
        Some(Segment2::new(
            self.project(&segment.start)?,
            self.project(&segment.end)?,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        let config = ViewConfig::default();
        Self {
            vrp: config.vrp,
            vpn: config.vpn,
            vup: config.vup,
            focal_distance: config.focal_distance,
            near: config.near,
            far: config.far,
            mode: config.projection,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        }
    }
}
