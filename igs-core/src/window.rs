/// The movable, rotatable view window
use log::debug;
use nalgebra::{Point2, Rotation2, Vector2};

use crate::config::ViewConfig;
use crate::error::{Error, Result};
use crate::normalize::{self, Bounds};
use crate::projection::{Camera, ProjectionMode};
use crate::transform::AxisAngles;

/// Window bounds plus the camera that orients them.
///
/// The 2D up vector drives the alignment of flat objects. Rotating the window
/// in 2D turns both it and the camera about the world Z axis; 3D rotations
/// move the camera only, so looking straight down keeps flat objects usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub bounds: Bounds,
    pub camera: Camera,
    up: Vector2<f64>,
}

impl Window {
    /// The 2D up vector starts as the XY part of the camera VUP, or +Y when
    /// the camera looks along the Y axis.
    pub fn new(bounds: Bounds, camera: Camera) -> Result<Self> {
        bounds.validate()?;
        let up = camera.vup.xy().try_normalize(1e-12).unwrap_or_else(Vector2::y);
        Ok(Self { bounds, camera, up })
    }

    pub fn from_config(config: &ViewConfig) -> Result<Self> {
        Self::new(config.window, Camera::from_config(config)?)
    }

    pub fn center(&self) -> Point2<f64> {
        self.bounds.center()
    }

    /// Unit view-up vector of the 2D window
    pub fn up_2d(&self) -> Vector2<f64> {
        self.up
    }

    /// Pan by `(dx, dy)` expressed in window-local axes
    pub fn translate(&mut self, dx: f64, dy: f64) -> Result<()> {
        let theta = -normalize::up_angle(&self.up_2d())?;
        let (sin_t, cos_t) = theta.sin_cos();
        let delta = Vector2::new(dx * cos_t - dy * sin_t, dx * sin_t + dy * cos_t);

        self.bounds.min += delta;
        self.bounds.max += delta;
        debug!("window translated by {:?} to {:?}", delta, self.bounds);
        Ok(())
    }

    /// Rotate the up vector counter-clockwise by `degrees` around the view normal
    pub fn rotate(&mut self, degrees: f64) -> Result<()> {
        self.commit(|next| {
            next.up = Rotation2::new(degrees.to_radians()) * next.up;
            next.camera.rotate(&AxisAngles::new(0.0, 0.0, degrees))
        })
    }

    /// Scale both corners around the world origin
    pub fn zoom(&mut self, factor: f64) -> Result<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(Error::InvalidZoom { factor });
        }
        let bounds = Bounds::new(self.bounds.min * factor, self.bounds.max * factor);
        bounds.validate()?;
        self.bounds = bounds;
        debug!("window zoomed by {factor} to {:?}", self.bounds);
        Ok(())
    }

    pub fn translate_3d(&mut self, dx: f64, dy: f64, dz: f64) -> Result<()> {
        self.commit(|next| next.camera.translate(dx, dy, dz))
    }

    pub fn rotate_3d(&mut self, angles: &AxisAngles) -> Result<()> {
        self.commit(|next| next.camera.rotate(angles))
    }

    pub fn toggle_projection(&mut self) -> Result<ProjectionMode> {
        let mode = self.camera.mode.toggled();
        self.commit(|next| next.camera.set_mode(mode))?;
        Ok(mode)
    }

    /// Check that the shared view state can drive an update cycle
    pub fn recompute(&mut self) -> Result<()> {
        self.bounds.validate()?;
        normalize::up_angle(&self.up)?;
        self.camera.recompute()
    }

    /// Apply `change` to a copy and keep it only if the whole window stays valid
    fn commit<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Window) -> Result<()>,
    {
        let mut next = self.clone();
        change(&mut next)?;
        next.recompute()?;
        *self = next;
        Ok(())
    }

    pub fn align_z_axis(&self, vertices: &[Point2<f64>]) -> Result<Vec<Point2<f64>>> {
        normalize::align_z_axis(vertices, &self.bounds, &self.up_2d())
    }

    pub fn normalize(&self, vertices: &[Point2<f64>]) -> Result<Vec<Point2<f64>>> {
        normalize::normalize(vertices, &self.bounds)
    }

    /// Normalize view-space points, whose origin sits at the window center.
    pub fn normalize_view(&self, vertices: &[Point2<f64>]) -> Result<Vec<Point2<f64>>> {
        let center = self.center().coords;
        let recentred: Vec<_> = vertices.iter().map(|p| p + center).collect();
        self.normalize(&recentred)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self {
            bounds: ViewConfig::default().window,
            camera: Camera::default(),
            up: Vector2::y(),
        }
    }
}
