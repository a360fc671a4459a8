/// Default view configuration
use nalgebra::{Point3, Vector3};

use crate::clipper::{LineClipAlgorithm, DEFAULT_MARGIN};
use crate::normalize::Bounds;
use crate::projection::ProjectionMode;

/// Initial view state of a scene
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    /// Window bounds in world units
    pub window: Bounds,
    pub vup: Vector3<f64>,
    pub vpn: Vector3<f64>,
    pub vrp: Point3<f64>,
    pub focal_distance: f64,
    /// Depth slab, measured in front of the view plane
    pub near: f64,
    pub far: f64,
    pub margin: f64,
    pub projection: ProjectionMode,
    pub line_clip: LineClipAlgorithm,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            window: Bounds::from_coords(0.0, 0.0, 1920.0, 1080.0),
            vup: Vector3::new(0.0, 1.0, 0.0),
            vpn: Vector3::new(0.0, 0.0, 1.0),
            vrp: Point3::origin(),
            focal_distance: 500.0,
            near: -1000.0,
            far: 1000.0,
            margin: DEFAULT_MARGIN,
            projection: ProjectionMode::Parallel,
            line_clip: LineClipAlgorithm::CohenSutherland,
        }
    }
}
