/// IGS Core Library - 2D/3D viewing pipeline
///
/// This library provides the renderer-independent part of the interactive
/// graphics system: window and camera transforms, projection, line and
/// polygon clipping, normalization and the scene update cycle.

pub mod clipper;
pub mod config;
pub mod error;
pub mod geometry;
pub mod normalize;
pub mod obj;
pub mod projection;
pub mod scene;
pub mod transform;
pub mod viewport;
pub mod window;

// Re-export commonly used types
pub use clipper::{ClipWindow, LineClipAlgorithm};
pub use config::ViewConfig;
pub use error::{Error, Result};
pub use geometry::{cube_edges, Geometry, ObjectKind, Polygon, Segment2, Segment3};
pub use normalize::Bounds;
pub use projection::{Camera, ProjectionMode};
pub use scene::{Display, Scene, SceneObject};
pub use transform::{AxisAngles, Transform};
pub use viewport::Viewport;
pub use window::Window;
