/// Errors raised by view-state mutation, normalization and OBJ loading.
///
/// Clipping never errors: a segment outside the clip window or the near/far
/// slab is reported as invisible instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A view vector has (near) zero length.
    #[error("{name} vector has zero length")]
    DegenerateVector { name: &'static str },

    /// VUP and VPN are parallel, so no camera basis can be built.
    #[error("view-up vector is parallel to the view-plane normal")]
    ParallelViewVectors,

    /// The window has zero width or height.
    #[error("window is degenerate ({width} x {height})")]
    DegenerateWindow { width: f64, height: f64 },

    /// Zoom factors must be finite and positive.
    #[error("zoom factor must be finite and positive, got {factor}")]
    InvalidZoom { factor: f64 },

    /// Perspective needs a finite, positive focal distance.
    #[error("focal distance must be finite and positive, got {distance}")]
    InvalidFocalDistance { distance: f64 },

    /// The two points defining a rotation axis are the same point.
    #[error("axis points cannot be coincident")]
    CoincidentAxisPoints,

    /// An object produced NaN or infinite display coordinates.
    #[error("object {id} produced non-finite coordinates")]
    NonFinite { id: u64 },

    #[error("unknown projection mode: {0}")]
    UnknownProjection(String),

    #[error("unknown object kind: {0}")]
    UnknownObjectKind(String),

    #[error("no object with id {id}")]
    ObjectNotFound { id: u64 },

    /// Replacement geometry must keep the object's kind.
    #[error("replacement geometry for object {id} has a different kind")]
    GeometryMismatch { id: u64 },

    #[error("failed to parse OBJ data: {0}")]
    Obj(String),
}

pub type Result<T> = std::result::Result<T, Error>;
