/// Geometry primitives for the viewing pipeline
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point2, Point3};

use crate::error::Error;

/// A 2D line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
}

impl Segment2 {
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    pub fn is_finite(&self) -> bool {
        is_finite2(&self.start) && is_finite2(&self.end)
    }
}

/// A 3D line segment, the unit of wireframe rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3 {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Segment3 {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }
}

/// An implicitly closed polygon: the last vertex connects back to the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Point2<f64>>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        Self { vertices }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over the closing edges `(v[i], v[i + 1 mod n])`
    pub fn edges(&self) -> impl Iterator<Item = Segment2> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment2::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl From<Vec<Point2<f64>>> for Polygon {
    fn from(vertices: Vec<Point2<f64>>) -> Self {
        Self::new(vertices)
    }
}

impl FromIterator<Point2<f64>> for Polygon {
    fn from_iter<I: IntoIterator<Item = Point2<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The closed set of drawable object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Point,
    Line,
    Wireframe,
    Curve,
    Surface,
    Object3D,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Point,
        ObjectKind::Line,
        ObjectKind::Wireframe,
        ObjectKind::Curve,
        ObjectKind::Surface,
        ObjectKind::Object3D,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ObjectKind::Point => "Point",
            ObjectKind::Line => "Line",
            ObjectKind::Wireframe => "Wireframe",
            ObjectKind::Curve => "Curve",
            ObjectKind::Surface => "Surface",
            ObjectKind::Object3D => "3DObject",
        }
    }

    /// Surfaces and 3D objects go through the projection path.
    pub fn is_3d(self) -> bool {
        matches!(self, ObjectKind::Surface | ObjectKind::Object3D)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .or_else(|| s.eq_ignore_ascii_case("object3d").then_some(ObjectKind::Object3D))
            .ok_or_else(|| Error::UnknownObjectKind(s.to_string()))
    }
}

/// World-space geometry of a scene object
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point2<f64>),
    Line(Segment2),
    Wireframe(Polygon),
    /// An already tessellated curve, clipped like a wireframe
    Curve(Polygon),
    /// An already tessellated surface mesh
    Surface(Vec<Segment3>),
    Object3D(Vec<Segment3>),
}

impl Geometry {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Geometry::Point(_) => ObjectKind::Point,
            Geometry::Line(_) => ObjectKind::Line,
            Geometry::Wireframe(_) => ObjectKind::Wireframe,
            Geometry::Curve(_) => ObjectKind::Curve,
            Geometry::Surface(_) => ObjectKind::Surface,
            Geometry::Object3D(_) => ObjectKind::Object3D,
        }
    }

    /// Flat vertex list of a 2D geometry; empty for 3D kinds
    pub fn vertices_2d(&self) -> Vec<Point2<f64>> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Line(segment) => vec![segment.start, segment.end],
            Geometry::Wireframe(polygon) | Geometry::Curve(polygon) => polygon.vertices.clone(),
            Geometry::Surface(_) | Geometry::Object3D(_) => Vec::new(),
        }
    }

    /// Segment list of a 3D geometry; empty for 2D kinds
    pub fn segments_3d(&self) -> &[Segment3] {
        match self {
            Geometry::Surface(segments) | Geometry::Object3D(segments) => segments,
            _ => &[],
        }
    }
}

pub(crate) fn is_finite2(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Create the 12 edges of an axis-aligned cube centred on `center`
pub fn cube_edges(center: Point3<f64>, size: f64) -> Vec<Segment3> {
    let half = size / 2.0;
    let corner = |x: f64, y: f64, z: f64| {
        Point3::new(center.x + x * half, center.y + y * half, center.z + z * half)
    };

    let bottom = [
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, -1.0, 1.0),
        corner(-1.0, -1.0, 1.0),
    ];
    let top = [
        corner(-1.0, 1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];

    let mut edges = Vec::with_capacity(12);
    for i in 0..4 {
        let j = (i + 1) % 4;
        edges.push(Segment3::new(bottom[i], bottom[j]));
        edges.push(Segment3::new(top[i], top[j]));
        edges.push(Segment3::new(bottom[i], top[i]));
    }
    edges
}
