/// Clipping against the normalized clip window
///
/// Every routine here works in clip space, where the window spans
/// `[-1, 1]` on both axes and the clip window is that square shrunk by a margin.
use std::fmt;

use log::trace;
use nalgebra::Point2;

use crate::geometry::{Polygon, Segment2};

/// Outcode bits for Cohen-Sutherland
pub const LEFT: u8 = 1;
pub const RIGHT: u8 = 2;
pub const BOTTOM: u8 = 4;
pub const TOP: u8 = 8;

/// Margin used when none is configured
pub const DEFAULT_MARGIN: f64 = 0.05;

/// The square `[-1 + margin, 1 - margin]²` in clip space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl ClipWindow {
    pub fn new(margin: f64) -> Self {
        Self {
            x_min: -1.0 + margin,
            y_min: -1.0 + margin,
            x_max: 1.0 - margin,
            y_max: 1.0 - margin,
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: &Point2<f64>) -> bool {
        p.x >= self.x_min && p.x <= self.x_max && p.y >= self.y_min && p.y <= self.y_max
    }

    /// Strict containment, used by the Liang-Barsky shortcut
    pub fn strictly_contains(&self, p: &Point2<f64>) -> bool {
        p.x > self.x_min && p.x < self.x_max && p.y > self.y_min && p.y < self.y_max
    }

    /// Window corners, in the edge order used for polygon clipping
    pub fn corners(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.x_min, self.y_min),
            Point2::new(self.x_min, self.y_max),
            Point2::new(self.x_max, self.y_max),
            Point2::new(self.x_max, self.y_min),
        ]
    }

    /// Cohen-Sutherland region code of `p`
    pub fn outcode(&self, p: &Point2<f64>) -> u8 {
        let mut code = 0;
        if p.x < self.x_min {
            code |= LEFT;
        } else if p.x > self.x_max {
            code |= RIGHT;
        }
        if p.y < self.y_min {
            code |= BOTTOM;
        } else if p.y > self.y_max {
            code |= TOP;
        }
        code
    }
}

impl Default for ClipWindow {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

/// Line clipping algorithm, selectable at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineClipAlgorithm {
    #[default]
    CohenSutherland,
    LiangBarsky,
}

impl LineClipAlgorithm {
    pub fn label(self) -> &'static str {
        match self {
            LineClipAlgorithm::CohenSutherland => "Cohen-Sutherland",
            LineClipAlgorithm::LiangBarsky => "Liang-Barsky",
        }
    }

    /// The other algorithm
    pub fn toggled(self) -> Self {
        match self {
            LineClipAlgorithm::CohenSutherland => LineClipAlgorithm::LiangBarsky,
            LineClipAlgorithm::LiangBarsky => LineClipAlgorithm::CohenSutherland,
        }
    }

    pub fn clip(self, segment: &Segment2, window: &ClipWindow) -> Option<Segment2> {
        match self {
            LineClipAlgorithm::CohenSutherland => cohen_sutherland(segment, window),
            LineClipAlgorithm::LiangBarsky => liang_barsky(segment, window),
        }
    }
}

impl fmt::Display for LineClipAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point visibility; points on the boundary are inside.
pub fn clip_point(point: &Point2<f64>, window: &ClipWindow) -> bool {
    window.contains(point)
}

/// Cohen-Sutherland line clipping. Returns `None` when the line is rejected.
pub fn cohen_sutherland(segment: &Segment2, window: &ClipWindow) -> Option<Segment2> {
    let (mut p1, mut p2) = (segment.start, segment.end);
    let mut code1 = window.outcode(&p1);
    let mut code2 = window.outcode(&p2);

    loop {
        if code1 == 0 && code2 == 0 {
            return Some(Segment2::new(p1, p2));
        }
        if code1 & code2 != 0 {
            return None;
        }

        let code_out = if code1 != 0 { code1 } else { code2 };

        // None stands for an infinite slope
        let slope = if p2.x == p1.x {
            None
        } else {
            Some((p2.y - p1.y) / (p2.x - p1.x))
        };

        // Only the first violated boundary, in top/bottom/right/left order
        let clipped = if code_out & TOP != 0 {
            let x = slope.map_or(p1.x, |m| p1.x + (window.y_max - p1.y) / m);
            Point2::new(x, window.y_max)
        } else if code_out & BOTTOM != 0 {
            let x = slope.map_or(p1.x, |m| p1.x + (window.y_min - p1.y) / m);
            Point2::new(x, window.y_min)
        } else if code_out & RIGHT != 0 {
            let y = slope.map_or(p1.y, |m| p1.y + m * (window.x_max - p1.x));
            Point2::new(window.x_max, y)
        } else {
            let y = slope.map_or(p1.y, |m| p1.y + m * (window.x_min - p1.x));
            Point2::new(window.x_min, y)
        };

        if code_out == code1 {
            p1 = clipped;
            code1 = window.outcode(&p1);
        } else {
            p2 = clipped;
            code2 = window.outcode(&p2);
        }
    }
}

/// Liang-Barsky parametric line clipping. Returns `None` when the line is rejected.
pub fn liang_barsky(segment: &Segment2, window: &ClipWindow) -> Option<Segment2> {
    let (p1, p2) = (segment.start, segment.end);

    if window.strictly_contains(&p1) && window.strictly_contains(&p2) {
        return Some(*segment);
    }

    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let p = [-dx, dx, -dy, dy];
    let q = [
        p1.x - window.x_min,
        window.x_max - p1.x,
        p1.y - window.y_min,
        window.y_max - p1.y,
    ];

    let mut u1: f64 = 0.0;
    let mut u2: f64 = 1.0;

    for (&pk, &qk) in p.iter().zip(q.iter()) {
        if pk == 0.0 {
            // Parallel to this boundary and outside of it
            if qk < 0.0 {
                return None;
            }
        } else {
            let r = qk / pk;
            if pk < 0.0 {
                u1 = u1.max(r);
            } else {
                u2 = u2.min(r);
            }
        }
    }

    if u1 > u2 {
        return None;
    }

    Some(Segment2::new(
        Point2::new(p1.x + u1 * dx, p1.y + u1 * dy),
        Point2::new(p1.x + u2 * dx, p1.y + u2 * dy),
    ))
}

/// X coordinate where line (1)-(2) meets line (3)-(4)
#[allow(clippy::too_many_arguments)]
pub fn x_intersect(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) -> f64 {
    let num = (x1 * y2 - y1 * x2) * (x3 - x4) - (x1 - x2) * (x3 * y4 - y3 * x4);
    let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    num / den
}

/// Y coordinate where line (1)-(2) meets line (3)-(4)
#[allow(clippy::too_many_arguments)]
pub fn y_intersect(x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) -> f64 {
    let num = (x1 * y2 - y1 * x2) * (y3 - y4) - (y1 - y2) * (x3 * y4 - y3 * x4);
    let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    num / den
}

fn intersection(
    edge_start: &Point2<f64>,
    edge_end: &Point2<f64>,
    a: &Point2<f64>,
    b: &Point2<f64>,
) -> Point2<f64> {
    let (x1, y1, x2, y2) = (edge_start.x, edge_start.y, edge_end.x, edge_end.y);
    Point2::new(
        x_intersect(x1, y1, x2, y2, a.x, a.y, b.x, b.y),
        y_intersect(x1, y1, x2, y2, a.x, a.y, b.x, b.y),
    )
}

/// Clip `vertices` against the single edge `edge_start -> edge_end`.
///
/// A vertex is inside when the cross product relative to the edge is
/// strictly negative.
pub fn clip_polygon_edge(
    vertices: &[Point2<f64>],
    edge_start: &Point2<f64>,
    edge_end: &Point2<f64>,
) -> Vec<Point2<f64>> {
    if vertices.is_empty() {
        return Vec::new();
    }

    let side = |p: &Point2<f64>| {
        (edge_end.x - edge_start.x) * (p.y - edge_start.y)
            - (edge_end.y - edge_start.y) * (p.x - edge_start.x)
    };

    let n = vertices.len();
    let mut output = Vec::with_capacity(n + 1);
    for i in 0..n {
        let current = &vertices[i];
        let next = &vertices[(i + 1) % n];
        let current_inside = side(current) < 0.0;
        let next_inside = side(next) < 0.0;

        match (current_inside, next_inside) {
            (true, true) => output.push(*next),
            (false, true) => {
                output.push(intersection(edge_start, edge_end, current, next));
                output.push(*next);
            }
            (true, false) => output.push(intersection(edge_start, edge_end, current, next)),
            (false, false) => {}
        }
    }

    // Each kept vertex is pushed as the "next" of its pair, which shifts the
    // start by one; moving the last vertex to the front restores it.
    if let Some(last) = output.pop() {
        output.insert(0, last);
    }
    output
}

/// Sutherland-Hodgman polygon clipping against the clip window
pub fn sutherland_hodgman(polygon: &Polygon, window: &ClipWindow) -> Polygon {
    let corners = window.corners();
    let mut vertices = polygon.vertices.clone();

    for i in 0..corners.len() {
        if vertices.is_empty() {
            break;
        }
        let edge_start = corners[i];
        let edge_end = corners[(i + 1) % corners.len()];
        vertices = clip_polygon_edge(&vertices, &edge_start, &edge_end);
    }

    trace!(
        "sutherland-hodgman: {} vertices in, {} out",
        polygon.len(),
        vertices.len()
    );
    Polygon::new(vertices)
}

/// Clip each projected 3D segment with Cohen-Sutherland.
///
/// Returns one entry per input segment: the clipped segment when it survives,
/// otherwise the input segment unchanged together with a `false` flag.
pub fn clip_segments(segments: &[Segment2], window: &ClipWindow) -> Vec<(Segment2, bool)> {
    segments
        .iter()
        .map(|segment| match cohen_sutherland(segment, window) {
            Some(clipped) => (clipped, true),
            None => (*segment, false),
        })
        .collect()
}
