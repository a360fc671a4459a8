/// Scene objects and the update cycle
use log::{debug, trace, warn};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::clipper::{self, ClipWindow, LineClipAlgorithm};
use crate::config::ViewConfig;
use crate::error::{Error, Result};
use crate::geometry::{is_finite2, Geometry, ObjectKind, Polygon, Segment2, Segment3};
use crate::normalize::{from_clip_space, to_clip_space};
use crate::projection::ProjectionMode;
use crate::transform::{AxisAngles, Transform};
use crate::window::Window;

/// Derived display geometry in `[0, 1]²` and its visibility
#[derive(Debug, Clone, PartialEq)]
pub enum Display {
    /// Points, lines and wireframes
    Flat { vertices: Vec<Point2<f64>>, visible: bool },
    /// Curves and 3D kinds: one flag per segment
    Segments { segments: Vec<Segment2>, visible: Vec<bool> },
}

impl Display {
    /// Empty, invisible display for an object of `kind`
    pub fn hidden(kind: ObjectKind) -> Self {
        if kind.is_3d() || kind == ObjectKind::Curve {
            Display::Segments {
                segments: Vec::new(),
                visible: Vec::new(),
            }
        } else {
            Display::Flat {
                vertices: Vec::new(),
                visible: false,
            }
        }
    }

    /// True when anything of the object is drawn
    pub fn is_visible(&self) -> bool {
        match self {
            Display::Flat { visible, .. } => *visible,
            Display::Segments { visible, .. } => visible.iter().any(|v| *v),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Display::Flat { vertices, .. } => vertices.iter().all(is_finite2),
            Display::Segments { segments, .. } => segments.iter().all(Segment2::is_finite),
        }
    }
}

/// A drawable object: world geometry plus its derived display cache
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    id: u64,
    name: String,
    geometry: Geometry,
    display: Display,
}

impl SceneObject {
    fn new(id: u64, name: String, geometry: Geometry) -> Self {
        let display = Display::hidden(geometry.kind());
        Self {
            id,
            name,
            geometry,
            display,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn is_visible(&self) -> bool {
        self.display.is_visible()
    }

    /// Visible display geometry as line segments in `[0, 1]²`.
    ///
    /// Wireframes are closed. Points are not included.
    pub fn display_lines(&self) -> Vec<Segment2> {
        match &self.display {
            Display::Flat { visible: false, .. } => Vec::new(),
            Display::Flat { vertices, .. } => match self.kind() {
                ObjectKind::Point => Vec::new(),
                ObjectKind::Line => vertices
                    .windows(2)
                    .map(|pair| Segment2::new(pair[0], pair[1]))
                    .collect(),
                _ => Polygon::new(vertices.clone()).edges().collect(),
            },
            Display::Segments { segments, visible } => segments
                .iter()
                .zip(visible)
                .filter(|(_, v)| **v)
                .map(|(s, _)| *s)
                .collect(),
        }
    }

    /// Geometric center of the world geometry; 2D kinds sit on z = 0.
    pub fn center(&self) -> Point3<f64> {
        let points: Vec<Point3<f64>> = match &self.geometry {
            Geometry::Surface(segments) | Geometry::Object3D(segments) => segments
                .iter()
                .flat_map(|s| [s.start, s.end])
                .collect(),
            other => other
                .vertices_2d()
                .iter()
                .map(|p| Point3::new(p.x, p.y, 0.0))
                .collect(),
        };
        if points.is_empty() {
            return Point3::origin();
        }
        let sum = points.iter().fold(Vector3::<f64>::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / points.len() as f64)
    }

    /// Apply a homogeneous matrix to the world geometry
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        let flat = |p: &Point2<f64>| Transform::apply(matrix, &Point3::new(p.x, p.y, 0.0)).xy();
        let deep = |s: &Segment3| {
            Segment3::new(Transform::apply(matrix, &s.start), Transform::apply(matrix, &s.end))
        };

        self.geometry = match &self.geometry {
            Geometry::Point(p) => Geometry::Point(flat(p)),
            Geometry::Line(s) => Geometry::Line(Segment2::new(flat(&s.start), flat(&s.end))),
            Geometry::Wireframe(polygon) => {
                Geometry::Wireframe(polygon.vertices.iter().map(flat).collect())
            }
            Geometry::Curve(polygon) => Geometry::Curve(polygon.vertices.iter().map(flat).collect()),
            Geometry::Surface(segments) => Geometry::Surface(segments.iter().map(deep).collect()),
            Geometry::Object3D(segments) => Geometry::Object3D(segments.iter().map(deep).collect()),
        };
    }
}

/// Project, clip and normalize one object against the current view.
fn render_object(
    geometry: &Geometry,
    window: &Window,
    clip_window: &ClipWindow,
    algorithm: LineClipAlgorithm,
) -> Result<Display> {
    if geometry.kind().is_3d() {
        return render_3d(geometry.segments_3d(), window, clip_window);
    }

    let aligned = window.align_z_axis(&geometry.vertices_2d())?;
    let normalized = window.normalize(&aligned)?;
    let clip: Vec<Point2<f64>> = normalized.iter().map(to_clip_space).collect();

    let display = match geometry {
        Geometry::Point(_) => Display::Flat {
            visible: clip.first().is_some_and(|p| clipper::clip_point(p, clip_window)),
            vertices: normalized,
        },
        // Each piece is line clipped so the result never follows the clip border
        Geometry::Curve(_) => {
            let (segments, visible): (Vec<Segment2>, Vec<bool>) = clip
                .windows(2)
                .map(|pair| {
                    let segment = Segment2::new(pair[0], pair[1]);
                    match algorithm.clip(&segment, clip_window) {
                        Some(clipped) => (segment_from_clip_space(&clipped), true),
                        None => (segment_from_clip_space(&segment), false),
                    }
                })
                .unzip();
            Display::Segments { segments, visible }
        }
        Geometry::Line(_) => match algorithm.clip(&Segment2::new(clip[0], clip[1]), clip_window) {
            Some(clipped) => Display::Flat {
                vertices: vec![from_clip_space(&clipped.start), from_clip_space(&clipped.end)],
                visible: true,
            },
            None => Display::Flat {
                vertices: normalized,
                visible: false,
            },
        },
        _ => {
            let clipped = clipper::sutherland_hodgman(&Polygon::new(clip), clip_window);
            if clipped.is_empty() {
                Display::Flat {
                    vertices: normalized,
                    visible: false,
                }
            } else {
                Display::Flat {
                    vertices: clipped.vertices.iter().map(from_clip_space).collect(),
                    visible: true,
                }
            }
        }
    };
    Ok(display)
}

fn render_3d(segments: &[Segment3], window: &Window, clip_window: &ClipWindow) -> Result<Display> {
    let projected: Vec<Segment2> = segments
        .iter()
        .filter_map(|segment| window.camera.project_segment(segment))
        .collect();

    let endpoints: Vec<Point2<f64>> = projected.iter().flat_map(|s| [s.start, s.end]).collect();
    let normalized = window.normalize_view(&endpoints)?;
    let clip: Vec<Segment2> = normalized
        .chunks_exact(2)
        .map(|pair| Segment2::new(to_clip_space(&pair[0]), to_clip_space(&pair[1])))
        .collect();

    let (segments, visible): (Vec<Segment2>, Vec<bool>) = clipper::clip_segments(&clip, clip_window)
        .into_iter()
        .map(|(s, v)| (segment_from_clip_space(&s), v))
        .unzip();
    Ok(Display::Segments { segments, visible })
}

fn segment_from_clip_space(segment: &Segment2) -> Segment2 {
    Segment2::new(from_clip_space(&segment.start), from_clip_space(&segment.end))
}

/// The display file: an ordered object list plus the view it is seen through
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    window: Window,
    clip_window: ClipWindow,
    line_clip: LineClipAlgorithm,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            window: Window::default(),
            clip_window: ClipWindow::default(),
            line_clip: LineClipAlgorithm::default(),
            next_id: 0,
        }
    }

    pub fn with_config(config: &ViewConfig) -> Result<Self> {
        Ok(Self {
            objects: Vec::new(),
            window: Window::from_config(config)?,
            clip_window: ClipWindow::new(config.margin),
            line_clip: config.line_clip,
            next_id: 0,
        })
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn object(&self, id: u64) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Objects the renderer should draw
    pub fn visible_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.is_visible())
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn clip_window(&self) -> &ClipWindow {
        &self.clip_window
    }

    pub fn clipping_algorithm(&self) -> LineClipAlgorithm {
        self.line_clip
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.window.camera.mode
    }

    pub fn add_object(&mut self, name: impl Into<String>, geometry: Geometry) -> Result<u64> {
        self.window.recompute()?;
        let id = self.next_id;
        self.next_id += 1;
        let object = SceneObject::new(id, name.into(), geometry);
        debug!("adding {} '{}' as object {}", object.kind(), object.name, id);
        self.objects.push(object);
        self.update()?;
        Ok(id)
    }

    pub fn remove_object(&mut self, id: u64) -> Result<SceneObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(Error::ObjectNotFound { id })?;
        self.window.recompute()?;
        let removed = self.objects.remove(index);
        self.update()?;
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Replace the world geometry of an object; the kind must not change.
    pub fn modify_object(&mut self, id: u64, geometry: Geometry) -> Result<()> {
        if self.object_mut(id)?.kind() != geometry.kind() {
            return Err(Error::GeometryMismatch { id });
        }
        self.window.recompute()?;
        self.object_mut(id)?.geometry = geometry;
        self.update()
    }

    pub fn transform_object(&mut self, id: u64, matrix: &Matrix4<f64>) -> Result<()> {
        self.object_mut(id)?;
        self.window.recompute()?;
        self.object_mut(id)?.transform(matrix);
        self.update()
    }

    pub fn translate_window(&mut self, dx: f64, dy: f64) -> Result<()> {
        self.window.translate(dx, dy)?;
        self.update()
    }

    pub fn translate_window_3d(&mut self, dx: f64, dy: f64, dz: f64) -> Result<()> {
        self.window.translate_3d(dx, dy, dz)?;
        self.update()
    }

    pub fn rotate_window(&mut self, degrees: f64) -> Result<()> {
        self.window.rotate(degrees)?;
        self.update()
    }

    pub fn rotate_window_3d(&mut self, angles: AxisAngles) -> Result<()> {
        self.window.rotate_3d(&angles)?;
        self.update()
    }

    pub fn zoom(&mut self, factor: f64) -> Result<()> {
        self.window.zoom(factor)?;
        self.update()
    }

    pub fn switch_clipping_algorithm(&mut self) -> Result<LineClipAlgorithm> {
        self.set_clipping_algorithm(self.line_clip.toggled())?;
        Ok(self.line_clip)
    }

    pub fn set_clipping_algorithm(&mut self, algorithm: LineClipAlgorithm) -> Result<()> {
        self.line_clip = algorithm;
        debug!("line clipping algorithm: {algorithm}");
        self.update()
    }

    pub fn switch_lens_projection(&mut self) -> Result<ProjectionMode> {
        let mode = self.window.toggle_projection()?;
        debug!("projection: {mode}");
        self.update()?;
        Ok(mode)
    }

    /// Run one full update cycle over every object.
    ///
    /// A broken view aborts the cycle; a failure confined to one object
    /// hides that object and the cycle continues.
    pub fn update(&mut self) -> Result<()> {
        self.window.recompute()?;

        for object in &mut self.objects {
            let display = render_object(&object.geometry, &self.window, &self.clip_window, self.line_clip)
                .and_then(|display| {
                    if display.is_finite() {
                        Ok(display)
                    } else {
                        Err(Error::NonFinite { id: object.id })
                    }
                });

            object.display = match display {
                Ok(display) => display,
                Err(err) => {
                    warn!("hiding object {} '{}': {}", object.id, object.name, err);
                    Display::hidden(object.kind())
                }
            };
            trace!("object {} visible={}", object.id, object.display.is_visible());
        }

        debug!(
            "update cycle: {} objects, {} visible",
            self.objects.len(),
            self.visible_objects().count()
        );
        Ok(())
    }

    fn object_mut(&mut self, id: u64) -> Result<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(Error::ObjectNotFound { id })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::cube_edges;
    use crate::normalize::Bounds;
    use approx::assert_abs_diff_eq;

    const EPS: f64 = 1e-9;

    /// Scene whose window is `[-1, 1]²`, so clip space equals world space.
    fn unit_scene() -> Scene {
        let config = ViewConfig {
            window: Bounds::from_coords(-1.0, -1.0, 1.0, 1.0),
            ..ViewConfig::default()
        };
        Scene::with_config(&config).unwrap()
    }

    fn flat(object: &SceneObject) -> (&[Point2<f64>], bool) {
        match object.display() {
            Display::Flat { vertices, visible } => (vertices.as_slice(), *visible),
            other => panic!("expected flat display, got {other:?}"),
        }
    }

    #[test]
    fn test_initial_state() {
        let scene = Scene::new();
        assert!(scene.objects().is_empty());
        assert_eq!(scene.window().bounds, Bounds::from_coords(0.0, 0.0, 1920.0, 1080.0));
        assert_eq!(scene.clipping_algorithm(), LineClipAlgorithm::CohenSutherland);
        assert_eq!(scene.projection_mode(), ProjectionMode::Parallel);
    }

    #[test]
    fn test_point_visibility() {
        let mut scene = Scene::new();
        let inside = scene.add_object("p1", Geometry::Point(Point2::new(960.0, 540.0))).unwrap();
        let outside = scene.add_object("p2", Geometry::Point(Point2::new(-50.0, 540.0))).unwrap();

        let (vertices, visible) = flat(scene.object(inside).unwrap());
        assert!(visible);
        assert_abs_diff_eq!(vertices[0], Point2::new(0.5, 0.5), epsilon = EPS);
        assert!(!scene.object(outside).unwrap().is_visible());
        assert_eq!(scene.visible_objects().count(), 1);
    }

    #[test]
    fn test_line_clipped_to_window() {
        let mut scene = unit_scene();
        let id = scene
            .add_object("diagonal", Geometry::Line(Segment2::from_coords(-2.0, -2.0, 2.0, 2.0)))
            .unwrap();
        let (vertices, visible) = flat(scene.object(id).unwrap());
        assert!(visible);
        // (-0.95, -0.95) -> (0.95, 0.95) in clip space
        assert_abs_diff_eq!(vertices[0], Point2::new(0.025, 0.025), epsilon = EPS);
        assert_abs_diff_eq!(vertices[1], Point2::new(0.975, 0.975), epsilon = EPS);
    }

    #[test]
    fn test_both_algorithms_clip_lines_the_same() {
        let mut scene = unit_scene();
        let id = scene
            .add_object("slant", Geometry::Line(Segment2::from_coords(-3.0, 0.2, 3.0, -0.4)))
            .unwrap();
        let cohen = flat(scene.object(id).unwrap()).0.to_vec();

        assert_eq!(scene.switch_clipping_algorithm().unwrap(), LineClipAlgorithm::LiangBarsky);
        let liang = flat(scene.object(id).unwrap()).0.to_vec();

        for (a, b) in cohen.iter().zip(&liang) {
            assert_abs_diff_eq!(*a, *b, epsilon = EPS);
        }
    }

    #[test]
    fn test_rejected_line_is_hidden() {
        let mut scene = unit_scene();
        let id = scene
            .add_object("away", Geometry::Line(Segment2::from_coords(3.0, 3.0, 4.0, 5.0)))
            .unwrap();
        assert!(!scene.object(id).unwrap().is_visible());
        assert!(scene.object(id).unwrap().display_lines().is_empty());
    }

    #[test]
    fn test_wireframe_clipped_to_window_corners() {
        let mut scene = unit_scene();
        let square = Polygon::new(vec![
            Point2::new(-2.0, -2.0),
            Point2::new(2.0, -2.0),
            Point2::new(2.0, 2.0),
            Point2::new(-2.0, 2.0),
        ]);
        let id = scene.add_object("square", Geometry::Wireframe(square)).unwrap();
        let (vertices, visible) = flat(scene.object(id).unwrap());
        assert!(visible);
        let expected = [
            Point2::new(0.025, 0.025),
            Point2::new(0.975, 0.025),
            Point2::new(0.975, 0.975),
            Point2::new(0.025, 0.975),
        ];
        assert_eq!(vertices.len(), 4);
        for (got, want) in vertices.iter().zip(&expected) {
            assert_abs_diff_eq!(*got, *want, epsilon = EPS);
        }
        assert_eq!(scene.object(id).unwrap().display_lines().len(), 4);
    }

    #[test]
    fn test_open_curve_leaving_window() {
        let mut scene = unit_scene();
        let curve = Polygon::new(vec![
            Point2::new(-0.5, 2.0),
            Point2::new(-0.5, 0.0),
            Point2::new(0.5, 0.0),
            Point2::new(0.5, 2.0),
        ]);
        let id = scene.add_object("u", Geometry::Curve(curve)).unwrap();
        let lines = scene.object(id).unwrap().display_lines();

        assert_eq!(lines.len(), 3);
        assert_abs_diff_eq!(lines[0].start, Point2::new(0.25, 0.975), epsilon = EPS);
        assert_abs_diff_eq!(lines[1].start, Point2::new(0.25, 0.5), epsilon = EPS);
        assert_abs_diff_eq!(lines[2].end, Point2::new(0.75, 0.975), epsilon = EPS);
        // Nothing runs along the top clip edge
        assert!(!lines
            .iter()
            .any(|l| (l.start.y - 0.975).abs() < EPS && (l.end.y - 0.975).abs() < EPS));
    }

    #[test]
    fn test_curve_outside_is_hidden() {
        let mut scene = unit_scene();
        let curve: Polygon = (0..10).map(|i| Point2::new(5.0 + i as f64, 5.0)).collect();
        let id = scene.add_object("curve", Geometry::Curve(curve)).unwrap();
        assert!(!scene.object(id).unwrap().is_visible());
    }

    #[test]
    fn test_pan_moves_objects_out_of_view() {
        let mut scene = unit_scene();
        let id = scene.add_object("origin", Geometry::Point(Point2::origin())).unwrap();
        assert!(scene.object(id).unwrap().is_visible());

        scene.translate_window(10.0, 0.0).unwrap();
        assert!(!scene.object(id).unwrap().is_visible());

        scene.translate_window(-10.0, 0.0).unwrap();
        assert_eq!(scene.window().bounds, Bounds::from_coords(-1.0, -1.0, 1.0, 1.0));
        assert!(scene.object(id).unwrap().is_visible());
    }

    #[test]
    fn test_rotated_window_realigns_objects() {
        let mut scene = unit_scene();
        let id = scene.add_object("right", Geometry::Point(Point2::new(0.5, 0.0))).unwrap();
        // Up now points to -X; a point on +X appears below center
        scene.rotate_window(90.0).unwrap();
        let (vertices, _) = flat(scene.object(id).unwrap());
        assert_abs_diff_eq!(vertices[0], Point2::new(0.5, 0.25), epsilon = EPS);
    }

    #[test]
    fn test_zoom_out_brings_points_into_view() {
        let mut scene = unit_scene();
        let id = scene.add_object("far", Geometry::Point(Point2::new(1.5, 0.0))).unwrap();
        assert!(!scene.object(id).unwrap().is_visible());
        scene.zoom(2.0).unwrap();
        assert!(scene.object(id).unwrap().is_visible());
    }

    #[test]
    fn test_invalid_zoom_keeps_state() {
        let mut scene = unit_scene();
        assert!(scene.zoom(0.0).is_err());
        assert_eq!(scene.window().bounds, Bounds::from_coords(-1.0, -1.0, 1.0, 1.0));
    }

    #[test]
    fn test_object3d_segments() {
        let mut scene = unit_scene();
        let id = scene
            .add_object("cube", Geometry::Object3D(cube_edges(Point3::new(0.0, 0.0, -5.0), 1.0)))
            .unwrap();
        match scene.object(id).unwrap().display() {
            Display::Segments { segments, visible } => {
                assert_eq!(segments.len(), 12);
                assert!(visible.iter().all(|v| *v));
            }
            other => panic!("unexpected display {other:?}"),
        }
    }

    #[test]
    fn test_segment_behind_near_plane_is_dropped() {
        let config = ViewConfig {
            window: Bounds::from_coords(-1.0, -1.0, 1.0, 1.0),
            near: 0.0,
            far: 100.0,
            ..ViewConfig::default()
        };
        let mut scene = Scene::with_config(&config).unwrap();
        let segments = vec![
            Segment3::new(Point3::new(-0.5, 0.0, -10.0), Point3::new(0.5, 0.0, -10.0)),
            // Second endpoint sits behind the view plane
            Segment3::new(Point3::new(0.0, -0.5, -10.0), Point3::new(0.0, 0.5, 10.0)),
        ];
        let id = scene.add_object("mixed", Geometry::Object3D(segments)).unwrap();
        match scene.object(id).unwrap().display() {
            Display::Segments { segments, visible } => {
                assert_eq!(segments.len(), 1);
                assert_eq!(visible, &vec![true]);
                assert_abs_diff_eq!(segments[0].start, Point2::new(0.25, 0.5), epsilon = EPS);
                assert_abs_diff_eq!(segments[0].end, Point2::new(0.75, 0.5), epsilon = EPS);
            }
            other => panic!("unexpected display {other:?}"),
        }
    }

    #[test]
    fn test_3d_segment_partially_clipped() {
        let mut scene = unit_scene();
        let segment = Segment3::new(Point3::new(-0.5, 0.0, -1.0), Point3::new(3.0, 0.0, -1.0));
        let id = scene.add_object("ray", Geometry::Surface(vec![segment])).unwrap();
        let lines = scene.object(id).unwrap().display_lines();
        assert_eq!(lines.len(), 1);
        assert_abs_diff_eq!(lines[0].end, Point2::new(0.975, 0.5), epsilon = EPS);
    }

    #[test]
    fn test_camera_moves_3d_view() {
        let mut scene = unit_scene();
        let segment = Segment3::new(Point3::new(-0.2, 0.0, -1.0), Point3::new(0.2, 0.0, -1.0));
        let id = scene.add_object("bar", Geometry::Object3D(vec![segment])).unwrap();
        assert!(scene.object(id).unwrap().is_visible());

        scene.translate_window_3d(5.0, 0.0, 0.0).unwrap();
        assert!(!scene.object(id).unwrap().is_visible());

        scene.translate_window_3d(-5.0, 0.0, 0.0).unwrap();
        scene.rotate_window_3d(AxisAngles::new(0.0, 180.0, 0.0)).unwrap();
        // Looking the other way with the default slab still sees the bar, mirrored
        let lines = scene.object(id).unwrap().display_lines();
        assert_eq!(lines.len(), 1);
        assert_abs_diff_eq!(lines[0].start, Point2::new(0.6, 0.5), epsilon = EPS);
    }

    #[test]
    fn test_switch_lens_projection() {
        let mut scene = unit_scene();
        let segment = Segment3::new(Point3::new(0.4, 0.0, -500.0), Point3::new(0.4, 0.4, -500.0));
        let id = scene.add_object("post", Geometry::Object3D(vec![segment])).unwrap();

        assert_eq!(scene.switch_lens_projection().unwrap(), ProjectionMode::Perspective);
        let lines = scene.object(id).unwrap().display_lines();
        // depth == focal distance halves the offsets: x 0.2 -> 0.6 in [0, 1]
        assert_abs_diff_eq!(lines[0].start, Point2::new(0.6, 0.5), epsilon = EPS);
        assert_abs_diff_eq!(lines[0].end, Point2::new(0.6, 0.6), epsilon = EPS);

        assert_eq!(scene.switch_lens_projection().unwrap(), ProjectionMode::Parallel);
    }

    #[test]
    fn test_remove_and_modify() {
        let mut scene = unit_scene();
        let id = scene.add_object("p", Geometry::Point(Point2::new(5.0, 5.0))).unwrap();
        assert!(!scene.object(id).unwrap().is_visible());

        scene.modify_object(id, Geometry::Point(Point2::origin())).unwrap();
        assert!(scene.object(id).unwrap().is_visible());

        assert_eq!(
            scene.modify_object(id, Geometry::Line(Segment2::from_coords(0.0, 0.0, 1.0, 1.0))),
            Err(Error::GeometryMismatch { id })
        );

        let removed = scene.remove_object(id).unwrap();
        assert_eq!(removed.name(), "p");
        assert!(scene.objects().is_empty());
        assert!(matches!(scene.remove_object(id), Err(Error::ObjectNotFound { .. })));
    }

    #[test]
    fn test_transform_object() {
        let mut scene = unit_scene();
        let id = scene
            .add_object("line", Geometry::Line(Segment2::from_coords(2.0, 0.0, 3.0, 0.0)))
            .unwrap();
        assert!(!scene.object(id).unwrap().is_visible());

        scene.transform_object(id, &Transform::translation(-2.5, 0.0, 0.0)).unwrap();
        assert!(scene.object(id).unwrap().is_visible());
        assert_abs_diff_eq!(scene.object(id).unwrap().center(), Point3::origin(), epsilon = EPS);
    }

    #[test]
    fn test_non_finite_object_is_isolated() {
        let mut scene = unit_scene();
        let bad = scene.add_object("bad", Geometry::Point(Point2::new(f64::NAN, 0.0))).unwrap();
        let good = scene.add_object("good", Geometry::Point(Point2::origin())).unwrap();
        assert!(!scene.object(bad).unwrap().is_visible());
        assert!(scene.object(good).unwrap().is_visible());
    }

    #[test]
    fn test_looking_straight_down_keeps_scene_usable() {
        let mut scene = unit_scene();
        let cube = scene
            .add_object("cube", Geometry::Object3D(cube_edges(Point3::new(0.0, 0.0, -5.0), 1.0)))
            .unwrap();
        let dot = scene.add_object("dot", Geometry::Point(Point2::origin())).unwrap();

        scene.rotate_window_3d(AxisAngles::new(90.0, 0.0, 0.0)).unwrap();
        assert_abs_diff_eq!(scene.window().camera.vpn, -Vector3::y(), epsilon = EPS);
        // The cube sits 5 units to the side of the downward view
        assert!(!scene.object(cube).unwrap().is_visible());
        assert!(scene.object(dot).unwrap().is_visible());

        scene.translate_window(1.0, 0.0).unwrap();
        scene.zoom(1.1).unwrap();
        scene.switch_lens_projection().unwrap();
    }

    #[test]
    fn test_small_3d_steps_through_vertical_view() {
        let mut scene = unit_scene();
        for _ in 0..8 {
            scene.rotate_window_3d(AxisAngles::new(15.0, 0.0, 0.0)).unwrap();
        }
        scene.translate_window(0.5, 0.5).unwrap();
    }

    #[test]
    fn test_failed_view_leaves_objects_untouched() {
        let mut scene = unit_scene();
        let kept = scene.add_object("kept", Geometry::Point(Point2::origin())).unwrap();
        scene.window.camera.vup = Vector3::zeros();

        assert!(scene.add_object("new", Geometry::Point(Point2::origin())).is_err());
        assert!(scene.remove_object(kept).is_err());
        assert!(scene
            .transform_object(kept, &Transform::translation(5.0, 0.0, 0.0))
            .is_err());
        assert!(scene.modify_object(kept, Geometry::Point(Point2::new(5.0, 5.0))).is_err());
        assert_eq!(scene.objects().len(), 1);
        assert_eq!(scene.object(kept).unwrap().geometry(), &Geometry::Point(Point2::origin()));

        scene.window.camera.vup = Vector3::y();
        let next = scene.add_object("new", Geometry::Point(Point2::origin())).unwrap();
        assert_eq!(next, kept + 1);
    }

    #[test]
    fn test_broken_view_aborts_update() {
        let mut scene = unit_scene();
        scene.window.camera.vup = Vector3::zeros();
        assert!(matches!(scene.update(), Err(Error::DegenerateVector { .. })));
    }
}
