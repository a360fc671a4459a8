/// IGS Terminal Demo - 2D and 3D objects through one window
///
/// Controls:
///   - Arrows: Pan the window
///   - +/-: Zoom
///   - Q/E: Rotate the window
///   - I/K, J/L, U/O: Rotate the camera about X, Y, Z
///   - W/S, A/D, R/F: Move the camera
///   - C: Switch line clipping algorithm
///   - P: Switch parallel/perspective projection
///   - ESC: Quit

use igs_core::{cube_edges, Geometry, Polygon, Scene, Segment2};
use igs_terminal::{logger, TerminalApp};
use log::LevelFilter;
use nalgebra::{Point2, Point3};
use std::io;

fn demo_scene() -> igs_core::Result<Scene> {
    let mut scene = Scene::new();

    scene.add_object("center", Geometry::Point(Point2::new(960.0, 540.0)))?;
    scene.add_object(
        "diagonal",
        Geometry::Line(Segment2::from_coords(-200.0, -100.0, 2100.0, 1200.0)),
    )?;
    scene.add_object(
        "triangle",
        Geometry::Wireframe(Polygon::new(vec![
            Point2::new(200.0, 150.0),
            Point2::new(700.0, 200.0),
            Point2::new(450.0, 600.0),
        ])),
    )?;
    scene.add_object(
        "wave",
        Geometry::Curve(
            (0..=40)
                .map(|i| {
                    let x = 1100.0 + i as f64 * 25.0;
                    Point2::new(x, 250.0 + 120.0 * (i as f64 / 4.0).sin())
                })
                .collect(),
        ),
    )?;
    scene.add_object(
        "cube",
        Geometry::Object3D(cube_edges(Point3::new(0.0, 0.0, -300.0), 300.0)),
    )?;

    Ok(scene)
}

fn main() -> io::Result<()> {
    let level = std::env::var("IGS_LOG")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LevelFilter::Info);
    if let Err(err) = logger::init(level) {
        eprintln!("Logger unavailable: {}", err);
    }

    let scene = demo_scene().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    println!("Starting IGS terminal viewer (press ESC to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene)?;
    app.run()?;

    Ok(())
}
