/// Example: Load an OBJ wireframe and view it in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/model.obj

use igs_core::{obj, Bounds, Geometry, Scene, ViewConfig};
use igs_terminal::{logger, TerminalApp};
use log::LevelFilter;
use std::env;
use std::fs;
use std::io;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file>", args[0]);
        std::process::exit(1);
    }

    let obj_path = &args[1];
    if let Err(err) = logger::init(LevelFilter::Info) {
        eprintln!("Logger unavailable: {}", err);
    }

    println!("Loading OBJ file: {}", obj_path);

    let text = fs::read_to_string(obj_path)
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read OBJ file: {}", e)))?;

    let models = obj::parse_obj(&text)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse OBJ: {}", e)))?;

    // Frame the models: OBJ files usually live around the origin in small units
    let extent = models
        .iter()
        .flat_map(|m| &m.segments)
        .flat_map(|s| [s.start, s.end])
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(1.0_f64, f64::max);
    let config = ViewConfig {
        window: Bounds::from_coords(-extent * 1.5, -extent * 1.5, extent * 1.5, extent * 1.5),
        near: -extent * 100.0,
        far: extent * 100.0,
        ..ViewConfig::default()
    };
    let to_io = |e: igs_core::Error| io::Error::new(io::ErrorKind::InvalidInput, e.to_string());

    let mut scene = Scene::with_config(&config).map_err(to_io)?;
    for model in models {
        println!("Loaded '{}' with {} edges", model.name, model.segments.len());
        scene
            .add_object(model.name, Geometry::Object3D(model.segments))
            .map_err(to_io)?;
    }

    println!("Starting terminal viewer (press ESC to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene)?;
    app.run()?;

    Ok(())
}
