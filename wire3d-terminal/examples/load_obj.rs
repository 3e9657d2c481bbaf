/// Example: Load a mesh file and spin it in the terminal
///
/// Usage: cargo run --example load_obj -- path/to/file.obj [scale]
use anyhow::Context;
use std::env;
use std::fs;
use std::sync::Arc;
use nalgebra::Vector3;
use wire3d_core::{obj, EulerAngles, ObjectKind, Scene, SceneObject};
use wire3d_terminal::{SceneConfig, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let config = SceneConfig::demo();

    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file> [scale]", args[0]);
        eprintln!("\nNo mesh file provided, using the demo scene...");
        let scene = config.build_scene(&mut wire3d_terminal::ModelLibrary::new("."))?;
        let mut app = TerminalApp::new(&config, scene)?;
        return Ok(app.run()?);
    }

    let path = &args[1];
    let scale = match args.get(2) {
        Some(s) => s.parse::<f32>().with_context(|| format!("invalid scale `{}`", s))?,
        None => 1.0,
    };

    println!("Loading mesh file: {}", path);
    let data = fs::read(path).with_context(|| format!("failed to read `{}`", path))?;
    let mesh = obj::parse_obj_bytes(&data).with_context(|| format!("failed to parse `{}`", path))?;
    let model = Arc::new(mesh.into_model()?);
    println!(
        "Loaded {} vertices, {} triangles",
        model.vertex_count(),
        model.triangle_count()
    );

    let mut scene = Scene::new();
    scene.add(SceneObject::placed(
        model,
        ObjectKind::Teapot,
        Vector3::zeros(),
        EulerAngles::zero(),
        scale,
    ));

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(&config, scene)?;
    app.run()?;

    Ok(())
}
