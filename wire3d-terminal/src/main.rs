/// wire3d terminal demo - spinning objects drawn with the software pipeline
///
/// Usage: wire3d-terminal [scene.toml]
/// Without a scene file a built-in demo of five cubes is shown.
/// Controls:
///   - C: Toggle backface culling
///   - S: Cycle wireframe / filled / outlined
///   - P: Toggle the FPS overlay
///   - Space: Pause animation
///   - Q/ESC: Quit
use anyhow::Context;
use std::env;
use std::path::Path;
use wire3d_terminal::{ModelLibrary, SceneConfig, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let (config, base_dir) = match env::args().nth(1) {
        Some(path) => {
            let config = SceneConfig::load(&path)?;
            let base_dir = Path::new(&path)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default();
            (config, base_dir)
        }
        None => (SceneConfig::demo(), env::current_dir()?),
    };

    let mut library = ModelLibrary::new(base_dir);
    let scene = config
        .build_scene(&mut library)
        .context("failed to build scene")?;
    log::info!(
        "scene: {} objects sharing {} models",
        scene.len(),
        library.len()
    );

    let mut app = TerminalApp::new(&config, scene)?;
    app.run()?;

    Ok(())
}
