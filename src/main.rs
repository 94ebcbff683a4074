use std::env;

use polyshade::{Engine, RenderConfig};

const USAGE: &str = "usage: polyshade <mesh-file> <output.png> [config.json]";

fn main() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (mesh_path, output_path, config_path) = match args.as_slice() {
        [mesh, output] => (mesh, output, None),
        [mesh, output, config] => (mesh, output, Some(config)),
        _ => return Err(USAGE.to_string()),
    };

    let config = match config_path {
        Some(path) => RenderConfig::from_file(path).map_err(|e| e.to_string())?,
        None => RenderConfig::default(),
    };

    let mut engine = Engine::from_config(&config);
    engine
        .load_file(mesh_path)
        .map_err(|e| format!("{mesh_path}: {e}"))?;

    let frame = engine.render();
    frame
        .save_png(output_path)
        .map_err(|e| format!("{output_path}: {e}"))?;

    let stats = engine.last_stats();
    println!(
        "{} -> {} ({}x{}, {} primitives drawn, {} clipped, {} skipped)",
        mesh_path,
        output_path,
        config.width,
        config.height,
        stats.primitives_drawn,
        stats.clipped_away,
        stats.unprojectable + stats.fill_errors
    );
    Ok(())
}
