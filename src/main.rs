use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use trail_engine::config::EngineConfig;
use trail_engine::core::EngineResult;
use trail_engine::render::RecordingSink;
use trail_engine::resources::load_control_points;
use trail_engine::scene::SimulationScene;

fn usage() -> ! {
    eprintln!("Usage: trail_engine <control-points> [config.toml|config.json]");
    process::exit(2);
}

fn init_logging(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run(points_path: PathBuf, config_path: Option<PathBuf>) -> EngineResult<()> {
    let mut config = match &config_path {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::load_or_default(),
    };
    config.apply_env_overrides();
    init_logging(&config);

    let points = load_control_points(&points_path)?;
    let mut scene = SimulationScene::new(&config, points)?;
    let mut sink = RecordingSink::new();

    let spline = scene.animator().spline();
    tracing::debug!(
        target: "spline",
        "Curve preview: {} polyline points, {} normal lines, center {:?}",
        spline.sample_polyline(config.spline.polyline_step).len(),
        spline.normal_lines(config.spline.normal_step, 1.0).len(),
        spline.center()
    );

    let dt = config.simulation.frame_delta();
    for _ in 0..config.simulation.frame_count {
        scene.update(dt);
        scene.submit(&mut sink);
    }

    let stats = scene.particles().stats();
    tracing::info!(
        target: "engine",
        "Simulated {} frames ({:.2}s): live={}, spawned={}, uploads={}, bytes={}",
        scene.time().frame_count,
        scene.time().elapsed_seconds,
        stats.live_count,
        stats.total_spawned,
        sink.particle_uploads,
        sink.uploaded_bytes
    );
    if let Some(placement) = sink.last_placement {
        tracing::info!(target: "engine", "Final placement translation: {:?}", placement.w_axis.truncate());
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let Some(points_path) = args.next() else {
        usage();
    };
    let config_path = args.next();

    if let Err(e) = run(points_path, config_path) {
        eprintln!("Simulation failed: {}", e);
        process::exit(1);
    }
}
