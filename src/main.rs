use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sphere_tracer::config::SceneConfig;
use sphere_tracer::canvas::PpmSink;
use sphere_tracer::render::{ Renderer, FrameLimit };
use sphere_tracer::consts::OUT_FILE;

/// Renders spheres lit by point lights to PPM images.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// JSON scene description; the built-in demo scene is used if omitted
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Image width in pixels
    #[clap(long)]
    width: Option<usize>,

    /// Image height in pixels
    #[clap(long)]
    height: Option<usize>,

    /// Vertical field of view in degrees
    #[clap(long)]
    fov_degrees: Option<f64>,

    /// Number of frames to render, animating the scene between them
    #[clap(short, long, default_value_t = 1)]
    frames: usize,

    /// Output file; later frames get a numbered suffix
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG wins if set
    #[clap(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.scene {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene {}", path.display()))?,
        None => SceneConfig::demo(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(fov) = args.fov_degrees {
        config.field_of_view = fov.to_radians();
    }
    config.validate().context("invalid render settings")?;

    info!(
        width = config.width,
        height = config.height,
        objects = config.objects.len(),
        lights = config.lights.len(),
        frames = args.frames,
        "starting render"
    );

    let renderer = Renderer::new(config.camera());
    let mut scene = config.scene();
    let mut sink = PpmSink::new(config.width, config.height, &args.output);
    let mut stop = FrameLimit(args.frames.max(1));

    let frames = renderer
        .run(&mut scene, &mut sink, &mut stop, |scene| config.animate(scene))
        .context("rendering failed")?;

    info!(frames, output = %args.output.display(), "done");
    Ok(())
}
