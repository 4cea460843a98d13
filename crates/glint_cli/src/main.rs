//! `glint` - render a scene file (or the built-in demo scene) to an image.

use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use glint_renderer::{render, RenderOptions, SceneDescription};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A minimal offline CPU ray tracer
#[derive(FromArgs)]
struct Options {
    /// path to a JSON scene file; the demo scene is used when omitted
    #[argh(option)]
    scene: Option<PathBuf>,

    /// path to which the image is written (.ppm or .png)
    #[argh(option, short = 'o', default = "PathBuf::from(\"output.ppm\")")]
    output: PathBuf,

    /// override the image width
    #[argh(option)]
    width: Option<u32>,

    /// override the samples per pixel
    #[argh(option)]
    samples: Option<u32>,

    /// override the maximum bounce depth
    #[argh(option)]
    depth: Option<u32>,

    /// seed for reproducible renders
    #[argh(option)]
    seed: Option<u64>,

    /// render on a single thread
    #[argh(switch)]
    serial: bool,

    /// also write the scene description as JSON to this path
    #[argh(option)]
    dump_scene: Option<PathBuf>,
}

fn load_scene(options: &Options) -> Result<SceneDescription> {
    let mut description = match &options.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            let seed = options.seed.unwrap_or_else(rand::random);
            log::info!("No scene file given, generating demo scene (seed {})", seed);
            SceneDescription::demo(&mut StdRng::seed_from_u64(seed))
        }
    };

    if let Some(width) = options.width {
        description.camera.image_width = width;
    }
    if let Some(samples) = options.samples {
        description.camera.samples_per_pixel = samples;
    }
    if let Some(depth) = options.depth {
        description.camera.max_depth = depth;
    }

    Ok(description)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let options: Options = argh::from_env();

    let description = load_scene(&options)?;
    if let Some(path) = &options.dump_scene {
        std::fs::write(path, description.to_json()?)
            .with_context(|| format!("Failed to write scene to {}", path.display()))?;
        log::info!("Wrote scene description to {}", path.display());
    }

    let scene = description.build().context("Invalid scene")?;
    log::info!("Scene has {} objects", scene.world.len());

    let render_options = RenderOptions {
        seed: options.seed,
        parallel: !options.serial,
        cancel: None,
    };
    let image = render(&scene.camera, &scene.world, &render_options)?;

    image
        .save(&options.output)
        .with_context(|| format!("Failed to save image to {}", options.output.display()))?;

    Ok(())
}
