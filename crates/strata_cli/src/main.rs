//! Strata - render a built-in scene to a PPM image.

mod scenes;

use anyhow::{Context, Result};
use clap::Parser;
use scenes::ScenePreset;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use strata_renderer::{RenderConfig, Renderer};

#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Offline path tracer writing plain PPM images")]
struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = ScenePreset::Cornell)]
    scene: ScenePreset,

    /// JSON file whose fields override the scene's render settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width of the rendered image
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Samples per pixel (rounded down to a perfect square)
    #[arg(short = 's', long)]
    spp: Option<u32>,

    /// Maximum ray bounce depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Worker threads (0 = all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Output file, or "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Print the effective render settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    /// Scene preset, then the JSON file, then individual flags.
    fn resolve_config(&self, preset: RenderConfig) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => preset
                .load_overrides(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => preset,
        };

        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(spp) = self.spp {
            config.samples_per_pixel = spp;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }

        config.validate().context("Invalid render settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let scene = args.scene.build();
    let config = args.resolve_config(scene.config)?;

    if args.print_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    log::info!("Starting Strata: {:?} scene", args.scene);

    let renderer = Renderer::new(config)?;
    let framebuffer = renderer
        .render(&scene.world, &scene.lights)
        .context("Render failed")?;

    if args.output == "-" {
        let stdout = io::stdout();
        framebuffer.write_ppm(&mut BufWriter::new(stdout.lock()))?;
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("Failed to create {}", args.output))?;
        framebuffer
            .write_ppm(&mut BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", args.output))?;
        log::info!("Wrote {}", args.output);
    }

    Ok(())
}
