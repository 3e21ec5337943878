//! Headless driver: submit a render, poll it like an editor frame loop, and
//! report progress until the job finishes.

mod demo;

use anyhow::{bail, Context, Result};
use clap::Parser;
use demo::DemoScene;
use lumen_renderer::{
    DisplaySurface, PixelFormat, RandomCache, RenderJob, RendererConfig, RendererKind,
    SamplerKind, ToneMapper,
};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "lumen", about = "Render a demo scene on the CPU")]
struct Args {
    /// Demo scene to render
    #[arg(long, value_enum, default_value_t = DemoScene::Spheres)]
    scene: DemoScene,

    /// Renderer settings as JSON; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// preview, reference, normals or faces
    #[arg(short, long)]
    kind: Option<RendererKind>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(short, long)]
    samples: Option<u32>,

    #[arg(short, long)]
    bounces: Option<u32>,

    #[arg(long)]
    white_point: Option<f32>,

    /// clamp, reinhard, reinhard_extended or reinhard_extended_luminance
    #[arg(long)]
    tone_mapper: Option<ToneMapper>,

    /// Use the per-pixel hash sampler instead of the random cache
    #[arg(long)]
    pcg: bool,

    /// Seed of the random cache (clock seeded when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Save the finished frame into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cancel the render after this many seconds
    #[arg(long)]
    timeout: Option<f32>,

    /// Milliseconds between partial updates
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,
}

/// Display surface standing in for a window: reports how much of the frame
/// has been written.
struct ConsoleSurface {
    written: usize,
    total: usize,
}

impl DisplaySurface for ConsoleSurface {
    fn format(&self) -> PixelFormat {
        PixelFormat::Bgra
    }

    fn present(&mut self, _width: u32, _height: u32, pixels: &[u8]) {
        self.total = pixels.len() / 4;
        self.written = pixels.chunks_exact(4).filter(|px| px[3] == 255).count();
    }
}

fn renderer_config(args: &Args, base: RendererConfig) -> Result<RendererConfig> {
    let mut config = match &args.config {
        Some(path) => RendererConfig::from_json_file(path)
            .with_context(|| format!("loading renderer config {}", path.display()))?,
        None => base,
    };

    if let Some(kind) = args.kind {
        config.kind = kind;
    }
    if let Some(width) = args.width {
        config.resolution_horizontal = width;
    }
    if let Some(height) = args.height {
        config.resolution_vertical = height;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(bounces) = args.bounces {
        config.max_bounces = bounces;
    }
    if let Some(white_point) = args.white_point {
        config.white_point = white_point;
    }
    if let Some(mapper) = args.tone_mapper {
        config.tone_mapper = Some(mapper);
    }
    if args.pcg {
        config.sampler = SamplerKind::Pcg;
    }
    if let Some(dir) = &args.output {
        config.save_output = true;
        config.output_dir = dir.clone();
    }
    config.validate().context("invalid renderer settings")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let scene = demo::build(args.scene);
    let config = renderer_config(&args, scene.renderer.clone())?;
    let (width, height) = config.resolution();
    let camera = scene
        .camera
        .clone()
        .with_aspect_ratio(width as f32, height as f32);

    log::info!(
        "Scene '{}': {} objects, {} lights",
        scene.name,
        scene.len(),
        scene.query_lights().len()
    );

    let random = match args.seed {
        Some(seed) => RandomCache::new(seed),
        None => RandomCache::from_clock(),
    };
    let job = RenderJob::with_random_cache(random);
    job.submit(&scene, &config, &camera)
        .context("render submission rejected")?;

    let start = Instant::now();
    let timeout = args.timeout.map(Duration::from_secs_f32);
    let mut surface = ConsoleSurface {
        written: 0,
        total: 0,
    };

    while job.is_working() {
        thread::sleep(Duration::from_millis(args.poll_ms));

        if job.push_partial_update(&mut surface) {
            let (done, total) = job.progress();
            log::info!(
                "{:?}: chunks {}/{}, pixels {}/{}",
                job.state(),
                done,
                total,
                surface.written,
                surface.total
            );
        }

        if timeout.is_some_and(|t| start.elapsed() > t) {
            log::warn!("Timeout reached, cancelling render");
            job.cancel();
        }
    }

    let bench = job.benchmark();
    log::info!(
        "Render time {:.2?}, save time {:.2?}",
        bench.render_time,
        bench.save_time
    );
    log::info!(
        "Rays {}, ray-triangle {}, ray-box {}, ray-object {}",
        bench.stats.rays,
        bench.stats.ray_triangle_tests,
        bench.stats.ray_box_tests,
        bench.stats.ray_object_tests
    );

    if config.save_output {
        match job.last_saved_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("frame was not saved to {}", config.output_dir.display()),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_scene_settings() {
        let args = Args::parse_from([
            "lumen", "--kind", "reference", "--width", "320", "--samples", "4", "--pcg", "--output",
            "out",
        ]);
        let config = renderer_config(&args, RendererConfig::default()).unwrap();

        assert_eq!(config.kind, RendererKind::Reference);
        assert_eq!(config.resolution(), (320, 600));
        assert_eq!(config.samples_per_pixel, 4);
        assert_eq!(config.sampler, SamplerKind::Pcg);
        assert!(config.save_output);
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_missing_config_file_is_reported() {
        let args = Args::parse_from(["lumen", "--config", "/no/such/lumen.json"]);
        let err = renderer_config(&args, RendererConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("loading renderer config"));
    }

    #[test]
    fn test_tone_mapper_and_white_point_flags() {
        let args = Args::parse_from(["lumen", "--tone-mapper", "reinhard", "--white-point", "3"]);
        let config = renderer_config(&args, RendererConfig::default()).unwrap();
        assert_eq!(config.tone_mapper, Some(ToneMapper::Reinhard));
        assert_eq!(config.white_point, 3.0);

        let args = Args::parse_from(["lumen", "--white-point", "0"]);
        assert!(renderer_config(&args, RendererConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(Args::try_parse_from(["lumen", "--kind", "raster"]).is_err());
    }

    #[test]
    fn test_console_surface_counts_written_pixels() {
        let mut surface = ConsoleSurface {
            written: 0,
            total: 0,
        };
        surface.present(2, 1, &[0, 0, 0, 0, 9, 9, 9, 255]);
        assert_eq!((surface.written, surface.total), (1, 2));
    }
}
