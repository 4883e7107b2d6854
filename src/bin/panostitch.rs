use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use panostitch::{AlphaMode, BlendParams, FsImageSource, Scene, StitchOpts};

#[derive(Parser, Debug)]
#[command(
    name = "panostitch",
    version,
    about = "Composite posed camera views into an equirectangular panorama"
)]
struct Cli {
    /// Input scene (SfMData-style JSON).
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output panorama image. `.exr` keeps linear floats; other formats are 8-bit sRGB.
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Multiplier applied to the inferred panorama size.
    #[arg(long = "scaleFactor", default_value_t = 0.2)]
    scale_factor: f32,

    /// Ignore the dark border of circular fisheye images.
    #[arg(long = "fisheyeMasking", default_value_t = false, action = clap::ArgAction::Set)]
    fisheye_masking: bool,

    /// Fraction of the minor image dimension excluded by the fisheye mask.
    #[arg(long = "fisheyeMaskingMargin", default_value_t = 0.05)]
    fisheye_masking_margin: f32,

    /// Width in pixels of the fisheye mask falloff.
    #[arg(long = "transitionSize", default_value_t = 10.0)]
    transition_size: f32,

    /// Force a square panorama of side max(W, H) before scaling.
    #[arg(long = "panoramaSize", num_args = 2, value_names = ["W", "H"])]
    panorama_size: Option<Vec<u32>>,

    /// Alpha channel content of the output.
    #[arg(long, value_enum, default_value_t = AlphaArg::Weight)]
    alpha: AlphaArg,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Composite on the calling thread only.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Log verbosity (`RUST_LOG` takes precedence when set).
    #[arg(short = 'v', long = "verboseLevel", value_enum, default_value_t = VerboseLevel::Info)]
    verbose_level: VerboseLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlphaArg {
    /// Accumulated contribution weight.
    Weight,
    /// 1 where covered, 0 elsewhere.
    Coverage,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VerboseLevel {
    Fatal,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

impl VerboseLevel {
    fn directive(self) -> &'static str {
        match self {
            Self::Fatal | Self::Error => "error",
            Self::Warning => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    fn stitch_opts(&self) -> anyhow::Result<StitchOpts> {
        let panorama_size = match self.panorama_size.as_deref() {
            None => None,
            Some(&[w, h]) => Some((w, h)),
            Some(other) => anyhow::bail!("--panoramaSize expects 2 values, got {}", other.len()),
        };
        Ok(StitchOpts {
            scale_factor: self.scale_factor,
            panorama_size,
            blend: BlendParams {
                fisheye_masking: self.fisheye_masking,
                fisheye_masking_margin: self.fisheye_masking_margin,
                transition_size: self.transition_size,
            },
            alpha: match self.alpha {
                AlphaArg::Weight => AlphaMode::Weight,
                AlphaArg::Coverage => AlphaMode::Coverage,
            },
            parallel: !self.sequential,
            threads: self.threads,
        })
    }
}

fn init_logging(level: VerboseLevel) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose_level);

    let opts = cli.stitch_opts()?;
    opts.validate()?;

    let scene = Scene::from_path(&cli.input)
        .with_context(|| format!("load scene '{}'", cli.input.display()))?;
    tracing::info!(
        views = scene.views().len(),
        valid = scene.valid_views().len(),
        "scene loaded"
    );

    let (pano, stats) = panostitch::stitch_panorama_with_stats(&scene, &FsImageSource, &opts)?;

    panostitch::write_panorama(&cli.output, &pano)
        .with_context(|| format!("write panorama '{}'", cli.output.display()))?;

    tracing::info!(
        path = %cli.output.display(),
        width = pano.width(),
        height = pano.height(),
        composited = stats.views_composited,
        skipped = stats.views_skipped,
        "wrote panorama"
    );
    Ok(())
}
