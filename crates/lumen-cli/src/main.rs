//! lumen - HDR exposure merging and tone mapping CLI
//!
//! Merges bracketed exposure stacks into radiance maps and compresses
//! them back to displayable images with the Reinhard global operator.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "HDR exposure merging and tone mapping")]
#[command(long_about = "
Merges a stack of differently exposed photographs of a static scene into
a floating-point radiance map, then tone maps it for display.

A stack directory holds the frames, an exposure_times.csv manifest
(filename;exposure, fractional shutter times allowed), and the calibrated
response curve curve.m.

Examples:
  lumen merge shots/scene01                 # Full pipeline, outputs beside the frames
  lumen merge shots/scene01 -o out -g 2.0   # Gamma 2.0, custom output directory
  lumen merge shots/scene01 -a 0.36         # Brighter key value
  lumen tonemap out/hdr_image.hdr -o ldr.png
  lumen info shots/scene01 --json
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge an exposure stack into HDR and tone-mapped outputs
    #[command(visible_alias = "m")]
    Merge(MergeArgs),

    /// Tone map an existing Radiance HDR image
    #[command(visible_alias = "t")]
    Tonemap(TonemapArgs),

    /// Display exposure stack information
    #[command(visible_alias = "i")]
    Info(InfoArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// Stack directory with frames, exposure_times.csv, and curve.m
    dir: PathBuf,

    /// Output directory (defaults to the stack directory)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Key value (alpha): exposure bias of the tone-mapped output
    #[arg(short, long, default_value = "0.18")]
    alpha: f32,

    /// Gamma exponent for the gamma-encoded output
    #[arg(short, long, default_value = "2.2")]
    gamma: f32,

    /// Output bit depth: 8 or 16
    #[arg(short, long, default_value = "16")]
    depth: u8,

    /// Skip the diagnostic luminance map output
    #[arg(long)]
    no_luminance: bool,
}

#[derive(Args)]
struct TonemapArgs {
    /// Input Radiance HDR image
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Key value (alpha)
    #[arg(short, long, default_value = "0.18")]
    alpha: f32,

    /// Gamma exponent (1.0 disables re-encoding)
    #[arg(short, long, default_value = "2.2")]
    gamma: f32,

    /// Output bit depth: 8 or 16
    #[arg(short, long, default_value = "16")]
    depth: u8,
}

#[derive(Args)]
struct InfoArgs {
    /// Stack directory
    dir: PathBuf,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Merge(args) => commands::merge::run(args),
        Commands::Tonemap(args) => commands::tonemap::run(args),
        Commands::Info(args) => commands::info::run(args),
    }
}
