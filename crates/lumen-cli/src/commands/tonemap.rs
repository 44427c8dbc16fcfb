//! Tone map an existing Radiance HDR image.

use crate::TonemapArgs;
use anyhow::{Context, Result};
use lumen_io::{hdr, ldr};
use lumen_ops::{gamma, tonemap, Reinhard};
use tracing::info;

pub fn run(args: TonemapArgs) -> Result<()> {
    let depth = super::parse_depth(args.depth)?;
    let op = Reinhard::new(args.alpha).context("invalid --alpha")?;

    let radiance = hdr::read_rgb(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let (_, mapped) = tonemap::tone_map(&radiance, op)?;
    let output = if args.gamma == 1.0 {
        mapped
    } else {
        gamma::encode_map(&mapped, args.gamma).context("invalid --gamma")?
    };

    ldr::write_png(&args.output, &output, depth)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        alpha = op.key,
        "tone mapping complete"
    );
    Ok(())
}
