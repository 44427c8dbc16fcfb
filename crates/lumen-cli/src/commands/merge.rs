//! Full merge pipeline: stack directory in, four images out.

use crate::MergeArgs;
use anyhow::{Context, Result};
use lumen_io::{hdr, ldr, read_curve, read_stack, CURVE_NAME};
use lumen_ops::{gamma, merge, tonemap, Reinhard};
use tracing::info;

pub fn run(args: MergeArgs) -> Result<()> {
    let depth = super::parse_depth(args.depth)?;
    let op = Reinhard::new(args.alpha).context("invalid --alpha")?;

    let stack = read_stack(&args.dir)
        .with_context(|| format!("failed to load exposure stack from {}", args.dir.display()))?;
    let curve = read_curve(args.dir.join(CURVE_NAME))
        .with_context(|| format!("failed to load response curve from {}", args.dir.display()))?;

    let out_dir = args.out_dir.unwrap_or_else(|| args.dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let radiance = merge::reconstruct(&stack, &curve);
    hdr::write_rgb(out_dir.join("hdr_image.hdr"), &radiance)
        .context("failed to write radiance map")?;

    let (luminance, mapped) = tonemap::tone_map(&radiance, op)?;
    if !args.no_luminance {
        hdr::write_luminance(out_dir.join("hdr_luminance.hdr"), &luminance)
            .context("failed to write luminance map")?;
    }

    ldr::write_png(out_dir.join("ldr_image.png"), &mapped, depth)
        .context("failed to write tone-mapped image")?;

    let encoded = gamma::encode_map(&mapped, args.gamma).context("invalid --gamma")?;
    ldr::write_png(out_dir.join("ldr_image_gamma.png"), &encoded, depth)
        .context("failed to write gamma-encoded image")?;

    info!(
        frames = stack.len(),
        alpha = op.key,
        gamma = args.gamma,
        out_dir = %out_dir.display(),
        "merge complete"
    );
    Ok(())
}
