//! CLI command implementations

pub mod info;
pub mod merge;
pub mod tonemap;

use anyhow::{bail, Result};
use lumen_io::ldr::BitDepth;

/// Maps the `--depth` flag to an output bit depth.
pub fn parse_depth(depth: u8) -> Result<BitDepth> {
    match depth {
        8 => Ok(BitDepth::Eight),
        16 => Ok(BitDepth::Sixteen),
        other => bail!("unsupported output depth: {} (use 8 or 16)", other),
    }
}
