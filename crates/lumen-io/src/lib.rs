//! # lumen-io
//!
//! File I/O for the HDR merging pipeline.
//!
//! - [`exposures`] - `exposure_times.csv` manifest parsing (fractional
//!   shutter notation supported)
//! - [`curve`] - response curve matrix files
//! - [`ldr`] - 8-bit PNG/JPEG frame decoding and 8/16-bit PNG output
//! - [`hdr`] - Radiance RGBE output for the reconstructed maps
//!
//! The computational crates never touch the filesystem; everything is
//! loaded here, validated through `lumen-core` constructors, and handed
//! over fully materialized.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use lumen_io::{read_curve, read_stack};
//!
//! let stack = read_stack("shots/scene01")?;
//! let curve = read_curve("shots/scene01/curve.m")?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod curve;
mod error;
pub mod exposures;
pub mod hdr;
pub mod ldr;

pub use curve::read_curve;
pub use error::{IoError, IoResult};
pub use exposures::{read_manifest, ExposureEntry};

use lumen_core::ExposureStack;
use std::path::Path;
use tracing::info;

/// Conventional manifest file name inside a stack directory.
pub const MANIFEST_NAME: &str = "exposure_times.csv";

/// Conventional curve file name inside a stack directory.
pub const CURVE_NAME: &str = "curve.m";

/// Loads a full exposure stack from a directory containing
/// [`MANIFEST_NAME`] and the frames it references.
///
/// # Errors
///
/// Fails if the manifest is missing or malformed, any referenced frame
/// cannot be decoded, or the assembled stack violates a structural
/// precondition (mismatched dimensions, non-positive exposure).
pub fn read_stack<P: AsRef<Path>>(dir: P) -> IoResult<ExposureStack> {
    let dir = dir.as_ref();
    let entries = read_manifest(dir.join(MANIFEST_NAME))?;

    let mut frames = Vec::with_capacity(entries.len());
    let mut exposures = Vec::with_capacity(entries.len());
    for entry in &entries {
        frames.push(ldr::read_frame(dir.join(&entry.file))?);
        exposures.push(entry.seconds);
    }

    let stack = ExposureStack::new(frames, exposures)?;
    info!(
        dir = %dir.display(),
        frames = stack.len(),
        width = stack.width(),
        height = stack.height(),
        "loaded exposure stack"
    );
    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::RgbMap;

    #[test]
    fn read_stack_from_directory() {
        let dir = tempfile::tempdir().unwrap();

        for (name, value) in [("a.png", 0.2f32), ("b.png", 0.8)] {
            let map = RgbMap::from_data(2, 2, vec![value; 12]).unwrap();
            ldr::write_png(dir.path().join(name), &map, ldr::BitDepth::Eight).unwrap();
        }
        std::fs::write(
            dir.path().join(MANIFEST_NAME),
            "filename;exposure\na.png;1/2\nb.png;2.0\n",
        )
        .unwrap();

        let stack = read_stack(dir.path()).unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.width(), 2);
        assert_eq!(stack.exposures(), &[0.5, 2.0]);
    }

    #[test]
    fn read_stack_fails_on_missing_frame() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_NAME),
            "filename;exposure\nmissing.png;0.5\n",
        )
        .unwrap();
        assert!(read_stack(dir.path()).is_err());
    }
}
