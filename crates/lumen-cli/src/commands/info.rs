//! Exposure stack inspection.

use crate::InfoArgs;
use anyhow::{Context, Result};
use lumen_io::read_manifest;
use serde::Serialize;

#[derive(Serialize)]
struct StackInfo {
    directory: String,
    frames: usize,
    width: u32,
    height: u32,
    exposures: Vec<f32>,
    shortest_exposure: f32,
    longest_exposure: f32,
    /// Ratio between the longest and shortest exposure, in stops.
    bracket_stops: f32,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let entries = read_manifest(args.dir.join(lumen_io::MANIFEST_NAME))
        .with_context(|| format!("failed to read manifest in {}", args.dir.display()))?;

    // Dimensions come from the first frame; decoding the whole stack just
    // to print a summary would be wasteful.
    let first = lumen_io::ldr::read_frame(args.dir.join(&entries[0].file))
        .with_context(|| format!("failed to decode {}", entries[0].file))?;

    let exposures: Vec<f32> = entries.iter().map(|e| e.seconds).collect();
    let shortest = exposures.iter().copied().fold(f32::INFINITY, f32::min);
    let longest = exposures.iter().copied().fold(0.0f32, f32::max);

    let info = StackInfo {
        directory: args.dir.display().to_string(),
        frames: entries.len(),
        width: first.width(),
        height: first.height(),
        exposures,
        shortest_exposure: shortest,
        longest_exposure: longest,
        bracket_stops: (longest / shortest).log2(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.directory);
        println!("  frames:    {} ({}x{})", info.frames, info.width, info.height);
        for (entry, seconds) in entries.iter().zip(&info.exposures) {
            println!("    {:<24} {:.6}s", entry.file, seconds);
        }
        println!(
            "  bracket:   {:.6}s .. {:.6}s ({:.1} stops)",
            info.shortest_exposure, info.longest_exposure, info.bracket_stops
        );
    }
    Ok(())
}
