//! Shared builders for integration tests of the lumen crates.
//!
//! Synthetic scenes use the `ln(z)` response curve, whose inverse is the
//! identity encoding: a pixel of code value `z` at unit exposure decodes
//! to irradiance `z` exactly. That makes expected radiance values
//! hand-computable in every test.

use lumen_core::{ExposureStack, LdrFrame, CHANNELS};

/// Builds a frame where pixel (x, y) has code value `f(x, y)` on all
/// three channels.
pub fn frame_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> LdrFrame {
    let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
    for y in 0..height {
        for x in 0..width {
            let z = f(x, y);
            data.extend_from_slice(&[z, z, z]);
        }
    }
    LdrFrame::from_data(width, height, data).expect("buffer sized to dimensions")
}

/// A bracketed stack of one scene: the scene's irradiance is `f(x, y)`,
/// and each frame observes `irradiance * exposure` clamped to 8 bits
/// through the identity encoding.
pub fn bracketed_stack(
    width: u32,
    height: u32,
    exposures: &[f32],
    scene: impl Fn(u32, u32) -> f32,
) -> ExposureStack {
    let frames = exposures
        .iter()
        .map(|&t| {
            frame_from_fn(width, height, |x, y| {
                (scene(x, y) * t).round().clamp(0.0, 255.0) as u8
            })
        })
        .collect();
    ExposureStack::new(frames, exposures.to_vec()).expect("valid synthetic stack")
}
