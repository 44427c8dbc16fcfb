//! Luminance derivation and the scene log-average.
//!
//! The tone mapper needs two things from a radiance map: a per-pixel
//! luminance channel and one scalar, the log-average (geometric mean) of
//! all strictly positive luminance values. The scalar is a whole-image
//! reduction and must be complete before any per-pixel mapping starts; it
//! is the single synchronization point of the pipeline.
//!
//! The reduction is expressed as an explicit accumulator ([`LogLumSum`])
//! with an identity element and an associative merge, so partial sums from
//! parallel workers combine safely.

use lumen_core::{LuminanceMap, RgbMap, CHANNELS};
use rayon::prelude::*;

/// Rec. 601 luma weight for red.
pub const LUMA_R: f32 = 0.299;
/// Rec. 601 luma weight for green.
pub const LUMA_G: f32 = 0.587;
/// Rec. 601 luma weight for blue.
pub const LUMA_B: f32 = 0.114;

/// Guard term inside the logarithm so a boundary value of exactly 0 after
/// the positivity test still cannot produce `ln(0)`.
const LOG_GUARD: f64 = f64::EPSILON;

/// Luminance of one linear RGB triple.
#[inline]
pub fn luma(rgb: [f32; CHANNELS]) -> f32 {
    LUMA_R * rgb[0] + LUMA_G * rgb[1] + LUMA_B * rgb[2]
}

/// Derives the luminance map of a radiance map.
pub fn luminance_map(radiance: &RgbMap) -> LuminanceMap {
    let values: Vec<f32> = radiance
        .data()
        .par_chunks(CHANNELS)
        .map(|px| luma([px[0], px[1], px[2]]))
        .collect();
    LuminanceMap::from_data(radiance.width(), radiance.height(), values)
        .expect("luminance buffer matches source dimensions")
}

/// Running sum of log-luminance with its contributing-pixel count.
///
/// `identity()` is the reduction's identity element; [`merge`](Self::merge)
/// is associative, so any grouping of partial accumulations yields the
/// same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLumSum {
    sum: f64,
    count: u64,
}

impl LogLumSum {
    /// The empty accumulation.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Folds one luminance value in. Non-positive values do not contribute.
    #[inline]
    pub fn accumulate(mut self, l: f32) -> Self {
        if l > 0.0 {
            self.sum += (l as f64 + LOG_GUARD).ln();
            self.count += 1;
        }
        self
    }

    /// Combines two partial accumulations.
    pub fn merge(self, other: Self) -> Self {
        Self {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    /// Number of pixels that contributed.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Finishes the reduction: `exp(sum / count)`.
    ///
    /// Returns `None` when nothing contributed (an all-black map), the
    /// degenerate case callers turn into an all-zero output.
    pub fn geometric_mean(&self) -> Option<f32> {
        if self.count == 0 {
            return None;
        }
        Some((self.sum / self.count as f64).exp() as f32)
    }
}

/// Log-average luminance of a map: the geometric mean of its strictly
/// positive entries, or `None` if there are none.
pub fn log_average(luminance: &LuminanceMap) -> Option<f32> {
    luminance
        .data()
        .par_iter()
        .fold(LogLumSum::identity, |acc, &l| acc.accumulate(l))
        .reduce(LogLumSum::identity, LogLumSum::merge)
        .geometric_mean()
}
