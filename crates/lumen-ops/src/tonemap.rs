//! Reinhard global tone mapping.
//!
//! Compresses an unbounded radiance map into `[0, 1)` for display. The
//! operator is luminance-driven: per pixel the luminance is scaled by
//! `key / log_average`, compressed with `x / (1 + x)`, and the RGB triple
//! is multiplied by `compressed / L`. Scaling all three channels by the
//! same factor preserves chrominance ratios; channels are never clamped
//! independently.
//!
//! Two-stage structure: stage 1 (the log-average reduction, see
//! [`crate::luminance`]) runs over the whole image before stage 2 (a pure
//! per-pixel map) begins. The scalar between them is the only
//! synchronization point.
//!
//! Because the operator normalizes by the scene's own log-average, it is
//! self-calibrating: scaling the entire radiance map by a positive
//! constant leaves the output unchanged.

use crate::luminance::{log_average, luminance_map};
use crate::{OpsError, OpsResult};
use lumen_core::{LuminanceMap, RgbMap, CHANNELS};
use rayon::prelude::*;
use tracing::debug;

/// Default key value: a mid-gray target, the photographic convention.
pub const DEFAULT_KEY: f32 = 0.18;

/// Reinhard global operator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reinhard {
    /// Key value (alpha): the exposure bias of the output. Higher pulls
    /// more of the range toward bright.
    pub key: f32,
}

impl Default for Reinhard {
    fn default() -> Self {
        Self { key: DEFAULT_KEY }
    }
}

impl Reinhard {
    /// Creates an operator with the given key value.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] unless `key` is positive and
    /// finite.
    pub fn new(key: f32) -> OpsResult<Self> {
        if !(key.is_finite() && key > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "key value must be positive and finite, got {}",
                key
            )));
        }
        Ok(Self { key })
    }

    /// Compressed luminance for input luminance `l` given the scene
    /// log-average `avg`. Monotonic, maps `[0, inf)` into `[0, 1)`.
    #[inline]
    pub fn compress(&self, l: f32, avg: f32) -> f32 {
        let scaled = (self.key / avg) * l;
        scaled / (1.0 + scaled)
    }
}

/// Tone maps a radiance map, returning the derived luminance map and the
/// compressed output.
///
/// Runs both stages: luminance + log-average, then the per-pixel map. An
/// all-black input (no positive luminance anywhere) produces an all-black
/// output rather than an error or NaN.
pub fn tone_map(radiance: &RgbMap, op: Reinhard) -> OpsResult<(LuminanceMap, RgbMap)> {
    let luminance = luminance_map(radiance);
    let mapped = match log_average(&luminance) {
        Some(avg) => apply_global(radiance, &luminance, avg, op)?,
        None => {
            debug!("no positive luminance in scene, emitting black output");
            RgbMap::new(radiance.width(), radiance.height())
        }
    };
    Ok((luminance, mapped))
}

/// Stage 2: applies the global operator given the precomputed luminance
/// map and scene log-average.
///
/// # Errors
///
/// Returns [`OpsError::SizeMismatch`] if the two maps disagree on
/// dimensions, and [`OpsError::InvalidParameter`] for a non-positive
/// log-average.
pub fn apply_global(
    radiance: &RgbMap,
    luminance: &LuminanceMap,
    avg: f32,
    op: Reinhard,
) -> OpsResult<RgbMap> {
    if (luminance.width(), luminance.height()) != radiance.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "luminance map is {}x{}, radiance map is {}x{}",
            luminance.width(),
            luminance.height(),
            radiance.width(),
            radiance.height()
        )));
    }
    if !(avg.is_finite() && avg > 0.0) {
        return Err(OpsError::InvalidParameter(format!(
            "log-average luminance must be positive and finite, got {}",
            avg
        )));
    }

    let width = radiance.width() as usize;
    let mut out = RgbMap::new(radiance.width(), radiance.height());
    out.data_mut()
        .par_chunks_mut(width * CHANNELS)
        .zip(radiance.data().par_chunks(width * CHANNELS))
        .zip(luminance.data().par_chunks(width))
        .for_each(|((dst, src), lum)| {
            for x in 0..width {
                let l = lum[x];
                // L == 0 maps to black outright, never a divide.
                let scale = if l > 0.0 { op.compress(l, avg) / l } else { 0.0 };
                for c in 0..CHANNELS {
                    dst[x * CHANNELS + c] = src[x * CHANNELS + c] * scale;
                }
            }
        });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient_map(width: u32, height: u32) -> RgbMap {
        let mut map = RgbMap::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let v = (y * width + x) as f32;
                map.set_pixel(x, y, [v * 0.5, v, v * 2.0 + 0.1]);
            }
        }
        map
    }

    #[test]
    fn rejects_non_positive_key() {
        assert!(Reinhard::new(0.18).is_ok());
        assert!(Reinhard::new(0.0).is_err());
        assert!(Reinhard::new(-1.0).is_err());
        assert!(Reinhard::new(f32::NAN).is_err());
    }

    #[test]
    fn output_is_bounded_below_one() {
        let radiance = gradient_map(8, 8);
        let (_, mapped) = tone_map(&radiance, Reinhard::default()).unwrap();
        for &v in mapped.data() {
            assert!((0.0..1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn compression_is_monotonic_in_luminance() {
        let op = Reinhard::default();
        let avg = 0.7;
        let mut prev = -1.0f32;
        for i in 0..1000 {
            let l = i as f32 * 0.05;
            let c = op.compress(l, avg);
            assert!(c >= prev, "not monotonic at L = {}", l);
            prev = c;
        }
    }

    #[test]
    fn operator_is_invariant_under_uniform_scaling() {
        let radiance = gradient_map(6, 4);
        let scaled = {
            let mut m = radiance.clone();
            m.data_mut().iter_mut().for_each(|v| *v *= 1000.0);
            m
        };
        let op = Reinhard::default();
        let (_, a) = tone_map(&radiance, op).unwrap();
        let (_, b) = tone_map(&scaled, op).unwrap();
        for (&x, &y) in a.data().iter().zip(b.data()) {
            assert_relative_eq!(x, y, max_relative = 1e-4, epsilon = 1e-6);
        }
    }

    #[test]
    fn preserves_chrominance_ratios() {
        let mut radiance = RgbMap::new(2, 1);
        radiance.set_pixel(0, 0, [4.0, 2.0, 1.0]);
        radiance.set_pixel(1, 0, [0.3, 0.3, 0.3]);
        let (_, mapped) = tone_map(&radiance, Reinhard::default()).unwrap();
        let px = mapped.pixel(0, 0);
        assert_relative_eq!(px[0] / px[1], 2.0, max_relative = 1e-5);
        assert_relative_eq!(px[1] / px[2], 2.0, max_relative = 1e-5);
    }

    #[test]
    fn black_map_produces_black_output_without_nan() {
        let radiance = RgbMap::new(4, 4);
        let (lum, mapped) = tone_map(&radiance, Reinhard::default()).unwrap();
        assert!(lum.data().iter().all(|&v| v == 0.0));
        assert!(mapped.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_luminance_pixels_map_to_black() {
        let mut radiance = RgbMap::new(2, 1);
        radiance.set_pixel(0, 0, [1.0, 1.0, 1.0]);
        // second pixel stays zero
        let (_, mapped) = tone_map(&radiance, Reinhard::default()).unwrap();
        assert_eq!(mapped.pixel(1, 0), [0.0, 0.0, 0.0]);
        assert!(mapped.pixel(0, 0).iter().all(|v| v.is_finite()));
    }

    #[test]
    fn apply_global_rejects_mismatched_maps() {
        let radiance = RgbMap::new(4, 4);
        let lum = LuminanceMap::new(3, 4);
        let err = apply_global(&radiance, &lum, 1.0, Reinhard::default());
        assert!(matches!(err, Err(OpsError::SizeMismatch(_))));
    }
}
