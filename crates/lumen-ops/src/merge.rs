//! Radiance reconstruction from an exposure stack.
//!
//! Every frame in the stack is an 8-bit observation of the same scene at a
//! known exposure time. Inverting the camera response gives, per retained
//! sample, an estimate of scene irradiance `exp(g(z, c)) / t`; averaging
//! the estimates across the stack fuses them into one linear radiance
//! value per pixel per channel.
//!
//! # Saturation rejection
//!
//! Code values 0 and 255 are clipped observations and carry no usable
//! response information, so they are discarded before averaging. This is
//! what lets the merge tolerate over- and under-exposed frames. A pixel
//! whose samples are all rejected fuses to exactly 0 - a defined fallback,
//! never NaN.
//!
//! Each pixel is independent of every other pixel; work is distributed
//! over rows with no coordination.

use lumen_core::{ExposureStack, ResponseCurve, RgbMap, CHANNELS};
use rayon::prelude::*;
use std::time::Instant;
use tracing::debug;

/// Fuses an exposure stack into a linear radiance map.
///
/// Structural preconditions (aligned frames, positive exposure times,
/// complete curve) are guaranteed by the input types, so reconstruction
/// itself cannot fail.
///
/// # Example
///
/// ```rust
/// use lumen_core::{ExposureStack, LdrFrame, ResponseCurve};
/// use lumen_ops::merge;
///
/// let frames = vec![LdrFrame::new(4, 4), LdrFrame::new(4, 4)];
/// let stack = ExposureStack::new(frames, vec![0.5, 2.0]).unwrap();
/// let radiance = merge::reconstruct(&stack, &ResponseCurve::log_linear());
/// assert_eq!(radiance.dimensions(), (4, 4));
/// ```
pub fn reconstruct(stack: &ExposureStack, curve: &ResponseCurve) -> RgbMap {
    let width = stack.width() as usize;
    let height = stack.height();
    let start = Instant::now();

    let mut out = RgbMap::new(stack.width(), height);
    out.data_mut()
        .par_chunks_mut(width * CHANNELS)
        .enumerate()
        .for_each(|(y, row)| {
            reconstruct_row(stack, curve, y as u32, row);
        });

    debug!(
        width,
        height,
        frames = stack.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "radiance merge complete"
    );
    out
}

/// Fuses one output row. `row` is the interleaved RGB destination slice.
fn reconstruct_row(stack: &ExposureStack, curve: &ResponseCurve, y: u32, row: &mut [f32]) {
    let width = stack.width() as usize;
    for x in 0..width {
        let mut sums = [0.0f32; CHANNELS];
        let mut counts = [0u32; CHANNELS];

        for (frame, seconds) in stack.iter() {
            let src = frame.row(y);
            for c in 0..CHANNELS {
                let z = src[x * CHANNELS + c];
                if z != 0 && z != u8::MAX {
                    sums[c] += curve.exposure(z, c) / seconds;
                    counts[c] += 1;
                }
            }
        }

        for c in 0..CHANNELS {
            row[x * CHANNELS + c] = if counts[c] > 0 {
                sums[c] / counts[c] as f32
            } else {
                0.0
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lumen_core::LdrFrame;

    fn uniform_frame(width: u32, height: u32, value: u8) -> LdrFrame {
        let data = vec![value; width as usize * height as usize * CHANNELS];
        LdrFrame::from_data(width, height, data).unwrap()
    }

    #[test]
    fn all_saturated_pixels_fuse_to_zero() {
        // One frame clipped black, one clipped white: nothing survives.
        let frames = vec![uniform_frame(3, 3, 0), uniform_frame(3, 3, 255)];
        let stack = ExposureStack::new(frames, vec![1.0, 4.0]).unwrap();
        let radiance = reconstruct(&stack, &ResponseCurve::log_linear());
        assert!(radiance.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn identical_frames_roundtrip_known_encoding() {
        // With g(z) = ln(z) and unit exposure, each sample decodes to z
        // exactly, so N copies of a frame reconstruct the frame itself.
        let mut frame = LdrFrame::new(16, 1);
        for x in 0..16 {
            let z = (x * 16 + 1) as u8;
            frame.set_pixel(x, 0, [z, z, z]);
        }
        let stack = ExposureStack::new(
            vec![frame.clone(), frame.clone(), frame.clone()],
            vec![1.0, 1.0, 1.0],
        )
        .unwrap();

        let radiance = reconstruct(&stack, &ResponseCurve::log_linear());
        for x in 0..16 {
            let expected = frame.pixel(x, 0)[0] as f32;
            for c in 0..CHANNELS {
                assert_relative_eq!(radiance.pixel(x, 0)[c], expected, max_relative = 1e-5);
            }
        }
    }

    #[test]
    fn golden_2x2_stack() {
        // Exposures {1, 2, 4} with g(z) = ln(z): every retained sample
        // contributes z / t, and the fused value is the mean.
        let mut f1 = LdrFrame::new(2, 2);
        let mut f2 = LdrFrame::new(2, 2);
        let mut f3 = LdrFrame::new(2, 2);
        let codes = [
            // (f1, f2, f3) per pixel
            [50u8, 100, 200],
            [10, 20, 40],
            [100, 150, 200],
            [0, 255, 128],
        ];
        for (i, z) in codes.iter().enumerate() {
            let (x, y) = (i as u32 % 2, i as u32 / 2);
            f1.set_pixel(x, y, [z[0]; 3]);
            f2.set_pixel(x, y, [z[1]; 3]);
            f3.set_pixel(x, y, [z[2]; 3]);
        }
        let stack = ExposureStack::new(vec![f1, f2, f3], vec![1.0, 2.0, 4.0]).unwrap();
        let radiance = reconstruct(&stack, &ResponseCurve::log_linear());

        // (50 + 50 + 50) / 3, (10 + 10 + 10) / 3, (100 + 75 + 50) / 3,
        // and 128/4 alone (0 and 255 rejected).
        let expected = [50.0f32, 10.0, 75.0, 32.0];
        for (i, &want) in expected.iter().enumerate() {
            let (x, y) = (i as u32 % 2, i as u32 / 2);
            for c in 0..CHANNELS {
                assert_relative_eq!(radiance.pixel(x, y)[c], want, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn single_frame_stack_degenerates_to_decode() {
        let frames = vec![uniform_frame(2, 2, 77)];
        let stack = ExposureStack::new(frames, vec![1.0]).unwrap();
        let radiance = reconstruct(&stack, &ResponseCurve::log_linear());
        for &v in radiance.data() {
            assert_relative_eq!(v, 77.0, max_relative = 1e-5);
        }
    }

    #[test]
    fn shorter_exposure_scales_irradiance_up() {
        // Same code value seen at half the exposure time means the scene
        // was twice as bright.
        let stack_a = ExposureStack::new(vec![uniform_frame(1, 1, 100)], vec![1.0]).unwrap();
        let stack_b = ExposureStack::new(vec![uniform_frame(1, 1, 100)], vec![0.5]).unwrap();
        let curve = ResponseCurve::log_linear();
        let a = reconstruct(&stack_a, &curve).pixel(0, 0)[0];
        let b = reconstruct(&stack_b, &curve).pixel(0, 0)[0];
        assert_relative_eq!(b, 2.0 * a, max_relative = 1e-5);
    }
}
