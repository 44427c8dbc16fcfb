//! Camera response curve.
//!
//! A calibrated camera maps scene exposure (irradiance x time) to an 8-bit
//! code value through an unknown non-linearity. The response curve is the
//! calibrated inverse of that mapping: for each code value `z` and channel
//! `c` it stores `g(z, c)` such that `exp(g(z, c))` is the relative
//! exposure that produced `z`. Calibration itself is out of scope; the
//! table arrives precomputed (see `lumen-io`'s curve parser).
//!
//! # Channel order
//!
//! Rows are stored R, G, B - the same order every frame and map in this
//! workspace uses. A table calibrated against BGR frames must be reordered
//! by the loader before construction.

use crate::{CoreError, CoreResult, CHANNELS};

/// Number of table rows: one per possible 8-bit code value.
pub const CURVE_SIZE: usize = 256;

/// Per-channel log-exposure lookup table, immutable after construction.
#[derive(Debug, Clone)]
pub struct ResponseCurve {
    table: Vec<[f32; CHANNELS]>,
}

impl ResponseCurve {
    /// Builds a curve from 256 rows of per-channel log-exposure values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCurve`] if the row count is not 256 or
    /// any entry is not finite.
    pub fn from_rows(rows: Vec<[f32; CHANNELS]>) -> CoreResult<Self> {
        if rows.len() != CURVE_SIZE {
            return Err(CoreError::InvalidCurve(format!(
                "expected {} rows, got {}",
                CURVE_SIZE,
                rows.len()
            )));
        }
        for (z, row) in rows.iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                return Err(CoreError::InvalidCurve(format!(
                    "non-finite entry at code value {}",
                    z
                )));
            }
        }
        Ok(Self { table: rows })
    }

    /// Synthetic curve with `g(z) = ln(z)` on every channel.
    ///
    /// The exact inverse of a linear camera, so `exp(g(z)) == z`. Row 0 is
    /// pinned to `g(1)`; code value 0 is rejected as saturated during
    /// merging, so the entry is never consulted there.
    pub fn log_linear() -> Self {
        let table = (0..CURVE_SIZE)
            .map(|z| {
                let g = (z.max(1) as f32).ln();
                [g; CHANNELS]
            })
            .collect();
        Self { table }
    }

    /// Log-exposure `g(z, c)` for code value `z` on channel `c`.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= 3`.
    #[inline]
    pub fn log_exposure(&self, z: u8, channel: usize) -> f32 {
        self.table[z as usize][channel]
    }

    /// The full row for code value `z`, channels in R, G, B order.
    #[inline]
    pub fn row(&self, z: u8) -> [f32; CHANNELS] {
        self.table[z as usize]
    }

    /// Relative exposure `exp(g(z, c))`.
    #[inline]
    pub fn exposure(&self, z: u8, channel: usize) -> f32 {
        self.log_exposure(z, channel).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_rows_requires_full_table() {
        let rows = vec![[0.0f32; 3]; 255];
        assert!(ResponseCurve::from_rows(rows).is_err());
        let rows = vec![[0.0f32; 3]; 256];
        assert!(ResponseCurve::from_rows(rows).is_ok());
    }

    #[test]
    fn from_rows_rejects_non_finite() {
        let mut rows = vec![[0.0f32; 3]; 256];
        rows[128][1] = f32::NAN;
        assert!(ResponseCurve::from_rows(rows).is_err());
    }

    #[test]
    fn log_linear_inverts_identity_encoding() {
        let curve = ResponseCurve::log_linear();
        for z in 1..=254u8 {
            for c in 0..CHANNELS {
                assert_relative_eq!(curve.exposure(z, c), z as f32, max_relative = 1e-5);
            }
        }
    }
}
