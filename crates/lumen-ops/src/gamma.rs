//! Gamma re-encoding.
//!
//! Display devices expect gamma-encoded values; the tone mapper emits
//! linear ones. `encode` applies `v^(1/gamma)` per channel on normalized
//! values. 2.0 and 2.2 are the usual exponents, always passed in as a
//! parameter.

use crate::{OpsError, OpsResult};
use lumen_core::RgbMap;

/// Gamma OETF for one normalized value: `v^(1/gamma)`.
#[inline]
pub fn encode(v: f32, gamma: f32) -> f32 {
    if v <= 0.0 {
        0.0
    } else {
        v.powf(1.0 / gamma)
    }
}

/// Gamma-encodes every channel of a map.
///
/// Input values are expected in `[0, 1]` (tone-mapped output); values are
/// not clamped, so radiance above 1 simply encodes above 1.
///
/// # Errors
///
/// Returns [`OpsError::InvalidParameter`] unless `gamma` is positive and
/// finite.
pub fn encode_map(map: &RgbMap, gamma: f32) -> OpsResult<RgbMap> {
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(OpsError::InvalidParameter(format!(
            "gamma must be positive and finite, got {}",
            gamma
        )));
    }
    let mut out = map.clone();
    out.data_mut().iter_mut().for_each(|v| *v = encode(*v, gamma));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn encode_is_power_law() {
        assert_relative_eq!(encode(0.25, 2.0), 0.5, max_relative = 1e-6);
        assert_relative_eq!(encode(1.0, 2.2), 1.0, max_relative = 1e-6);
        assert_eq!(encode(0.0, 2.2), 0.0);
        assert_eq!(encode(-0.5, 2.2), 0.0);
    }

    #[test]
    fn encode_gamma_one_is_identity() {
        for i in 0..=10 {
            let v = i as f32 / 10.0;
            assert_relative_eq!(encode(v, 1.0), v, max_relative = 1e-6);
        }
    }

    #[test]
    fn encode_map_rejects_bad_gamma() {
        let map = RgbMap::new(2, 2);
        assert!(encode_map(&map, 2.2).is_ok());
        assert!(encode_map(&map, 0.0).is_err());
        assert!(encode_map(&map, f32::INFINITY).is_err());
    }
}
