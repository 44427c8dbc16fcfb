//! # lumen-core
//!
//! Core types for HDR radiance reconstruction pipelines.
//!
//! This crate defines the data model shared by the rest of the workspace:
//!
//! - [`LdrFrame`] / [`ExposureStack`] - decoded 8-bit source photographs
//!   with their exposure times
//! - [`ResponseCurve`] - calibrated inverse camera response, code value to
//!   log-exposure per channel
//! - [`RgbMap`] / [`LuminanceMap`] - dense f32 grids for reconstructed
//!   radiance, tone-mapped output, and derived luminance
//!
//! All buffers are flat, row-major, and interleaved; channel order is RGB
//! everywhere. Structural preconditions (matching dimensions, positive
//! exposures, complete curve table) are enforced at construction so the
//! computational crates can assume valid inputs.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod curve;
mod error;
mod frame;
mod map;

pub use curve::{ResponseCurve, CURVE_SIZE};
pub use error::{CoreError, CoreResult};
pub use frame::{ExposureStack, LdrFrame, CHANNELS};
pub use map::{quantize_u16, quantize_u8, LuminanceMap, RgbMap};
