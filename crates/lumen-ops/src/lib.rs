//! # lumen-ops
//!
//! The computational core of the HDR pipeline: radiance reconstruction
//! from an exposure stack and Reinhard global tone mapping.
//!
//! # Modules
//!
//! - [`merge`] - fuse an [`ExposureStack`](lumen_core::ExposureStack) into
//!   a linear radiance map through the camera response curve
//! - [`luminance`] - luminance derivation and the scene log-average
//!   reduction
//! - [`tonemap`] - the Reinhard global operator, two-stage
//! - [`gamma`] - power-law re-encoding for display
//!
//! # Example
//!
//! ```rust
//! use lumen_core::{ExposureStack, LdrFrame, ResponseCurve};
//! use lumen_ops::{gamma, merge, tonemap::{self, Reinhard}};
//!
//! let frames = vec![LdrFrame::new(8, 8), LdrFrame::new(8, 8)];
//! let stack = ExposureStack::new(frames, vec![0.25, 1.0])?;
//!
//! let radiance = merge::reconstruct(&stack, &ResponseCurve::log_linear());
//! let (luminance, mapped) = tonemap::tone_map(&radiance, Reinhard::default())?;
//! let encoded = gamma::encode_map(&mapped, 2.2)?;
//! # let _ = (luminance, encoded);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Data flows one way: stack + curve -> radiance -> luminance +
//! log-average -> tone-mapped map -> gamma-encoded map. Every per-pixel
//! step is data-parallel; the log-average reduction between the tone
//! mapper's two stages is the only synchronization point.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod gamma;
pub mod luminance;
pub mod merge;
pub mod tonemap;

pub use error::{OpsError, OpsResult};
pub use tonemap::Reinhard;
