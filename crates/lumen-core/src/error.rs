//! Error types for core data structures.

use thiserror::Error;

/// Error type for core type construction and validation.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Buffer length does not match the declared dimensions.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Frames in a stack have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Exposure stack violates a structural precondition.
    #[error("invalid stack: {0}")]
    InvalidStack(String),

    /// Exposure time is not a positive finite number.
    #[error("invalid exposure time for frame {frame}: {seconds}")]
    InvalidExposure {
        /// Index of the offending frame.
        frame: usize,
        /// The rejected exposure value.
        seconds: f32,
    },

    /// Response curve table is malformed or incomplete.
    #[error("invalid response curve: {0}")]
    InvalidCurve(String),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
