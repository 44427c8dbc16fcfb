//! Error types for pipeline operations.

use thiserror::Error;

/// Error type for reconstruction and tone-mapping operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Inputs to an operation have incompatible sizes.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for pipeline operations.
pub type OpsResult<T> = Result<T, OpsError>;
