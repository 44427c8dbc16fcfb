//! Error types for I/O operations.

use lumen_core::CoreError;
use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported file format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or corrupted file.
    #[error("invalid file: {0}")]
    InvalidFile(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unsupported bit depth.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Text parse error (exposure manifest, curve file).
    #[error("parse error: {0}")]
    Parse(String),

    /// Loaded data failed core-type validation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
