//! 8-bit source frames and exposure stacks.
//!
//! An [`LdrFrame`] is one decoded low-dynamic-range photograph: interleaved
//! 8-bit RGB, row-major, top-to-bottom. An [`ExposureStack`] is the ordered
//! set of frames of the same scene together with their exposure times, and
//! is the input to radiance reconstruction.
//!
//! # Memory layout
//!
//! ```text
//! [R G B R G B ...]  <- row 0
//! [R G B R G B ...]  <- row 1
//! ```
//!
//! Channel order is RGB throughout the workspace; decoders are responsible
//! for converting anything else before constructing a frame.

use crate::{CoreError, CoreResult};

/// Number of color channels in every frame and map.
pub const CHANNELS: usize = 3;

/// One decoded 8-bit RGB photograph.
#[derive(Debug, Clone)]
pub struct LdrFrame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LdrFrame {
    /// Creates a frame from interleaved RGB data.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 3`.
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CoreError::InvalidDimensions(format!(
                "expected {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a black frame.
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![0u8; width as usize * height as usize * CHANNELS];
        Self {
            width,
            height,
            data,
        }
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw interleaved RGB bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The RGB triple at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; CHANNELS] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    /// Sets the RGB triple at (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [u8; CHANNELS]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[offset..offset + CHANNELS].copy_from_slice(&pixel);
    }

    /// One row of interleaved RGB bytes.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize * CHANNELS;
        &self.data[start..start + self.width as usize * CHANNELS]
    }
}

/// An ordered stack of aligned frames with their exposure times.
///
/// Invariants, enforced at construction:
/// - at least one frame (a single-frame stack degenerates to a trivial
///   merge, but is allowed);
/// - every frame has identical dimensions;
/// - every exposure time is positive and finite.
///
/// Frames are assumed pixel-aligned; registration is out of scope.
#[derive(Debug, Clone)]
pub struct ExposureStack {
    frames: Vec<LdrFrame>,
    exposures: Vec<f32>,
    width: u32,
    height: u32,
}

impl ExposureStack {
    /// Builds a stack from parallel frame and exposure lists.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStack`] for an empty stack or mismatched
    /// list lengths, [`CoreError::SizeMismatch`] if frame dimensions differ,
    /// and [`CoreError::InvalidExposure`] for a non-positive or non-finite
    /// exposure time.
    pub fn new(frames: Vec<LdrFrame>, exposures: Vec<f32>) -> CoreResult<Self> {
        if frames.is_empty() {
            return Err(CoreError::InvalidStack("no frames".into()));
        }
        if frames.len() != exposures.len() {
            return Err(CoreError::InvalidStack(format!(
                "{} frames but {} exposure times",
                frames.len(),
                exposures.len()
            )));
        }

        let (width, height) = frames[0].dimensions();
        for (i, frame) in frames.iter().enumerate() {
            if frame.dimensions() != (width, height) {
                return Err(CoreError::SizeMismatch(format!(
                    "frame {} is {}x{}, expected {}x{}",
                    i,
                    frame.width(),
                    frame.height(),
                    width,
                    height
                )));
            }
        }
        for (i, &seconds) in exposures.iter().enumerate() {
            if !(seconds.is_finite() && seconds > 0.0) {
                return Err(CoreError::InvalidExposure { frame: i, seconds });
            }
        }

        Ok(Self {
            frames,
            exposures,
            width,
            height,
        })
    }

    /// Number of frames in the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the stack holds no frames. Unreachable for constructed
    /// stacks, provided for completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Common frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Common frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The frames, in stack order.
    #[inline]
    pub fn frames(&self) -> &[LdrFrame] {
        &self.frames
    }

    /// Exposure times in seconds, parallel to [`frames`](Self::frames).
    #[inline]
    pub fn exposures(&self) -> &[f32] {
        &self.exposures
    }

    /// Iterates over (frame, exposure seconds) pairs in stack order.
    pub fn iter(&self) -> impl Iterator<Item = (&LdrFrame, f32)> {
        self.frames.iter().zip(self.exposures.iter().copied())
    }
}
