//! Floating-point image maps.
//!
//! [`RgbMap`] is a dense three-channel `f32` grid, row-major and
//! interleaved like [`LdrFrame`](crate::LdrFrame). It holds linear scene
//! radiance after reconstruction (non-negative, unbounded above) and
//! display-referred values in `[0, 1)` after tone mapping. [`LuminanceMap`]
//! is its single-channel counterpart.

use crate::{CoreError, CoreResult, CHANNELS};

/// Dense three-channel f32 map.
#[derive(Debug, Clone)]
pub struct RgbMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl RgbMap {
    /// Creates a zero-filled map.
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![0.0f32; width as usize * height as usize * CHANNELS];
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps interleaved RGB floats.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if `data.len()` is not
    /// `width * height * 3`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> CoreResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CoreError::InvalidDimensions(format!(
                "expected {} floats for {}x{} RGB, got {}",
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

    /// Map width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Map dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Interleaved RGB floats.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the interleaved floats.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// The RGB triple at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; CHANNELS] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }

    /// Sets the RGB triple at (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [f32; CHANNELS]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[offset..offset + CHANNELS].copy_from_slice(&pixel);
    }

    /// Consumes the map, returning the raw buffer.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }
}

/// Dense single-channel f32 map.
#[derive(Debug, Clone)]
pub struct LuminanceMap {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl LuminanceMap {
    /// Creates a zero-filled map.
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![0.0f32; width as usize * height as usize];
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps a luminance buffer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if `data.len()` is not
    /// `width * height`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> CoreResult<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(CoreError::InvalidDimensions(format!(
                "expected {} floats for {}x{} mono, got {}",
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

    /// Map width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance values, row-major.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// The value at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> f32 {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Quantizes a normalized value to u8 full scale, saturating.
#[inline]
pub fn quantize_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Quantizes a normalized value to u16 full scale, saturating.
#[inline]
pub fn quantize_u16(v: f32) -> u16 {
    (v * 65535.0).round().clamp(0.0, 65535.0) as u16
}
