//! 8-bit frame decoding and display-image encoding.
//!
//! Source frames are ordinary 8-bit PNG or JPEG photographs; they decode
//! into [`LdrFrame`] (RGB, alpha dropped, grayscale replicated). Output
//! images are tone-mapped [`RgbMap`]s quantized to 8- or 16-bit PNG.

use crate::{IoError, IoResult};
use lumen_core::{quantize_u16, quantize_u8, LdrFrame, RgbMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

/// Output bit depth for encoded PNGs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 8 bits per channel.
    Eight,
    /// 16 bits per channel.
    #[default]
    Sixteen,
}

/// Reads an 8-bit frame, dispatching on file extension (`png`, `jpg`,
/// `jpeg`).
pub fn read_frame<P: AsRef<Path>>(path: P) -> IoResult<LdrFrame> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "png" => read_png(path),
        "jpg" | "jpeg" => read_jpeg(path),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

fn read_png(path: &Path) -> IoResult<LdrFrame> {
    let file = File::open(path)?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    let rgb = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgb, png::BitDepth::Eight) => bytes.to_vec(),
        (png::ColorType::Rgba, png::BitDepth::Eight) => bytes
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            bytes.iter().flat_map(|&g| [g, g, g]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => bytes
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0]])
            .collect(),
        (color, depth) => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?} {:?}, expected 8-bit",
                color, depth
            )));
        }
    };

    debug!(path = %path.display(), width = info.width, height = info.height, "decoded PNG frame");
    Ok(LdrFrame::from_data(info.width, info.height, rgb)?)
}

fn read_jpeg(path: &Path) -> IoResult<LdrFrame> {
    let file = File::open(path)?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG frame info".into()))?;

    let rgb = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        other => {
            return Err(IoError::UnsupportedBitDepth(format!(
                "{:?}, expected 8-bit RGB or grayscale",
                other
            )));
        }
    };

    debug!(path = %path.display(), width = info.width, height = info.height, "decoded JPEG frame");
    Ok(LdrFrame::from_data(
        info.width as u32,
        info.height as u32,
        rgb,
    )?)
}

/// Writes a normalized `[0, 1]` map as a PNG at the requested bit depth.
///
/// Values are quantized with saturation, so out-of-range floats clip
/// rather than wrap.
pub fn write_png<P: AsRef<Path>>(path: P, map: &RgbMap, depth: BitDepth) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, map.width(), map.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(match depth {
        BitDepth::Eight => png::BitDepth::Eight,
        BitDepth::Sixteen => png::BitDepth::Sixteen,
    });

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    let bytes: Vec<u8> = match depth {
        BitDepth::Eight => map.data().iter().map(|&v| quantize_u8(v)).collect(),
        // PNG stores 16-bit samples big-endian.
        BitDepth::Sixteen => map
            .data()
            .iter()
            .flat_map(|&v| quantize_u16(v).to_be_bytes())
            .collect(),
    };

    png_writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;

    debug!(path = %path.display(), ?depth, "wrote PNG");
    Ok(())
}
