//! Radiance HDR (RGBE) output for reconstructed maps.
//!
//! The radiance map is unbounded linear data, so it is persisted in the
//! Radiance RGBE format: a shared 8-bit exponent per pixel, RLE-compressed
//! scanlines. The single-channel luminance map is written with its value
//! replicated to all three channels (RGBE has no mono variant).
//!
//! Reading is supported for both RLE and flat scanlines, enough to round-
//! trip our own output and load maps produced by other tools.

use crate::{IoError, IoResult};
use lumen_core::{LuminanceMap, RgbMap, CHANNELS};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &str = "#?RADIANCE";
const FORMAT_RGBE: &str = "32-bit_rle_rgbe";

/// Writes a radiance map as a Radiance HDR file.
pub fn write_rgb<P: AsRef<Path>>(path: P, map: &RgbMap) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_header(&mut writer, map.width(), map.height())?;
    write_scanlines(&mut writer, map.width() as usize, map.height() as usize, map.data())
}

/// Writes a luminance map as a gray Radiance HDR file.
pub fn write_luminance<P: AsRef<Path>>(path: P, map: &LuminanceMap) -> IoResult<()> {
    let rgb: Vec<f32> = map.data().iter().flat_map(|&l| [l, l, l]).collect();
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_header(&mut writer, map.width(), map.height())?;
    write_scanlines(&mut writer, map.width() as usize, map.height() as usize, &rgb)
}

/// Reads a Radiance HDR file into an [`RgbMap`].
pub fn read_rgb<P: AsRef<Path>>(path: P) -> IoResult<RgbMap> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);

    let (width, height) = read_header(&mut reader)?;
    let mut data = Vec::with_capacity(width * height * CHANNELS);
    let mut scanline = vec![0u8; width * 4];
    for _ in 0..height {
        read_scanline(&mut reader, width, &mut scanline)?;
        for rgbe in scanline.chunks_exact(4) {
            let (r, g, b) = rgbe_to_f32(rgbe[0], rgbe[1], rgbe[2], rgbe[3]);
            data.extend_from_slice(&[r, g, b]);
        }
    }

    Ok(RgbMap::from_data(width as u32, height as u32, data)?)
}

fn write_header<W: Write>(writer: &mut W, width: u32, height: u32) -> IoResult<()> {
    writeln!(writer, "{}", MAGIC)?;
    writeln!(writer, "FORMAT={}", FORMAT_RGBE)?;
    writeln!(writer)?;
    writeln!(writer, "-Y {} +X {}", height, width)?;
    Ok(())
}

fn read_header<R: BufRead>(reader: &mut R) -> IoResult<(usize, usize)> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    if !line.starts_with("#?") {
        return Err(IoError::InvalidFile("missing Radiance magic".into()));
    }

    // Header variables until the blank line, then the resolution line.
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(IoError::InvalidFile("truncated HDR header".into()));
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        if trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = trimmed.split_once('=') {
            if key.trim() == "FORMAT" && value.trim() != FORMAT_RGBE {
                return Err(IoError::UnsupportedFormat(value.trim().to_string()));
            }
        }
    }

    line.clear();
    reader.read_line(&mut line)?;
    parse_resolution(line.trim())
        .ok_or_else(|| IoError::InvalidFile(format!("bad resolution line: {:?}", line.trim())))
}

/// Parses `-Y <h> +X <w>` (the only orientation we emit or accept).
fn parse_resolution(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    match (parts.next()?, parts.next()?, parts.next()?, parts.next()?) {
        ("-Y", h, "+X", w) => Some((w.parse().ok()?, h.parse().ok()?)),
        _ => None,
    }
}

fn write_scanlines<W: Write>(
    writer: &mut W,
    width: usize,
    height: usize,
    data: &[f32],
) -> IoResult<()> {
    // RLE scanlines need the width encodable in the two count bytes.
    let use_rle = (8..=0x7fff).contains(&width);

    let mut scanline = vec![0u8; width * 4];
    for y in 0..height {
        let row = &data[y * width * CHANNELS..(y + 1) * width * CHANNELS];
        for (x, px) in row.chunks_exact(CHANNELS).enumerate() {
            scanline[x * 4..x * 4 + 4].copy_from_slice(&f32_to_rgbe(px[0], px[1], px[2]));
        }

        if use_rle {
            writer.write_all(&[2, 2, (width >> 8) as u8, (width & 0xff) as u8])?;
            for c in 0..4 {
                let channel: Vec<u8> = (0..width).map(|x| scanline[x * 4 + c]).collect();
                write_rle_channel(writer, &channel)?;
            }
        } else {
            writer.write_all(&scanline)?;
        }
    }
    Ok(())
}

fn write_rle_channel<W: Write>(writer: &mut W, data: &[u8]) -> IoResult<()> {
    let mut i = 0usize;
    while i < data.len() {
        let mut run = 1usize;
        while i + run < data.len() && run < 127 && data[i] == data[i + run] {
            run += 1;
        }

        if run >= 4 {
            writer.write_all(&[(128 + run) as u8, data[i]])?;
            i += run;
            continue;
        }

        // Literal block: scan ahead until the next worthwhile run.
        let start = i;
        let mut literal = 0usize;
        while i < data.len() && literal < 128 {
            run = 1;
            while i + run < data.len() && run < 127 && data[i] == data[i + run] {
                run += 1;
            }
            if run >= 4 {
                break;
            }
            i += 1;
            literal += 1;
        }
        writer.write_all(&[literal as u8])?;
        writer.write_all(&data[start..start + literal])?;
    }
    Ok(())
}

fn read_scanline<R: Read>(reader: &mut R, width: usize, out: &mut [u8]) -> IoResult<()> {
    let mut header = [0u8; 4];
    reader.read_exact(&mut header)?;

    let is_rle = header[0] == 2
        && header[1] == 2
        && ((header[2] as usize) << 8 | header[3] as usize) == width
        && width >= 8;

    if !is_rle {
        out[..4].copy_from_slice(&header);
        reader.read_exact(&mut out[4..])?;
        return Ok(());
    }

    let mut channel = vec![0u8; width];
    for c in 0..4 {
        let mut idx = 0usize;
        while idx < width {
            let mut count = [0u8; 1];
            reader.read_exact(&mut count)?;
            let count = count[0] as usize;
            if count > 128 {
                let run = count - 128;
                if idx + run > width {
                    return Err(IoError::InvalidFile("RLE run overflows scanline".into()));
                }
                let mut value = [0u8; 1];
                reader.read_exact(&mut value)?;
                channel[idx..idx + run].fill(value[0]);
                idx += run;
            } else {
                if idx + count > width {
                    return Err(IoError::InvalidFile("RLE literal overflows scanline".into()));
                }
                reader.read_exact(&mut channel[idx..idx + count])?;
                idx += count;
            }
        }
        for x in 0..width {
            out[x * 4 + c] = channel[x];
        }
    }
    Ok(())
}

/// Packs a linear RGB triple into shared-exponent RGBE.
fn f32_to_rgbe(r: f32, g: f32, b: f32) -> [u8; 4] {
    let r = r.max(0.0);
    let g = g.max(0.0);
    let b = b.max(0.0);
    let max = r.max(g).max(b);
    if max < 1e-32 {
        return [0, 0, 0, 0];
    }

    let (mantissa, exponent) = frexp(max);
    let scale = mantissa * 256.0 / max;
    [
        (r * scale).clamp(0.0, 255.0) as u8,
        (g * scale).clamp(0.0, 255.0) as u8,
        (b * scale).clamp(0.0, 255.0) as u8,
        (exponent + 128) as u8,
    ]
}

fn rgbe_to_f32(r: u8, g: u8, b: u8, e: u8) -> (f32, f32, f32) {
    if e == 0 {
        return (0.0, 0.0, 0.0);
    }
    let f = 2.0_f32.powi(e as i32 - 136);
    (r as f32 * f, g as f32 * f, b as f32 * f)
}

fn frexp(x: f32) -> (f32, i32) {
    if x == 0.0 {
        return (0.0, 0);
    }
    let e = x.abs().log2().floor() as i32 + 1;
    (x / 2.0_f32.powi(e), e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rgbe_roundtrip_single_pixel() {
        for &v in &[0.001f32, 0.5, 1.0, 42.0, 9000.0] {
            let rgbe = f32_to_rgbe(v, v / 2.0, v / 4.0);
            let (r, g, b) = rgbe_to_f32(rgbe[0], rgbe[1], rgbe[2], rgbe[3]);
            assert_relative_eq!(r, v, max_relative = 0.01);
            assert_relative_eq!(g, v / 2.0, max_relative = 0.01);
            assert_relative_eq!(b, v / 4.0, max_relative = 0.02);
        }
    }

    #[test]
    fn zero_pixel_is_zero_rgbe() {
        assert_eq!(f32_to_rgbe(0.0, 0.0, 0.0), [0, 0, 0, 0]);
        assert_eq!(rgbe_to_f32(0, 0, 0, 0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn parse_resolution_line() {
        assert_eq!(parse_resolution("-Y 2 +X 3"), Some((3, 2)));
        assert_eq!(parse_resolution("+X 4 -Y 5"), None);
        assert_eq!(parse_resolution("-Y two +X 3"), None);
    }

    #[test]
    fn hdr_roundtrip_small_map() {
        // 4 pixels wide: exercises the flat (non-RLE) path.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.hdr");
        let data: Vec<f32> = (0..4 * 2 * 3).map(|i| i as f32 * 0.37 + 0.01).collect();
        let map = RgbMap::from_data(4, 2, data).unwrap();

        write_rgb(&path, &map).unwrap();
        let loaded = read_rgb(&path).unwrap();

        assert_eq!(loaded.dimensions(), (4, 2));
        for (&a, &b) in map.data().iter().zip(loaded.data()) {
            assert_relative_eq!(b, a, max_relative = 0.01, epsilon = 1e-4);
        }
    }

    #[test]
    fn hdr_roundtrip_rle_map() {
        // 16 pixels wide with long constant runs: exercises RLE.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map_rle.hdr");
        let mut data = vec![0.25f32; 16 * 4 * 3];
        data[100] = 123.0;
        let map = RgbMap::from_data(16, 4, data).unwrap();

        write_rgb(&path, &map).unwrap();
        let loaded = read_rgb(&path).unwrap();

        for (&a, &b) in map.data().iter().zip(loaded.data()) {
            assert_relative_eq!(b, a, max_relative = 0.01, epsilon = 1e-4);
        }
    }

    #[test]
    fn luminance_written_as_gray() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lum.hdr");
        let lum = LuminanceMap::from_data(8, 1, vec![0.5; 8]).unwrap();

        write_luminance(&path, &lum).unwrap();
        let loaded = read_rgb(&path).unwrap();

        for px in loaded.data().chunks_exact(3) {
            assert_relative_eq!(px[0], px[1], max_relative = 1e-6);
            assert_relative_eq!(px[1], px[2], max_relative = 1e-6);
            assert_relative_eq!(px[0], 0.5, max_relative = 0.01);
        }
    }
}
