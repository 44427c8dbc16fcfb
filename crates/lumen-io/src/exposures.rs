//! Exposure manifest parsing.
//!
//! An exposure stack on disk is a directory of frames plus a
//! `exposure_times.csv` manifest:
//!
//! ```text
//! filename;exposure
//! img_0001.png;1/125
//! img_0002.png;1/30
//! img_0003.png;0.5
//! ```
//!
//! The first line is a header and is skipped. Exposure times are seconds,
//! either decimal or fractional `num/den` shutter notation.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One manifest row: a frame file name and its exposure time in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureEntry {
    /// Frame file name, relative to the manifest's directory.
    pub file: String,
    /// Exposure time in seconds.
    pub seconds: f32,
}

/// Parses an exposure time: `"0.5"` or `"1/125"`.
///
/// # Errors
///
/// Returns [`IoError::Parse`] for non-numeric input or a zero denominator.
pub fn parse_exposure(s: &str) -> IoResult<f32> {
    let s = s.trim();
    if let Some((num, den)) = s.split_once('/') {
        let num: f32 = num
            .trim()
            .parse()
            .map_err(|_| IoError::Parse(format!("bad exposure numerator: {:?}", s)))?;
        let den: f32 = den
            .trim()
            .parse()
            .map_err(|_| IoError::Parse(format!("bad exposure denominator: {:?}", s)))?;
        if den == 0.0 {
            return Err(IoError::Parse(format!("zero denominator in exposure: {:?}", s)));
        }
        Ok(num / den)
    } else {
        s.parse()
            .map_err(|_| IoError::Parse(format!("bad exposure time: {:?}", s)))
    }
}

/// Reads an `exposure_times.csv` manifest.
///
/// # Errors
///
/// Returns [`IoError::Parse`] for rows without a `;` separator or with an
/// unparsable exposure, and [`IoError::InvalidFile`] when no data rows
/// remain after the header.
pub fn read_manifest<P: AsRef<Path>>(path: P) -> IoResult<Vec<ExposureEntry>> {
    let file = File::open(path.as_ref())?;
    parse_manifest(BufReader::new(file))
}

/// Parses manifest rows from any reader. See [`read_manifest`].
pub fn parse_manifest<R: BufRead>(reader: R) -> IoResult<Vec<ExposureEntry>> {
    let mut entries = Vec::new();

    for (lineno, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, exposure) = line.split_once(';').ok_or_else(|| {
            IoError::Parse(format!("manifest line {}: missing ';' separator", lineno + 1))
        })?;
        entries.push(ExposureEntry {
            file: name.trim().to_string(),
            seconds: parse_exposure(exposure)?,
        });
    }

    if entries.is_empty() {
        return Err(IoError::InvalidFile("manifest has no data rows".into()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_decimal_and_fractional_exposures() {
        assert_relative_eq!(parse_exposure("0.5").unwrap(), 0.5);
        assert_relative_eq!(parse_exposure("1/125").unwrap(), 1.0 / 125.0);
        assert_relative_eq!(parse_exposure(" 3/2 ").unwrap(), 1.5);
        assert_relative_eq!(parse_exposure("4").unwrap(), 4.0);
    }

    #[test]
    fn rejects_malformed_exposures() {
        assert!(parse_exposure("fast").is_err());
        assert!(parse_exposure("1/0").is_err());
        assert!(parse_exposure("1/x").is_err());
        assert!(parse_exposure("").is_err());
    }

    #[test]
    fn parses_manifest_skipping_header() {
        let csv = "filename;exposure\na.png;1/2\nb.png;2.0\n\n";
        let entries = parse_manifest(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file, "a.png");
        assert_relative_eq!(entries[0].seconds, 0.5);
        assert_eq!(entries[1].file, "b.png");
        assert_relative_eq!(entries[1].seconds, 2.0);
    }

    #[test]
    fn rejects_rows_without_separator() {
        let csv = "filename;exposure\na.png 0.5\n";
        assert!(matches!(parse_manifest(csv.as_bytes()), Err(IoError::Parse(_))));
    }

    #[test]
    fn rejects_empty_manifest() {
        let csv = "filename;exposure\n";
        assert!(matches!(
            parse_manifest(csv.as_bytes()),
            Err(IoError::InvalidFile(_))
        ));
    }
}
