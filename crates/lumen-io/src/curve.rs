//! Response curve file parsing.
//!
//! Calibration tools dump the recovered response curve as a MATLAB-style
//! matrix, one row per 8-bit code value, three whitespace-separated
//! log-exposure values per row in R G B order:
//!
//! ```text
//! curve = [
//! -4.312 -4.102 -3.998
//! -4.279 -4.071 -3.961
//! ...
//! ]
//! ```
//!
//! The opening line is skipped and a line starting with `]` terminates the
//! matrix. The parsed table must hold exactly 256 rows.

use crate::{IoError, IoResult};
use lumen_core::ResponseCurve;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a response curve file.
pub fn read_curve<P: AsRef<Path>>(path: P) -> IoResult<ResponseCurve> {
    let file = File::open(path.as_ref())?;
    parse_curve(BufReader::new(file))
}

/// Parses a curve matrix from any reader. See the module docs for the
/// format.
///
/// # Errors
///
/// Returns [`IoError::Parse`] for rows that are not three floats, and
/// [`IoError::Core`] when the finished table fails validation (wrong row
/// count, non-finite entries).
pub fn parse_curve<R: BufRead>(reader: R) -> IoResult<ResponseCurve> {
    let mut rows = Vec::with_capacity(lumen_core::CURVE_SIZE);

    for (lineno, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line = line.trim();
        if line.starts_with(']') {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let mut values = line.split_whitespace().map(|v| v.parse::<f32>());
        let mut row = [0.0f32; 3];
        for channel in row.iter_mut() {
            *channel = values
                .next()
                .and_then(Result::ok)
                .ok_or_else(|| {
                    IoError::Parse(format!("curve line {}: expected three floats", lineno + 1))
                })?;
        }
        if values.next().is_some() {
            return Err(IoError::Parse(format!(
                "curve line {}: trailing values",
                lineno + 1
            )));
        }
        rows.push(row);
    }

    Ok(ResponseCurve::from_rows(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix(rows: usize) -> String {
        let mut s = String::from("curve = [\n");
        for z in 0..rows {
            s.push_str(&format!("{0}.5 {0}.25 {0}.125\n", z % 10));
        }
        s.push_str("]\n");
        s
    }

    #[test]
    fn parses_full_table() {
        let curve = parse_curve(matrix(256).as_bytes()).unwrap();
        assert_relative_eq!(curve.log_exposure(0, 0), 0.5);
        assert_relative_eq!(curve.log_exposure(0, 1), 0.25);
        assert_relative_eq!(curve.log_exposure(0, 2), 0.125);
        assert_relative_eq!(curve.log_exposure(11, 0), 1.5);
    }

    #[test]
    fn rejects_short_table() {
        assert!(parse_curve(matrix(200).as_bytes()).is_err());
    }

    #[test]
    fn rejects_malformed_rows() {
        let src = "curve = [\n1.0 2.0\n]\n";
        assert!(matches!(parse_curve(src.as_bytes()), Err(IoError::Parse(_))));
        let src = "curve = [\n1.0 2.0 3.0 4.0\n]\n";
        assert!(matches!(parse_curve(src.as_bytes()), Err(IoError::Parse(_))));
        let src = "curve = [\n1.0 two 3.0\n]\n";
        assert!(matches!(parse_curve(src.as_bytes()), Err(IoError::Parse(_))));
    }
}
