use crate::error::{SignalError, SignalResult};
use log::{debug, trace};
use ndarray::{Array1, Array2};
use std::fs;
use std::path::Path;

/// Minimum number of numeric fields a line needs to be kept
pub const MIN_FIELDS: usize = 9;

/// 0-based column indices of the three raw channels
pub const PCG_COLUMN: usize = 6;
pub const PPG_COLUMN: usize = 7;
pub const ECG_COLUMN: usize = 8;

/// Rectangular matrix of parsed rows, one row per input line
pub type RawMatrix = Array2<f64>;

/// Raw ADC codes of the three recorded channels
#[derive(Debug, Clone, PartialEq)]
pub struct RawChannels {
    pub amp1: Array1<f64>, // PCG
    pub amp2: Array1<f64>, // PPG
    pub amp3: Array1<f64>, // ECG
}

impl RawChannels {
    pub fn len(&self) -> usize {
        self.amp1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parse one line into a row of floats.
///
/// Returns `None` for blank lines, lines with fewer than `MIN_FIELDS`
/// tokens, and lines where any token is not a number.
fn parse_row(line: &str) -> Option<Vec<f64>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_FIELDS {
        return None;
    }

    tokens.iter().map(|t| t.parse::<f64>().ok()).collect()
}

/// Parse raw recorder text into a numeric matrix.
///
/// Malformed and short lines are skipped. Every kept row must have the same
/// width as the first kept row; wider or narrower rows are dropped too so the
/// result stays rectangular.
pub fn parse_rows(content: &str) -> SignalResult<RawMatrix> {
    let mut width = None;
    let mut values = Vec::new();
    let mut rows = 0;
    let mut skipped = 0;

    for (line_no, line) in content.lines().enumerate() {
        let Some(row) = parse_row(line) else {
            if !line.trim().is_empty() {
                trace!("Skipping line {}: not a numeric row", line_no + 1);
                skipped += 1;
            }
            continue;
        };

        let expected = *width.get_or_insert(row.len());
        if row.len() != expected {
            trace!(
                "Skipping line {}: {} fields, expected {}",
                line_no + 1,
                row.len(),
                expected
            );
            skipped += 1;
            continue;
        }

        values.extend(row);
        rows += 1;
    }

    let Some(width) = width else {
        return Err(SignalError::InputFormat {
            min_fields: MIN_FIELDS,
        });
    };

    debug!(
        "Parsed {} rows x {} columns ({} lines skipped)",
        rows, width, skipped
    );

    Array2::from_shape_vec((rows, width), values).map_err(|_| SignalError::InputFormat {
        min_fields: MIN_FIELDS,
    })
}

/// Read a recording from disk and parse it
pub fn read_txt_file(path: &Path) -> SignalResult<RawMatrix> {
    let content = fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_rows(&content)
}

/// Slice the PCG, PPG and ECG code columns out of the matrix
pub fn extract_channels(matrix: &RawMatrix) -> RawChannels {
    RawChannels {
        amp1: matrix.column(PCG_COLUMN).to_owned(),
        amp2: matrix.column(PPG_COLUMN).to_owned(),
        amp3: matrix.column(ECG_COLUMN).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_rows() {
        let text = "1 2 3 4 5 6 100 200 300\n\
                    1 2 3 4 5 6 100 200 300\n\
                    1\t2 3 4 5 6   100 200 300\n";
        let matrix = parse_rows(text).unwrap();
        assert_eq!(matrix.dim(), (3, 9));

        let channels = extract_channels(&matrix);
        assert_eq!(channels.amp1.to_vec(), vec![100.0; 3]);
        assert_eq!(channels.amp2.to_vec(), vec![200.0; 3]);
        assert_eq!(channels.amp3.to_vec(), vec![300.0; 3]);
        assert_eq!(channels.len(), 3);
    }

    #[test]
    fn test_skips_short_blank_and_malformed_lines() {
        let text = "\n\
                    header line with words only\n\
                    1 2 3 4 5 6 7 8\n\
                    1 2 3 4 5 6 7 8 x\n\
                    \t  \n\
                    0 0 0 0 0 0 -5 6.5 1e3\n";
        let matrix = parse_rows(text).unwrap();
        assert_eq!(matrix.dim(), (1, 9));

        let channels = extract_channels(&matrix);
        assert_eq!(channels.amp1[0], -5.0);
        assert_eq!(channels.amp2[0], 6.5);
        assert_eq!(channels.amp3[0], 1000.0);
    }

    #[test]
    fn test_wide_rows_are_kept() {
        let text = "1 2 3 4 5 6 7 8 9 10 11\n";
        let matrix = parse_rows(text).unwrap();
        assert_eq!(matrix.dim(), (1, 11));
    }

    #[test]
    fn test_rows_of_differing_width_are_dropped() {
        let text = "1 2 3 4 5 6 7 8 9\n1 2 3 4 5 6 7 8 9 10\n9 8 7 6 5 4 3 2 1\n";
        let matrix = parse_rows(text).unwrap();
        assert_eq!(matrix.dim(), (2, 9));
        assert_eq!(matrix[[1, 0]], 9.0);
    }

    #[test]
    fn test_empty_input_is_format_error() {
        assert!(matches!(
            parse_rows(""),
            Err(SignalError::InputFormat { min_fields: 9 })
        ));
        assert!(matches!(
            parse_rows("a b c\n1 2 3\n"),
            Err(SignalError::InputFormat { .. })
        ));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let result = read_txt_file(Path::new("/definitely/not/here.txt"));
        assert!(matches!(result, Err(SignalError::Io(_))));
    }
}
