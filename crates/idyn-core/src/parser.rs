//! Line-oriented parsers for simulator dump files.
//!
//! Three layouts are understood:
//!
//! * positional dumps: a timestamp header line followed by one `x y` line per
//!   body, repeated for every sampled instant;
//! * error series: `time numeric analytic [error]` rows, three or four
//!   columns, detected from the first row;
//! * timing lists: one elapsed-time measurement per line.
//!
//! Parsers never return partial results: the first malformed line aborts the
//! whole file with a [`FormatError`] naming the source and line.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{AnalysisError, FormatError, FormatErrorKind, Result};
use crate::model::{
    BodyPosition, ColumnLayout, MethodErrorSeries, ParamKey, SimulationRun, Snapshot,
};

/// A block being accumulated: header timestamp, its line, bodies so far.
struct OpenBlock {
    time: f64,
    line: usize,
    bodies: Vec<BodyPosition>,
}

impl OpenBlock {
    fn close(self, source: &str, ball_count: usize) -> Result<Snapshot, FormatError> {
        if self.bodies.len() != ball_count {
            return Err(FormatError::new(
                source,
                self.line,
                FormatErrorKind::BodyCount {
                    timestamp: self.time,
                    expected: ball_count,
                    found: self.bodies.len(),
                },
            ));
        }
        Ok(Snapshot::new(self.time, self.bodies))
    }
}

/// Parse a positional dump with `ball_count` bodies per block.
pub fn parse_positional(
    text: &str,
    source: &str,
    ball_count: usize,
) -> Result<SimulationRun, FormatError> {
    let mut snapshots: Vec<Snapshot> = Vec::new();
    let mut block: Option<OpenBlock> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [header] => {
                let time = parse_float(header, source, line_no)?;
                if !time.is_finite() {
                    return Err(FormatError::new(
                        source,
                        line_no,
                        FormatErrorKind::InvalidNumber {
                            token: header.to_string(),
                        },
                    ));
                }
                if let Some(open) = block.take() {
                    snapshots.push(open.close(source, ball_count)?);
                }
                if let Some(previous) = snapshots.last().map(|s| s.time) {
                    if previous.partial_cmp(&time) != Some(Ordering::Less) {
                        return Err(FormatError::new(
                            source,
                            line_no,
                            FormatErrorKind::NonMonotonic {
                                previous,
                                found: time,
                            },
                        ));
                    }
                }
                block = Some(OpenBlock {
                    time,
                    line: line_no,
                    bodies: Vec::with_capacity(ball_count),
                });
            }
            [x, y] => {
                let open = block.as_mut().ok_or_else(|| {
                    FormatError::new(source, line_no, FormatErrorKind::PositionBeforeHeader)
                })?;
                if open.bodies.len() == ball_count {
                    return Err(FormatError::new(
                        source,
                        line_no,
                        FormatErrorKind::BodyCount {
                            timestamp: open.time,
                            expected: ball_count,
                            found: ball_count + 1,
                        },
                    ));
                }
                let x = parse_float(x, source, line_no)?;
                let y = parse_float(y, source, line_no)?;
                open.bodies.push(BodyPosition::new(x, y));
            }
            other => {
                return Err(FormatError::new(
                    source,
                    line_no,
                    FormatErrorKind::TokenCount {
                        expected: "1 or 2",
                        found: other.len(),
                    },
                ));
            }
        }
    }

    if let Some(open) = block {
        snapshots.push(open.close(source, ball_count)?);
    }

    Ok(SimulationRun::from_sorted(snapshots))
}

/// Parse a three- or four-column error series.
pub fn parse_series(text: &str, source: &str) -> Result<MethodErrorSeries, FormatError> {
    let mut layout: Option<ColumnLayout> = None;
    let mut times = Vec::new();
    let mut numeric = Vec::new();
    let mut analytic = Vec::new();
    let mut error = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let row_layout = match layout {
            Some(expected) if tokens.len() != expected.columns() => {
                return Err(FormatError::new(
                    source,
                    line_no,
                    FormatErrorKind::ColumnMismatch {
                        expected: expected.columns(),
                        found: tokens.len(),
                    },
                ));
            }
            Some(expected) => expected,
            None => {
                let detected = ColumnLayout::from_columns(tokens.len()).ok_or_else(|| {
                    FormatError::new(
                        source,
                        line_no,
                        FormatErrorKind::TokenCount {
                            expected: "3 or 4",
                            found: tokens.len(),
                        },
                    )
                })?;
                layout = Some(detected);
                detected
            }
        };

        times.push(parse_float(tokens[0], source, line_no)?);
        numeric.push(parse_float(tokens[1], source, line_no)?);
        analytic.push(parse_float(tokens[2], source, line_no)?);
        if row_layout == ColumnLayout::FourColumn {
            error.push(parse_float(tokens[3], source, line_no)?);
        }
    }

    let error = (layout == Some(ColumnLayout::FourColumn)).then_some(error);
    // Columns were filled row by row, so lengths always agree.
    Ok(MethodErrorSeries::from_parsed(times, numeric, analytic, error))
}

/// Parse a list of timing measurements, one per non-empty line.
pub fn parse_timings(text: &str, source: &str) -> Result<Vec<f64>, FormatError> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            [value] => samples.push(parse_float(value, source, line_no)?),
            other => {
                return Err(FormatError::new(
                    source,
                    line_no,
                    FormatErrorKind::TokenCount {
                        expected: "1",
                        found: other.len(),
                    },
                ));
            }
        }
    }
    Ok(samples)
}

fn parse_float(token: &str, source: &str, line: usize) -> Result<f64, FormatError> {
    token.parse::<f64>().map_err(|_| {
        FormatError::new(
            source,
            line,
            FormatErrorKind::InvalidNumber {
                token: token.to_string(),
            },
        )
    })
}

/// Controlling parameter encoded in a file name (`0.001.txt` -> 0.001).
pub fn param_from_path(path: &Path) -> Result<ParamKey, FormatError> {
    let stem = file_stem(path);
    stem.parse::<f64>().map(ParamKey).map_err(|_| {
        FormatError::new(
            source_name(path),
            0,
            FormatErrorKind::InvalidParam {
                stem: stem.to_string(),
            },
        )
    })
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn source_name(path: &Path) -> String {
    path.display().to_string()
}

fn read_file(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading dump file");
    fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))
}

/// Read and parse a positional dump from disk.
pub fn parse_positional_file(path: &Path, ball_count: usize) -> Result<SimulationRun> {
    let text = read_file(path)?;
    Ok(parse_positional(&text, &source_name(path), ball_count)?)
}

/// Read and parse an error series from disk.
pub fn parse_series_file(path: &Path) -> Result<MethodErrorSeries> {
    let text = read_file(path)?;
    Ok(parse_series(&text, &source_name(path))?)
}

/// Read and parse a timing list from disk.
pub fn parse_timings_file(path: &Path) -> Result<Vec<f64>> {
    let text = read_file(path)?;
    Ok(parse_timings(&text, &source_name(path))?)
}
