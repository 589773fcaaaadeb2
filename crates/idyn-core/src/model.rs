//! Data model for parsed simulation output.
//!
//! Everything here is built once from file contents and never mutated.

use std::cmp::Ordering;
use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::analytic::DampedOscillator;
use crate::error::{AnalysisError, FormatError, FormatErrorKind, Result};

/// Position of one body in the plane.
pub type BodyPosition = Point2<f64>;

/// Controlling parameter of a run (timestep size, initial offset, ...).
///
/// Wraps an `f64` with a total order so it can key ordered maps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamKey(pub f64);

impl ParamKey {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for ParamKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamKey {}

impl PartialOrd for ParamKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for ParamKey {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction used whenever results are ordered by a controlling parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Sort `keys` in place in this direction.
    pub fn sort<T: Ord>(self, keys: &mut [T]) {
        match self {
            SortOrder::Ascending => keys.sort(),
            SortOrder::Descending => keys.sort_by(|a, b| b.cmp(a)),
        }
    }
}

/// Positions of every body at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: f64,
    /// Indexed by body identity
    pub bodies: Vec<BodyPosition>,
}

impl Snapshot {
    pub fn new(time: f64, bodies: Vec<BodyPosition>) -> Self {
        Self { time, bodies }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// One parsed positional dump: snapshots strictly ascending by time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationRun {
    snapshots: Vec<Snapshot>,
}

impl SimulationRun {
    /// Wrap already-ordered snapshots.
    ///
    /// The parser guarantees ordering; hand-built runs are checked here.
    /// Timestamps must be finite and strictly ascending.
    pub fn new(snapshots: Vec<Snapshot>) -> Result<Self> {
        if let Some(bad) = snapshots.iter().find(|s| !s.time.is_finite()) {
            let kind = FormatErrorKind::InvalidNumber {
                token: bad.time.to_string(),
            };
            return Err(FormatError::new("<in-memory run>", 0, kind).into());
        }
        let unordered = snapshots
            .windows(2)
            .find(|w| w[0].time.partial_cmp(&w[1].time) != Some(Ordering::Less));
        if let Some(pair) = unordered {
            let kind = FormatErrorKind::NonMonotonic {
                previous: pair[0].time,
                found: pair[1].time,
            };
            return Err(FormatError::new("<in-memory run>", 0, kind).into());
        }
        Ok(Self { snapshots })
    }

    pub(crate) fn from_sorted(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Ascending timestamps of the run.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.snapshots.iter().map(|s| s.time)
    }

    /// Exact-match lookup by timestamp.
    pub fn at(&self, time: f64) -> Option<&Snapshot> {
        self.snapshots
            .binary_search_by(|s| s.time.total_cmp(&time))
            .ok()
            .map(|idx| &self.snapshots[idx])
    }
}

/// Which of the two on-disk series layouts a file used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnLayout {
    /// time, numeric, analytic
    ThreeColumn,
    /// time, numeric, analytic, error
    FourColumn,
}

impl ColumnLayout {
    pub fn columns(self) -> usize {
        match self {
            ColumnLayout::ThreeColumn => 3,
            ColumnLayout::FourColumn => 4,
        }
    }

    pub fn from_columns(columns: usize) -> Option<Self> {
        match columns {
            3 => Some(ColumnLayout::ThreeColumn),
            4 => Some(ColumnLayout::FourColumn),
            _ => None,
        }
    }
}

/// Numeric vs. analytic samples of one method (and timestep).
///
/// All columns have equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodErrorSeries {
    times: Vec<f64>,
    numeric: Vec<f64>,
    analytic: Vec<f64>,
    error: Option<Vec<f64>>,
}

impl MethodErrorSeries {
    /// Build a series from parallel columns, checking their lengths.
    pub fn new(
        times: Vec<f64>,
        numeric: Vec<f64>,
        analytic: Vec<f64>,
        error: Option<Vec<f64>>,
    ) -> Result<Self> {
        check_len("numeric column", times.len(), numeric.len())?;
        check_len("analytic column", times.len(), analytic.len())?;
        if let Some(error) = &error {
            check_len("error column", times.len(), error.len())?;
        }
        Ok(Self {
            times,
            numeric,
            analytic,
            error,
        })
    }

    pub(crate) fn from_parsed(
        times: Vec<f64>,
        numeric: Vec<f64>,
        analytic: Vec<f64>,
        error: Option<Vec<f64>>,
    ) -> Self {
        Self {
            times,
            numeric,
            analytic,
            error,
        }
    }

    /// Pair a numeric trajectory with the oscillator's closed-form solution.
    pub fn from_numeric(
        times: Vec<f64>,
        numeric: Vec<f64>,
        oscillator: &DampedOscillator,
    ) -> Result<Self> {
        let analytic = times.iter().map(|&t| oscillator.position(t)).collect();
        Self::new(times, numeric, analytic, None)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn numeric(&self) -> &[f64] {
        &self.numeric
    }

    pub fn analytic(&self) -> &[f64] {
        &self.analytic
    }

    /// The error column exactly as read from disk, if the file had one.
    pub fn error(&self) -> Option<&[f64]> {
        self.error.as_deref()
    }

    pub fn layout(&self) -> ColumnLayout {
        if self.error.is_some() {
            ColumnLayout::FourColumn
        } else {
            ColumnLayout::ThreeColumn
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

fn check_len(what: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(AnalysisError::LengthMismatch {
            what: what.to_string(),
            left: expected,
            right: found,
        });
    }
    Ok(())
}
