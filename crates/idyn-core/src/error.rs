//! Error taxonomy for the analysis pipeline.
//!
//! Every failure carries enough context (file, line, expected vs. found shape)
//! for the caller to abort with a message that points at the offending input.
//! Nothing in the pipeline skips or repairs malformed records.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the core crate.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

/// Top-level analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("runs {a} and {b} share no timestamps")]
    Alignment { a: String, b: String },

    #[error("{what}: length mismatch ({left} vs {right})")]
    LengthMismatch {
        what: String,
        left: usize,
        right: usize,
    },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("no usable data files found in '{}'", path.display())]
    EmptyDataset { path: PathBuf },

    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A malformed line or token in a dump file.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{source_name}:{line}: {kind}")]
pub struct FormatError {
    /// File name (or other label) of the parsed input
    pub source_name: String,
    /// 1-based line number, 0 when the problem is the file name itself
    pub line: usize,
    pub kind: FormatErrorKind,
}

impl FormatError {
    pub fn new(source_name: impl Into<String>, line: usize, kind: FormatErrorKind) -> Self {
        Self {
            source_name: source_name.into(),
            line,
            kind,
        }
    }
}

/// What exactly was wrong with the line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatErrorKind {
    #[error("expected {expected} tokens, found {found}")]
    TokenCount {
        expected: &'static str,
        found: usize,
    },

    #[error("position line before any timestamp header")]
    PositionBeforeHeader,

    #[error("block at t={timestamp} has {found} position lines, expected {expected}")]
    BodyCount {
        timestamp: f64,
        expected: usize,
        found: usize,
    },

    #[error("invalid floating-point token '{token}'")]
    InvalidNumber { token: String },

    #[error("timestamp {found} does not follow {previous}")]
    NonMonotonic { previous: f64, found: f64 },

    #[error("expected {expected} columns like the first row, found {found}")]
    ColumnMismatch { expected: usize, found: usize },

    #[error("file stem '{stem}' is not a floating-point parameter")]
    InvalidParam { stem: String },

    #[error("parameter {param} already loaded from '{first}'")]
    DuplicateParam { param: f64, first: String },
}

/// Reference to something the stores do not hold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("unknown parameter value {0}")]
    UnknownParam(f64),

    #[error("run {param} has no snapshot at t={timestamp}")]
    UnknownTimestamp { param: f64, timestamp: f64 },

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("method '{method}' has no series for delta_t={delta_t}")]
    UnknownSeries { method: String, delta_t: f64 },
}
