//! idyn-core: parsing and storage for integration-dynamics analysis
//!
//! Turns the simulator's line-oriented dumps into typed runs, indexes them by
//! their controlling parameter (timestep, method, initial offset) and exposes
//! aligned lookups across runs. Statistics live in `idyn-compare`.

pub mod analytic;
pub mod config;
pub mod error;
pub mod method;
pub mod model;
pub mod parser;
pub mod store;
pub mod writer;

pub use analytic::DampedOscillator;
pub use config::{AnalysisConfig, ConfigError};
pub use error::{AnalysisError, FormatError, FormatErrorKind, LookupError, Result};
pub use method::Method;
pub use model::{
    BodyPosition, ColumnLayout, MethodErrorSeries, ParamKey, SimulationRun, Snapshot, SortOrder,
};
pub use store::{SeriesStore, TimeAlignedStore, TimingSet};
