//! Analysis configuration.
//!
//! The lists of timesteps and methods, the body count and the data locations
//! are plain values handed to the pipeline's entry points. A TOML file may
//! override any subset of them; missing fields fall back to the defaults the
//! experiments were run with.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::analytic::DampedOscillator;
use crate::method::Method;
use crate::model::SortOrder;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

fn default_timesteps() -> Vec<f64> {
    vec![0.01, 0.001, 0.0001, 0.00001, 0.000001]
}

/// Parallel-universes experiment: one billiards run per timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceConfig {
    #[serde(default = "DivergenceConfig::default_data_dir")]
    pub data_dir: PathBuf,
    /// Compared pairwise in this order (coarsest to finest by default)
    #[serde(default = "default_timesteps")]
    pub delta_ts: Vec<f64>,
    #[serde(default = "DivergenceConfig::default_ball_count")]
    pub ball_count: usize,
    #[serde(default = "DivergenceConfig::default_output_delta_t")]
    pub output_delta_t: f64,
    #[serde(default = "DivergenceConfig::default_max_time")]
    pub max_time: f64,
    #[serde(default = "DivergenceConfig::default_method")]
    pub method: Method,
}

impl DivergenceConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("./analysis/billiards/parallel_universes/data/")
    }
    fn default_ball_count() -> usize {
        16
    }
    fn default_output_delta_t() -> f64 {
        0.01
    }
    fn default_max_time() -> f64 {
        100.0
    }
    fn default_method() -> Method {
        Method::GearPredictorCorrector
    }
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            delta_ts: default_timesteps(),
            ball_count: Self::default_ball_count(),
            output_delta_t: Self::default_output_delta_t(),
            max_time: Self::default_max_time(),
            method: Self::default_method(),
        }
    }
}

/// Oscillator method comparison: one series per method and timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorConfig {
    #[serde(default = "ErrorConfig::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "ErrorConfig::default_methods")]
    pub methods: Vec<Method>,
    #[serde(default = "default_timesteps")]
    pub delta_ts: Vec<f64>,
    /// Order of the timestep axis in MSE curves
    #[serde(default)]
    pub order: SortOrder,
    /// Timestep whose trajectories are overlaid against the analytic curve
    #[serde(default = "ErrorConfig::default_overlay_delta_t")]
    pub overlay_delta_t: f64,
    #[serde(default = "ErrorConfig::default_overlay_methods")]
    pub overlay_methods: Vec<Method>,
    #[serde(default)]
    pub oscillator: DampedOscillator,
}

impl ErrorConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("./analysis/oscillator/data/methods/")
    }
    fn default_methods() -> Vec<Method> {
        Method::iter().collect()
    }
    fn default_overlay_delta_t() -> f64 {
        0.0001
    }
    fn default_overlay_methods() -> Vec<Method> {
        vec![
            Method::GearPredictorCorrector,
            Method::Verlet,
            Method::Beeman,
        ]
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            methods: Self::default_methods(),
            delta_ts: default_timesteps(),
            order: SortOrder::default(),
            overlay_delta_t: Self::default_overlay_delta_t(),
            overlay_methods: Self::default_overlay_methods(),
            oscillator: DampedOscillator::default(),
        }
    }
}

/// Lucky-shot experiment: total simulated time vs. white ball position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "TimingConfig::default_y_min")]
    pub y_min: f64,
    #[serde(default = "TimingConfig::default_y_max")]
    pub y_max: f64,
    #[serde(default = "TimingConfig::default_y_step")]
    pub y_step: f64,
    #[serde(default = "TimingConfig::default_runs_per_position")]
    pub runs_per_position: usize,
    #[serde(default = "TimingConfig::default_balls_to_wait_for")]
    pub balls_to_wait_for: usize,
    #[serde(default = "TimingConfig::default_delta_t")]
    pub delta_t: f64,
    #[serde(default = "TimingConfig::default_output_delta_t")]
    pub output_delta_t: f64,
    /// Integrator the benchmark runs use
    #[serde(default = "TimingConfig::default_method")]
    pub method: Method,
    /// Order of the position axis
    #[serde(default)]
    pub order: SortOrder,
}

impl TimingConfig {
    fn default_data_dir() -> PathBuf {
        PathBuf::from("./analysis/billiards/lucky_shot/data/")
    }
    fn default_y_min() -> f64 {
        0.42
    }
    fn default_y_max() -> f64 {
        0.56
    }
    fn default_y_step() -> f64 {
        0.007
    }
    fn default_runs_per_position() -> usize {
        100
    }
    fn default_balls_to_wait_for() -> usize {
        8
    }
    fn default_delta_t() -> f64 {
        0.0001
    }
    fn default_output_delta_t() -> f64 {
        0.01
    }
    fn default_method() -> Method {
        Method::GearPredictorCorrector
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            y_min: Self::default_y_min(),
            y_max: Self::default_y_max(),
            y_step: Self::default_y_step(),
            runs_per_position: Self::default_runs_per_position(),
            balls_to_wait_for: Self::default_balls_to_wait_for(),
            delta_t: Self::default_delta_t(),
            output_delta_t: Self::default_output_delta_t(),
            method: Self::default_method(),
            order: SortOrder::default(),
        }
    }
}

/// Locations of the simulator executables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "SimulatorConfig::default_billiards")]
    pub billiards: PathBuf,
    #[serde(default = "SimulatorConfig::default_oscillator")]
    pub oscillator: PathBuf,
}

impl SimulatorConfig {
    fn default_billiards() -> PathBuf {
        PathBuf::from("./target/release/billiards")
    }
    fn default_oscillator() -> PathBuf {
        PathBuf::from("./target/release/oscillator")
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            billiards: Self::default_billiards(),
            oscillator: Self::default_oscillator(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub divergence: DivergenceConfig,
    #[serde(default)]
    pub errors: ErrorConfig,
    #[serde(default)]
    pub timings: TimingConfig,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl AnalysisConfig {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path`, or the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = AnalysisConfig::from_toml_str("", Path::new("idyn.toml")).unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
        assert_eq!(cfg.divergence.ball_count, 16);
        assert_eq!(cfg.errors.methods.len(), 8);
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
            [divergence]
            ball_count = 2
            delta_ts = [0.01, 0.001]

            [errors]
            methods = ["euler", "beeman"]
            order = "descending"
        "#;
        let cfg = AnalysisConfig::from_toml_str(text, Path::new("idyn.toml")).unwrap();
        assert_eq!(cfg.divergence.ball_count, 2);
        assert_eq!(cfg.divergence.delta_ts, vec![0.01, 0.001]);
        assert_eq!(cfg.divergence.output_delta_t, 0.01);
        assert_eq!(cfg.errors.methods, vec![Method::Euler, Method::Beeman]);
        assert_eq!(cfg.errors.order, SortOrder::Descending);
        assert_eq!(cfg.timings, TimingConfig::default());
    }

    #[test]
    fn test_timings_method_and_order() {
        let text = r#"
            [divergence]
            method = "euler"

            [timings]
            method = "velocity-verlet"
            order = "descending"
        "#;
        let cfg = AnalysisConfig::from_toml_str(text, Path::new("idyn.toml")).unwrap();
        assert_eq!(cfg.divergence.method, Method::Euler);
        assert_eq!(cfg.timings.method, Method::VelocityVerlet);
        assert_eq!(cfg.timings.order, SortOrder::Descending);
        assert_eq!(cfg.timings.runs_per_position, 100);
    }

    #[test]
    fn test_unknown_method_is_a_parse_error() {
        let text = "[errors]\nmethods = [\"rk4\"]\n";
        let err = AnalysisConfig::from_toml_str(text, Path::new("idyn.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let cfg = AnalysisConfig::default();
        let text = cfg.to_toml().unwrap();
        let back = AnalysisConfig::from_toml_str(&text, Path::new("idyn.toml")).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = AnalysisConfig::load_or_default(Path::new("/nonexistent/idyn.toml")).unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }
}
