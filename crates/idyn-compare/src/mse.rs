//! Integration error of numeric trajectories against the analytic solution.
//!
//! The scalar summary is always the mean of `(numeric - analytic)^2`. The
//! per-sample curve prefers an error column shipped with the data: when a
//! file carries one it is returned verbatim.

use std::borrow::Cow;
use std::path::PathBuf;

use idyn_core::{AnalysisError, Method, MethodErrorSeries, Result, SeriesStore, SortOrder};
use serde::{Deserialize, Serialize};

/// Chart legend for `method`: the catalogue label, or the name itself for
/// methods outside the catalogue.
pub fn legend_label(method: &str) -> String {
    method
        .parse::<Method>()
        .map_or_else(|_| method.to_string(), |m| m.label().to_string())
}

/// Mean of `(numeric - analytic)^2`, `None` for an empty series.
pub fn mean_squared_error(series: &MethodErrorSeries) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let sum: f64 = series
        .numeric()
        .iter()
        .zip(series.analytic())
        .map(|(n, a)| (n - a).powi(2))
        .sum();
    Some(sum / series.len() as f64)
}

/// Per-sample error: the file's error column if present, else `(n - a)^2`.
pub fn error_curve(series: &MethodErrorSeries) -> Cow<'_, [f64]> {
    match series.error() {
        Some(error) => Cow::Borrowed(error),
        None => Cow::Owned(
            series
                .numeric()
                .iter()
                .zip(series.analytic())
                .map(|(n, a)| (n - a).powi(2))
                .collect(),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MsePoint {
    pub delta_t: f64,
    pub mse: f64,
}

/// MSE as a function of timestep for one method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodMse {
    pub method: String,
    pub label: String,
    pub points: Vec<MsePoint>,
}

impl MethodMse {
    pub fn delta_ts(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.delta_t).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.mse).collect()
    }
}

/// MSE per timestep for each of `methods`, timesteps sorted in `order`.
///
/// A series with no samples has no MSE and aborts the reduction.
pub fn mse_by_method(
    store: &SeriesStore,
    methods: &[&str],
    order: SortOrder,
) -> Result<Vec<MethodMse>> {
    methods
        .iter()
        .map(|&method| -> Result<MethodMse> {
            let points = store
                .delta_ts(method, order)?
                .into_iter()
                .map(|delta_t| -> Result<MsePoint> {
                    let series = store.get(method, Some(delta_t))?;
                    let mse = mean_squared_error(series).ok_or_else(|| {
                        AnalysisError::EmptyDataset {
                            path: PathBuf::from(method).join(format!("{delta_t}.txt")),
                        }
                    })?;
                    Ok(MsePoint { delta_t, mse })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(MethodMse {
                method: method.to_string(),
                label: legend_label(method),
                points,
            })
        })
        .collect()
}

/// Numeric trajectory of one method in an overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodTrajectory {
    pub method: String,
    pub label: String,
    pub numeric: Vec<f64>,
}

/// Several methods at one timestep, plotted against the analytic curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryOverlay {
    pub delta_t: f64,
    pub times: Vec<f64>,
    pub analytic: Vec<f64>,
    pub trajectories: Vec<MethodTrajectory>,
}

/// Collect `methods` at `delta_t` on a shared time axis.
///
/// Times and analytic values come from the first method; every other method
/// must have been sampled on the identical axis.
pub fn trajectory_overlay(
    store: &SeriesStore,
    delta_t: f64,
    methods: &[&str],
) -> Result<TrajectoryOverlay> {
    let mut overlay = TrajectoryOverlay {
        delta_t,
        times: Vec::new(),
        analytic: Vec::new(),
        trajectories: Vec::with_capacity(methods.len()),
    };

    for (idx, &method) in methods.iter().enumerate() {
        let series = store.get(method, Some(delta_t))?;
        if idx == 0 {
            overlay.times = series.times().to_vec();
            overlay.analytic = series.analytic().to_vec();
        } else if series.times() != overlay.times.as_slice() {
            return Err(AnalysisError::Alignment {
                a: format!("{}@{delta_t}", methods[0]),
                b: format!("{method}@{delta_t}"),
            });
        }
        overlay.trajectories.push(MethodTrajectory {
            method: method.to_string(),
            label: legend_label(method),
            numeric: series.numeric().to_vec(),
        });
    }

    Ok(overlay)
}
