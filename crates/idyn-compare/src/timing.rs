//! Summary statistics for repeated timing measurements.

use idyn_core::{SortOrder, TimingSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Mean and standard error of the runs at one position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingSummary {
    pub position: f64,
    pub mean: f64,
    /// Population standard deviation over `sqrt(count)`
    pub std_error: f64,
    pub count: usize,
}

/// `(mean, std_error)` of `samples`, `None` when empty.
pub fn mean_and_std_error(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt() / n.sqrt()))
}

/// One summary per position, sorted in `order`.
pub fn summarize_timings(set: &TimingSet, order: SortOrder) -> Vec<TimingSummary> {
    set.entries(order)
        .into_iter()
        .filter_map(|(position, samples)| {
            let Some((mean, std_error)) = mean_and_std_error(samples) else {
                warn!(position, "no timing samples, skipping position");
                return None;
            };
            Some(TimingSummary {
                position,
                mean,
                std_error,
                count: samples.len(),
            })
        })
        .collect()
}
