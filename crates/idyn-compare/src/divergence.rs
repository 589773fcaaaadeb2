//! Positional divergence between runs that differ only in timestep.
//!
//! For each adjacent pair of timesteps `(P[i], P[i+1])` and every shared
//! timestamp, the divergence is the sum over bodies of the Euclidean distance
//! between the body's position in the two runs. The sum is not normalized by
//! the body count; curves for different body counts are not comparable.

use idyn_core::{AnalysisError, Result, Snapshot, TimeAlignedStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Divergence of one adjacent pair at one shared timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivergencePoint {
    pub time: f64,
    /// Index `i` of the compared pair `(P[i], P[i+1])`
    pub pair: usize,
    pub value: f64,
}

/// Divergence over time for one adjacent pair of timesteps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceCurve {
    pub pair: usize,
    /// `P[i]`
    pub reference: f64,
    /// `P[i+1]`
    pub candidate: f64,
    pub points: Vec<DivergencePoint>,
}

impl DivergenceCurve {
    /// Legend label, `k=2` for the first pair.
    pub fn label(&self) -> String {
        format!("k={}", self.pair + 2)
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Largest divergence along the curve.
    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }
}

/// Sum over bodies of `|candidate_j - reference_j|`.
pub fn snapshot_divergence(reference: &Snapshot, candidate: &Snapshot) -> Result<f64> {
    if reference.body_count() != candidate.body_count() {
        return Err(AnalysisError::LengthMismatch {
            what: format!("body count at t={}", reference.time),
            left: reference.body_count(),
            right: candidate.body_count(),
        });
    }
    Ok(reference
        .bodies
        .iter()
        .zip(&candidate.bodies)
        .map(|(r, c)| nalgebra::distance(c, r))
        .sum())
}

/// One curve per adjacent pair of `params`, in the caller's order.
///
/// `params` is used as given: it is neither sorted nor deduplicated.
pub fn divergence_curves(params: &[f64], store: &TimeAlignedStore) -> Result<Vec<DivergenceCurve>> {
    params
        .windows(2)
        .enumerate()
        .map(|(pair, window)| -> Result<DivergenceCurve> {
            let (reference, candidate) = (window[0], window[1]);
            let points = store
                .common_timestamps(reference, candidate)?
                .into_iter()
                .map(|time| -> Result<DivergencePoint> {
                    let value = snapshot_divergence(
                        store.lookup(reference, time)?,
                        store.lookup(candidate, time)?,
                    )?;
                    Ok(DivergencePoint { time, pair, value })
                })
                .collect::<Result<Vec<_>>>()?;
            debug!(pair, reference, candidate, points = points.len(), "divergence curve");
            Ok(DivergenceCurve {
                pair,
                reference,
                candidate,
                points,
            })
        })
        .collect()
}
