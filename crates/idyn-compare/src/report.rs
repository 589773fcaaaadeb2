//! Analysis reporting: bundles computed curves into human-readable and
//! machine-readable form for the chart renderer.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::divergence::DivergenceCurve;
use crate::mse::{MethodMse, TrajectoryOverlay};
use crate::timing::TimingSummary;

/// Everything one analysis invocation produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Descriptive label (e.g. "parallel universes, 16 balls").
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divergence: Option<Vec<DivergenceCurve>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mse: Option<Vec<MethodMse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<TrajectoryOverlay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<Vec<TimingSummary>>,
}

impl AnalysisReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_divergence(mut self, curves: Vec<DivergenceCurve>) -> Self {
        self.divergence = Some(curves);
        self
    }

    pub fn with_mse(mut self, curves: Vec<MethodMse>) -> Self {
        self.mse = Some(curves);
        self
    }

    pub fn with_overlay(mut self, overlay: TrajectoryOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_timings(mut self, timings: Vec<TimingSummary>) -> Self {
        self.timings = Some(timings);
        self
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "============================================================");
        let _ = writeln!(out, "Analysis Report: {}", self.label);

        if let Some(curves) = &self.divergence {
            let _ = writeln!(out, "\nDivergence ({} curves):", curves.len());
            for curve in curves {
                let last = curve.points.last();
                let _ = writeln!(
                    out,
                    "  {} [{} vs {}]: {} points, max {}, final {}",
                    curve.label(),
                    curve.reference,
                    curve.candidate,
                    curve.points.len(),
                    fmt_opt(curve.max_value()),
                    fmt_opt(last.map(|p| p.value)),
                );
            }
        }

        if let Some(curves) = &self.mse {
            let _ = writeln!(out, "\nMean squared error:");
            for curve in curves {
                let _ = writeln!(out, "  {}:", curve.method);
                for point in &curve.points {
                    let _ = writeln!(out, "    dt={:<10} mse={:e}", point.delta_t, point.mse);
                }
            }
        }

        if let Some(overlay) = &self.overlay {
            let methods: Vec<&str> = overlay
                .trajectories
                .iter()
                .map(|t| t.method.as_str())
                .collect();
            let _ = writeln!(
                out,
                "\nTrajectory overlay at dt={}: {} samples, methods {}",
                overlay.delta_t,
                overlay.times.len(),
                methods.join(", ")
            );
        }

        if let Some(timings) = &self.timings {
            let _ = writeln!(out, "\nTimings ({} positions):", timings.len());
            for t in timings {
                let _ = writeln!(
                    out,
                    "  {:<8} {:.4} ± {:.4} (n={})",
                    t.position, t.mean, t.std_error, t.count
                );
            }
        }

        let _ = writeln!(out, "============================================================");
        out
    }

    /// Print the summary to stdout.
    pub fn print_summary(&self) {
        print!("{}", self.summary());
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::divergence::DivergencePoint;
    use crate::mse::MsePoint;

    fn sample_report() -> AnalysisReport {
        AnalysisReport::new("unit")
            .with_divergence(vec![DivergenceCurve {
                pair: 0,
                reference: 0.01,
                candidate: 0.001,
                points: vec![
                    DivergencePoint {
                        time: 0.0,
                        pair: 0,
                        value: 0.0,
                    },
                    DivergencePoint {
                        time: 0.01,
                        pair: 0,
                        value: 0.5,
                    },
                ],
            }])
            .with_mse(vec![MethodMse {
                method: "euler".into(),
                label: "Euler".into(),
                points: vec![MsePoint {
                    delta_t: 0.01,
                    mse: 0.25,
                }],
            }])
    }

    #[test]
    fn test_summary_mentions_sections() {
        let text = sample_report().summary();
        assert!(text.contains("Analysis Report: unit"));
        assert!(text.contains("k=2 [0.01 vs 0.001]: 2 points"));
        assert!(text.contains("euler:"));
        assert!(!text.contains("Timings"));
    }

    #[test]
    fn test_json_round_trip_skips_missing_sections() {
        let report = sample_report();
        let json = report.to_json();
        assert!(!json.contains("\"timings\""));
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
