//! Writers producing the same layouts the parsers read.
//!
//! Floats use Rust's shortest round-trip formatting, so parsing the output
//! reproduces every value bit for bit.

use std::fmt::Write;

use crate::model::{MethodErrorSeries, SimulationRun};

/// Render a run in the positional dump layout.
pub fn write_positional(run: &SimulationRun) -> String {
    let mut out = String::new();
    for snapshot in run.snapshots() {
        let _ = writeln!(out, "{}", snapshot.time);
        for body in &snapshot.bodies {
            let _ = writeln!(out, "{} {}", body.x, body.y);
        }
    }
    out
}

/// Render a series in its own layout (three or four columns).
pub fn write_series(series: &MethodErrorSeries) -> String {
    let mut out = String::new();
    for i in 0..series.len() {
        let _ = write!(
            out,
            "{} {} {}",
            series.times()[i],
            series.numeric()[i],
            series.analytic()[i]
        );
        if let Some(error) = series.error() {
            let _ = write!(out, " {}", error[i]);
        }
        out.push('\n');
    }
    out
}
