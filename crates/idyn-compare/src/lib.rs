//! Statistics over parsed simulation runs.
//!
//! Provides the timestep divergence ("parallel universes") curves, integration
//! error against the analytic oscillator, timing summaries, and the report
//! bundle handed to the chart renderer.

pub mod divergence;
pub mod mse;
pub mod report;
pub mod timing;
