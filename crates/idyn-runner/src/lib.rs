//! idyn-runner: drives the external simulators.
//!
//! Builds the command lines for the billiards and oscillator executables,
//! expands the experiment configuration into sweep plans and runs them one
//! after another, collecting benchmark timings where requested.

pub mod error;
pub mod execute;
pub mod invocation;
pub mod sweep;

pub use error::RunError;
pub use execute::{SweepOutcome, execute, parse_elapsed};
pub use invocation::SimulatorInvocation;
pub use sweep::{
    PlannedRun, SweepPlan, divergence_plan, lucky_shot_plan, lucky_shot_positions, method_plan,
};
