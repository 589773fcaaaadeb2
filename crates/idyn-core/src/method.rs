//! Integration schemes the simulator understands.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Integration method, named the way the simulator CLI and data directories
/// spell it (`gear-predictor-corrector`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Method {
    Euler,
    EulerMod,
    Verlet,
    VerletLeapFrog,
    VelocityVerlet,
    Beeman,
    EulerPredictorCorrector,
    GearPredictorCorrector,
}

impl Method {
    /// Human-readable label for chart legends
    pub const fn label(&self) -> &'static str {
        match self {
            Method::Euler => "Euler",
            Method::EulerMod => "Modified Euler",
            Method::Verlet => "Verlet",
            Method::VerletLeapFrog => "Verlet Leap Frog",
            Method::VelocityVerlet => "Velocity Verlet",
            Method::Beeman => "Beeman",
            Method::EulerPredictorCorrector => "Euler Predictor Corrector",
            Method::GearPredictorCorrector => "Gear Predictor Corrector",
        }
    }
}
