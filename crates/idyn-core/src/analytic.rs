//! Closed-form solution of the damped oscillator the simulator integrates.

use serde::{Deserialize, Serialize};

/// Under-damped harmonic oscillator `m x'' = -k x - gamma x'`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DampedOscillator {
    /// Mass (kg)
    pub mass: f64,
    /// Restoring force constant (N/m)
    pub stiffness: f64,
    /// Damping constant (kg/s)
    pub damping: f64,
    /// Initial amplitude (m)
    pub amplitude: f64,
}

impl Default for DampedOscillator {
    fn default() -> Self {
        Self {
            mass: 70.0,
            stiffness: 1e4,
            damping: 1e2,
            amplitude: 1.0,
        }
    }
}

impl DampedOscillator {
    /// Exponential decay rate (negative).
    pub fn decay_rate(&self) -> f64 {
        -self.damping / (2.0 * self.mass)
    }

    /// Angular frequency of the damped oscillation.
    pub fn angular_frequency(&self) -> f64 {
        (self.stiffness / self.mass
            - self.damping * self.damping / (4.0 * self.mass * self.mass))
            .sqrt()
    }

    /// Position at time `t`.
    pub fn position(&self, t: f64) -> f64 {
        self.amplitude * (self.decay_rate() * t).exp() * (self.angular_frequency() * t).cos()
    }
}
