//! Solver configuration preset

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{constants::MIN_SATELLITES, prelude::Error};

const fn default_iterations() -> usize {
    10
}

const fn default_min_satellites() -> usize {
    MIN_SATELLITES
}

const fn default_convergence() -> Option<f64> {
    None
}

const fn default_max_condition_number() -> f64 {
    1.0E12
}

const fn default_pinv_epsilon() -> f64 {
    1.0E-12
}

/// [Config] controls the [PositionEstimator] behavior.
///
/// [PositionEstimator]: crate::prelude::PositionEstimator
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Number of Newton-Raphson iterations per epoch.
    /// Exactly this many iterations run unless [Config::convergence_m] is set.
    #[cfg_attr(feature = "serde", serde(default = "default_iterations"))]
    pub iterations: usize,

    /// Minimal number of co-timed satellites for an epoch to be resolved.
    /// Cannot be lower than 4.
    #[cfg_attr(feature = "serde", serde(default = "default_min_satellites"))]
    pub min_satellites: usize,

    /// Optional early exit: stop iterating once the position correction
    /// norm (in meters) falls below this value.
    #[cfg_attr(feature = "serde", serde(default = "default_convergence"))]
    pub convergence_m: Option<f64>,

    /// Largest tolerated ratio between the greatest and smallest singular
    /// value of the geometry matrix. Epochs exceeding it are rejected
    /// as degenerate.
    #[cfg_attr(feature = "serde", serde(default = "default_max_condition_number"))]
    pub max_condition_number: f64,

    /// Singular values below this are zeroed when forming the pseudo-inverse.
    #[cfg_attr(feature = "serde", serde(default = "default_pinv_epsilon"))]
    pub pinv_epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            min_satellites: default_min_satellites(),
            convergence_m: default_convergence(),
            max_condition_number: default_max_condition_number(),
            pinv_epsilon: default_pinv_epsilon(),
        }
    }
}

impl Config {
    /// Copies and returns [Config] with updated iteration count
    pub fn with_iterations(&self, iterations: usize) -> Self {
        let mut s = self.clone();
        s.iterations = iterations;
        s
    }

    /// Copies and returns [Config] with early exit enabled,
    /// once the position correction falls below `threshold_m`.
    pub fn with_convergence(&self, threshold_m: f64) -> Self {
        let mut s = self.clone();
        s.convergence_m = Some(threshold_m);
        s
    }

    /// Copies and returns [Config] with updated minimal satellite count
    pub fn with_min_satellites(&self, min_satellites: usize) -> Self {
        let mut s = self.clone();
        s.min_satellites = min_satellites;
        s
    }

    /// Verifies this [Config] is usable.
    pub fn validate(&self) -> Result<(), Error> {
        if self.iterations == 0 {
            return Err(Error::InvalidConfig("at least one iteration is required"));
        }
        if self.min_satellites < MIN_SATELLITES {
            return Err(Error::InvalidConfig(
                "4 satellites are required to resolve position and clock bias",
            ));
        }
        if let Some(threshold) = self.convergence_m {
            if !(threshold > 0.0) {
                return Err(Error::InvalidConfig("convergence threshold must be positive"));
            }
        }
        if !(self.max_condition_number > 1.0) {
            return Err(Error::InvalidConfig("condition number limit must exceed 1"));
        }
        if !(self.pinv_epsilon >= 0.0) {
            return Err(Error::InvalidConfig("pseudo-inverse epsilon must be positive"));
        }
        Ok(())
    }
}
