//! Position solutions
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{DilutionOfPrecision, SV};

/// [EstimatedFix] resolved at one epoch shared by at least 4 satellites.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EstimatedFix {
    /// Epoch, in seconds of GPS week
    pub epoch: f64,
    /// Receiver position (m ECEF)
    pub position: Vector3<f64>,
    /// Receiver clock bias, expressed in meters like pseudo ranges
    pub clock_bias_m: f64,
    /// Satellites that contributed, ascending
    pub satellites: Vec<SV>,
    /// Post fit residuals (m), index-aligned with satellites
    pub residuals: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// [DilutionOfPrecision] at final state
    pub dop: DilutionOfPrecision,
}

impl EstimatedFix {
    /// Returns spherical geographic coordinates
    /// (longitude in degrees, latitude in degrees, radius in meters).
    /// Latitude is geocentric: Earth ellipsoid is not taken into account.
    pub fn spherical(&self) -> (f64, f64, f64) {
        spherical_coordinates(&self.position)
    }

    /// Root mean square of the post fit residuals (m)
    pub fn residual_rms(&self) -> f64 {
        if self.residuals.is_empty() {
            return 0.0;
        }
        let sum = self.residuals.iter().map(|r| r.powi(2)).sum::<f64>();
        (sum / self.residuals.len() as f64).sqrt()
    }
}

pub(crate) fn spherical_coordinates(ecef: &Vector3<f64>) -> (f64, f64, f64) {
    let r = ecef.norm();
    let longitude = ecef[1].atan2(ecef[0]);
    let colatitude = (ecef[2] / r).acos();
    (longitude.to_degrees(), 90.0 - colatitude.to_degrees(), r)
}

impl std::fmt::Display for EstimatedFix {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "t={}s x={:.3}m y={:.3}m z={:.3}m bias={:.3}m ({} SV, gdop={:.2})",
            self.epoch,
            self.position[0],
            self.position[1],
            self.position[2],
            self.clock_bias_m,
            self.satellites.len(),
            self.dop.gdop,
        )
    }
}
