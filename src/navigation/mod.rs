//! Single epoch least squares navigation
use log::debug;
use nalgebra::{DMatrix, DVector, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::MIN_SATELLITES,
    prelude::{Config, Error, SV},
};

mod dop;
pub use dop::DilutionOfPrecision;

/// Pseudo range measured at one epoch, along with the transmitter position.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteMeasurement {
    /// [SV] identity
    pub sv: SV,
    /// Satellite position (m ECEF)
    pub position_ecef_m: Vector3<f64>,
    /// Measured pseudo range (m)
    pub pseudorange_m: f64,
}

/// Linearized system around current state
struct Linearization {
    /// Geometry matrix: one [-u, 1] row per satellite
    h: DMatrix<f64>,
    /// Pseudo range residuals (m)
    b: DVector<f64>,
}

/// [Navigation] output
#[derive(Debug, Clone)]
pub(crate) struct Output {
    /// Position (m ECEF)
    pub position: Vector3<f64>,
    /// Receiver clock bias (m)
    pub clock_bias_m: f64,
    /// Iterations actually performed
    pub iterations: usize,
    /// Post fit residuals (m)
    pub residuals: Vec<f64>,
    /// (Hᵀ.H)⁻¹ at final state
    pub q: DMatrix<f64>,
}

/// Newton-Raphson navigation over a single epoch.
pub(crate) struct Navigation<'a> {
    cfg: &'a Config,
    t: f64,
    measurements: &'a [SatelliteMeasurement],
}

impl<'a> Navigation<'a> {
    pub fn new(
        cfg: &'a Config,
        t: f64,
        measurements: &'a [SatelliteMeasurement],
    ) -> Result<Self, Error> {
        let size = measurements.len();
        if size < MIN_SATELLITES.max(cfg.min_satellites) {
            return Err(Error::NotEnoughSatellites(size));
        }
        Ok(Self {
            cfg,
            t,
            measurements,
        })
    }

    fn linearize(&self, position: &Vector3<f64>, clock_bias_m: f64) -> Linearization {
        let size = self.measurements.len();
        let mut h = DMatrix::<f64>::zeros(size, 4);
        let mut b = DVector::<f64>::zeros(size);

        for (i, meas) in self.measurements.iter().enumerate() {
            let los = meas.position_ecef_m - position;
            let rho = los.norm();
            let unit = los / rho;

            h[(i, 0)] = -unit[0];
            h[(i, 1)] = -unit[1];
            h[(i, 2)] = -unit[2];
            h[(i, 3)] = 1.0;
            b[i] = meas.pseudorange_m - rho - clock_bias_m;
        }

        Linearization { h, b }
    }

    /// Singular values based condition number of the geometry matrix.
    fn condition_number(singular_values: &DVector<f64>) -> f64 {
        let max = singular_values.max();
        let min = singular_values.min();
        if min > 0.0 {
            max / min
        } else {
            f64::INFINITY
        }
    }

    fn degenerate(&self, condition: f64) -> Error {
        Error::DegenerateGeometry {
            epoch: self.t,
            condition,
        }
    }

    /// Iterates from the origin with null clock bias.
    pub fn resolve(&self) -> Result<Output, Error> {
        let mut position = Vector3::<f64>::zeros();
        let mut clock_bias_m = 0.0_f64;
        let mut iterations = 0;

        for _ in 0..self.cfg.iterations {
            let lin = self.linearize(&position, clock_bias_m);

            let svd = lin.h.svd(true, true);
            let condition = Self::condition_number(&svd.singular_values);

            if !condition.is_finite() || condition > self.cfg.max_condition_number {
                return Err(self.degenerate(condition));
            }

            let pinv = svd
                .pseudo_inverse(self.cfg.pinv_epsilon)
                .map_err(|_| self.degenerate(condition))?;

            let dx = pinv * lin.b;

            if dx.iter().any(|v| !v.is_finite()) {
                return Err(Error::NonFiniteSolution(self.t));
            }

            let dp = Vector3::new(dx[0], dx[1], dx[2]);
            position += dp;
            clock_bias_m += dx[3];
            iterations += 1;

            debug!(
                "t={}s - iter={} |dx|={:.6E} dt={:.6E}",
                self.t,
                iterations,
                dp.norm(),
                dx[3]
            );

            if let Some(threshold) = self.cfg.convergence_m {
                if dp.norm() < threshold {
                    break;
                }
            }
        }

        let lin = self.linearize(&position, clock_bias_m);

        if !position.iter().all(|v| v.is_finite()) || !clock_bias_m.is_finite() {
            return Err(Error::NonFiniteSolution(self.t));
        }

        let q = (lin.h.transpose() * &lin.h)
            .try_inverse()
            .ok_or_else(|| self.degenerate(f64::INFINITY))?;

        Ok(Output {
            position,
            clock_bias_m,
            iterations,
            residuals: lin.b.iter().copied().collect(),
            q,
        })
    }
}
