//! Position estimator
use std::collections::BTreeMap;

use log::{debug, error, info};

use crate::{
    navigation::{DilutionOfPrecision, Navigation, SatelliteMeasurement},
    prelude::{Config, Error, EstimatedFix, Trajectory, Tracks, SV},
    solutions::spherical_coordinates,
};

/// [PositionEstimator] resolves the receiver position and clock bias
/// at every epoch shared by enough satellites.
/// It holds no state between calls: running it twice over the
/// same input gives bit-identical results.
#[derive(Debug, Clone, Default)]
pub struct PositionEstimator {
    /// Solver parametrization
    cfg: Config,
}

impl PositionEstimator {
    /// Creates a new [PositionEstimator], verifying the [Config] first.
    pub fn new(cfg: Config) -> Result<Self, Error> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// [Config] in use
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Gathers the [SatelliteMeasurement]s sampled at exactly `t`,
    /// by ascending [SV].
    pub fn measurements(
        tracks: &Tracks,
        trajectories: &BTreeMap<SV, Trajectory>,
        t: f64,
    ) -> Vec<SatelliteMeasurement> {
        tracks
            .iter()
            .filter_map(|track| {
                let index = track.index_of(t)?;
                let trajectory = trajectories.get(&track.sv())?;
                let position_ecef_m = *trajectory.ecef.get(index)?;
                let pseudorange_m = track.observations().get(index)?.pseudorange_m;
                Some(SatelliteMeasurement {
                    sv: track.sv(),
                    position_ecef_m,
                    pseudorange_m,
                })
            })
            .collect()
    }

    /// Resolves every epoch, in chronological order. Epochs with
    /// fewer than [Config::min_satellites] satellites are skipped. Each
    /// attempted epoch yields its own result, so one degenerate epoch
    /// does not prevent the others from being resolved.
    pub fn resolve(
        &self,
        tracks: &Tracks,
        trajectories: &BTreeMap<SV, Trajectory>,
    ) -> Vec<Result<EstimatedFix, Error>> {
        let mut results = Vec::new();

        for t in tracks.epochs() {
            let measurements = Self::measurements(tracks, trajectories, t);
            if measurements.len() < self.cfg.min_satellites {
                debug!("t={}s - {} satellites: skipped", t, measurements.len());
                continue;
            }
            results.push(self.resolve_epoch(t, &measurements));
        }

        results
    }

    /// Resolves every epoch and only retains valid [EstimatedFix]es.
    /// Rejected epochs are logged.
    pub fn fixes(
        &self,
        tracks: &Tracks,
        trajectories: &BTreeMap<SV, Trajectory>,
    ) -> Vec<EstimatedFix> {
        self.resolve(tracks, trajectories)
            .into_iter()
            .filter_map(|result| match result {
                Ok(fix) => Some(fix),
                Err(e) => {
                    error!("rejected epoch: {}", e);
                    None
                },
            })
            .collect()
    }

    /// Resolves a single epoch from its [SatelliteMeasurement]s.
    pub fn resolve_epoch(
        &self,
        t: f64,
        measurements: &[SatelliteMeasurement],
    ) -> Result<EstimatedFix, Error> {
        let output = Navigation::new(&self.cfg, t, measurements)?.resolve()?;

        let (lon_deg, lat_deg, _) = spherical_coordinates(&output.position);
        let dop = DilutionOfPrecision::new(&output.q, lat_deg.to_radians(), lon_deg.to_radians());

        let fix = EstimatedFix {
            epoch: t,
            position: output.position,
            clock_bias_m: output.clock_bias_m,
            satellites: measurements.iter().map(|meas| meas.sv).collect(),
            residuals: output.residuals,
            iterations: output.iterations,
            dop,
        };

        info!("{}", fix);
        Ok(fix)
    }
}
