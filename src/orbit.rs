//! Keplerian orbit propagation
use std::collections::BTreeMap;
use std::f64::consts::TAU;

use log::debug;
use nalgebra::{Rotation3, Vector3};

use crate::{
    constants::{EARTH_GRAVITATION_MU_M3_S2, SECONDS_PER_DAY},
    prelude::{EphemerisRecord, SatelliteTrack, Tracks, SV},
};

impl EphemerisRecord {
    /// Mean motion (rad/s)
    pub fn mean_motion(&self) -> f64 {
        (EARTH_GRAVITATION_MU_M3_S2 / self.semi_major_axis_m.powi(3)).sqrt()
    }

    /// Approximates the true anomaly (rad), `dt` seconds after reference time,
    /// using the third order expansion of the equation of center.
    pub fn true_anomaly(&self, dt: f64) -> f64 {
        let e = self.eccentricity;
        let m = self.mean_anomaly_rad + self.mean_motion() * dt;

        m + (2.0 * e - e.powi(3) / 4.0) * m.sin()
            + 5.0 / 4.0 * e.powi(2) * (2.0 * m).sin()
            + 13.0 / 12.0 * e * (3.0 * m).sin()
    }

    /// Distance from focal point (m), at given true anomaly.
    pub fn perifocal_radius(&self, true_anomaly: f64) -> f64 {
        let e = self.eccentricity;
        self.semi_major_axis_m * (1.0 - e.powi(2)) / (1.0 + e * true_anomaly.cos())
    }

    /// Position in the perifocal (PQW) frame (m), at given true anomaly.
    pub fn perifocal_position(&self, true_anomaly: f64) -> Vector3<f64> {
        let r = self.perifocal_radius(true_anomaly);
        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        Vector3::new(r * cos_nu, r * sin_nu, 0.0)
    }

    /// Perifocal to ECI [Rotation3]: frame rotations of -ω about Z,
    /// -i about X, then -Ω about Z.
    pub fn perifocal_to_eci(&self) -> Rotation3<f64> {
        let rot_periapsis = Rotation3::from_axis_angle(&Vector3::z_axis(), self.periapsis_rad);
        let rot_inclination =
            Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination_rad);
        let rot_raan = Rotation3::from_axis_angle(&Vector3::z_axis(), self.raan_rad);
        rot_raan * rot_inclination * rot_periapsis
    }
}

/// Earth rotation angle (rad) at `t` (s), modeled with a solar day period.
/// Sidereal time is not taken into account.
pub fn earth_rotation_angle(t: f64) -> f64 {
    (t / SECONDS_PER_DAY).rem_euclid(1.0) * TAU
}

/// Converts ECI coordinates to ECEF at `t` (s of week).
pub fn eci_to_ecef(eci: &Vector3<f64>, t: f64) -> Vector3<f64> {
    let theta = earth_rotation_angle(t);
    Rotation3::from_axis_angle(&Vector3::z_axis(), -theta) * *eci
}

/// [Trajectory] of one satellite, sampled at each of its observation
/// instants. All sequences are index-aligned with [SatelliteTrack::times].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    /// Perifocal coordinates (m)
    pub perifocal: Vec<Vector3<f64>>,
    /// Earth centered inertial coordinates (m)
    pub eci: Vec<Vector3<f64>>,
    /// Earth centered earth fixed coordinates (m)
    pub ecef: Vec<Vector3<f64>>,
}

impl Trajectory {
    /// Propagates the first ephemeris of this [SatelliteTrack]
    /// to every observation instant. Following ephemerides are ignored.
    /// No input validation: `nan` propagates to the output.
    pub fn propagate(track: &SatelliteTrack) -> Self {
        let eph = track.first_ephemeris();
        let rotation = eph.perifocal_to_eci();
        let size = track.times().len();

        let mut s = Self {
            perifocal: Vec::with_capacity(size),
            eci: Vec::with_capacity(size),
            ecef: Vec::with_capacity(size),
        };

        for t in track.times() {
            let nu = eph.true_anomaly(t - eph.time_of_week);
            let pqw = eph.perifocal_position(nu);
            let eci = rotation * pqw;
            s.ecef.push(eci_to_ecef(&eci, *t));
            s.eci.push(eci);
            s.perifocal.push(pqw);
        }

        debug!("{} - propagated {} states", track.sv(), size);
        s
    }

    /// Number of propagated states
    pub fn len(&self) -> usize {
        self.ecef.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ecef.is_empty()
    }
}

impl Tracks {
    /// Propagates every [SatelliteTrack]
    pub fn trajectories(&self) -> BTreeMap<SV, Trajectory> {
        self.iter()
            .map(|track| (track.sv(), Trajectory::propagate(track)))
            .collect()
    }
}
