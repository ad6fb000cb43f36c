use hifitime::{Epoch, TimeScale};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{AMBIGUITY_RANGE_M, SECONDS_PER_WEEK},
    prelude::SV,
};

/// Typed [Record] obtained from a decoded message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Record {
    /// One [PseudorangeObservation] per satellite slot,
    /// all sharing the message time of week.
    Observables(Vec<PseudorangeObservation>),
    /// Single [EphemerisRecord]
    Ephemeris(EphemerisRecord),
}

/// Pseudo range measured for one satellite, at one instant.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PseudorangeObservation {
    /// [SV] identity
    pub sv: SV,
    /// Sampling instant, in seconds of GPS week
    pub time_of_week: f64,
    /// Pseudo range (m)
    pub pseudorange_m: f64,
}

impl PseudorangeObservation {
    /// Forms a [PseudorangeObservation] from its integer ambiguity
    /// (light-ms) and fractional remainder (m).
    pub fn from_ambiguity(sv: SV, time_of_week: f64, ambiguity: f64, remainder_m: f64) -> Self {
        Self {
            sv,
            time_of_week,
            pseudorange_m: ambiguity * AMBIGUITY_RANGE_M + remainder_m,
        }
    }
}

impl std::fmt::Display for PseudorangeObservation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} t={}s pr={:.3}m",
            self.sv, self.time_of_week, self.pseudorange_m
        )
    }
}

/// Broadcast Keplerian elements of one satellite.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EphemerisRecord {
    /// [SV] identity
    pub sv: SV,
    /// Eccentricity
    pub eccentricity: f64,
    /// Inclination (in radians)
    pub inclination_rad: f64,
    /// Mean anomaly at reference time (in radians)
    pub mean_anomaly_rad: f64,
    /// Semi-major axis (in meters)
    pub semi_major_axis_m: f64,
    /// Right ascension of ascending node (in radians)
    pub raan_rad: f64,
    /// Argument of periapsis (in radians)
    pub periapsis_rad: f64,
    /// GPS week number
    pub week: u32,
    /// Reference time, in seconds of week
    pub time_of_week: f64,
}

impl EphemerisRecord {
    /// Seconds elapsed since GPS time origin
    pub fn time_since_epoch(&self) -> f64 {
        self.week as f64 * SECONDS_PER_WEEK + self.time_of_week
    }

    /// Returns reference instant as [Epoch], in [TimeScale::GPST]
    pub fn toe(&self) -> Epoch {
        let nanos = (self.time_of_week * 1.0E9).round().max(0.0) as u64;
        Epoch::from_time_of_week(self.week, nanos, TimeScale::GPST)
    }
}

impl std::fmt::Display for EphemerisRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} week={} toe={}s e={} i={}rad M={}rad a={}m Ω={}rad ω={}rad",
            self.sv,
            self.week,
            self.time_of_week,
            self.eccentricity,
            self.inclination_rad,
            self.mean_anomaly_rad,
            self.semi_major_axis_m,
            self.raan_rad,
            self.periapsis_rad,
        )
    }
}
