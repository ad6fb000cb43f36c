//! Per satellite time series
use std::collections::BTreeMap;

use itertools::Itertools;
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::prelude::{EphemerisRecord, PseudorangeObservation, Record, SV};

#[cfg(feature = "serde")]
use crate::prelude::Error;

/// [SatelliteTrack] gathers everything received for one satellite:
/// pseudo ranges (in arrival order) and distinct ephemerides.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedTrack"))]
pub struct SatelliteTrack {
    /// [SV] identity
    sv: SV,
    /// Observations, in arrival order
    observations: Vec<PseudorangeObservation>,
    /// Observation instants, index-aligned with observations
    times: Vec<f64>,
    /// Ephemerides, unique by time of week. Never empty.
    ephemeris: Vec<EphemerisRecord>,
}

/// Deserialized [SatelliteTrack], prior verification
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct UncheckedTrack {
    sv: SV,
    observations: Vec<PseudorangeObservation>,
    times: Vec<f64>,
    ephemeris: Vec<EphemerisRecord>,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedTrack> for SatelliteTrack {
    type Error = Error;

    fn try_from(track: UncheckedTrack) -> Result<Self, Self::Error> {
        let sv = track.sv;

        if track.ephemeris.is_empty()
            || track.observations.len() != track.times.len()
            || track.ephemeris.iter().any(|eph| eph.sv != sv)
            || track.observations.iter().any(|obs| obs.sv != sv)
        {
            return Err(Error::InvalidTrack(sv));
        }

        Ok(Self {
            sv,
            observations: track.observations,
            times: track.times,
            ephemeris: track.ephemeris,
        })
    }
}

impl SatelliteTrack {
    fn new(first: EphemerisRecord) -> Self {
        Self {
            sv: first.sv,
            observations: Vec::new(),
            times: Vec::new(),
            ephemeris: vec![first],
        }
    }

    /// Appends a new [EphemerisRecord], unless one with same time of week
    /// was already received. Returns true when retained.
    fn push_ephemeris(&mut self, record: EphemerisRecord) -> bool {
        if self
            .ephemeris
            .iter()
            .any(|eph| eph.time_of_week == record.time_of_week)
        {
            return false;
        }
        self.ephemeris.push(record);
        true
    }

    fn push_observation(&mut self, time_of_week: f64, observation: PseudorangeObservation) {
        self.observations.push(observation);
        self.times.push(time_of_week);
    }

    /// [SV] identity
    pub fn sv(&self) -> SV {
        self.sv
    }

    /// [PseudorangeObservation]s, in arrival order
    pub fn observations(&self) -> &[PseudorangeObservation] {
        &self.observations
    }

    /// Observation instants (s of week), index-aligned with [Self::observations]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns pseudo ranges (m), index-aligned with [Self::times]
    pub fn pseudoranges(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|obs| obs.pseudorange_m)
    }

    /// Distinct [EphemerisRecord]s, in arrival order
    pub fn ephemeris(&self) -> &[EphemerisRecord] {
        &self.ephemeris
    }

    /// First received [EphemerisRecord]. Orbit propagation only
    /// relies on this one.
    pub fn first_ephemeris(&self) -> &EphemerisRecord {
        &self.ephemeris[0]
    }

    /// Index of the observation sampled at exactly `t`, if any.
    pub fn index_of(&self, t: f64) -> Option<usize> {
        self.times.iter().position(|time| *time == t)
    }

    /// Earliest ephemeris time of week
    pub fn basis_time(&self) -> f64 {
        self.ephemeris
            .iter()
            .map(|eph| eph.time_of_week)
            .fold(f64::INFINITY, f64::min)
    }
}

/// Collection of [SatelliteTrack]s, sorted by [SV]
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tracks(BTreeMap<SV, SatelliteTrack>);

impl Tracks {
    /// Tracked satellites, ascending
    pub fn satellites(&self) -> impl Iterator<Item = SV> + '_ {
        self.0.keys().copied()
    }

    /// Iterates [SatelliteTrack]s by ascending [SV]
    pub fn iter(&self) -> impl Iterator<Item = &SatelliteTrack> {
        self.0.values()
    }

    /// Returns [SatelliteTrack] of given [SV]
    pub fn get(&self, sv: &SV) -> Option<&SatelliteTrack> {
        self.0.get(sv)
    }

    /// Number of tracked satellites
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Distinct observation instants, ascending
    pub fn epochs(&self) -> Vec<f64> {
        self.0
            .values()
            .flat_map(|track| track.times.iter().copied())
            .sorted_by(f64::total_cmp)
            .dedup()
            .collect()
    }

    /// Earliest ephemeris time of week, across all tracks
    pub fn basis_time(&self) -> Option<f64> {
        self.0
            .values()
            .map(|track| track.basis_time())
            .reduce(f64::min)
    }
}

/// [TrackBuilder] ingests decoded [Record]s and sorts them per satellite.
#[derive(Debug, Clone, Default)]
pub struct TrackBuilder {
    ephemeris: Vec<EphemerisRecord>,
    observables: Vec<Vec<PseudorangeObservation>>,
}

impl TrackBuilder {
    /// Stores a new [Record], arrival order is preserved.
    pub fn push(&mut self, record: Record) {
        match record {
            Record::Ephemeris(eph) => self.ephemeris.push(eph),
            Record::Observables(observations) => self.observables.push(observations),
        }
    }

    /// Forms the [Tracks]. Only satellites that broadcast at least
    /// one ephemeris are tracked.
    pub fn build(self) -> Tracks {
        let mut tracks = BTreeMap::<SV, SatelliteTrack>::new();

        for eph in self.ephemeris {
            match tracks.get_mut(&eph.sv) {
                Some(track) => {
                    if !track.push_ephemeris(eph) {
                        debug!("{} - dropped duplicate ephemeris toe={}s", eph.sv, eph.time_of_week);
                    }
                },
                None => {
                    tracks.insert(eph.sv, SatelliteTrack::new(eph));
                },
            }
        }

        for observations in self.observables {
            for obs in observations {
                match tracks.get_mut(&obs.sv) {
                    Some(track) => track.push_observation(obs.time_of_week, obs),
                    None => {
                        debug!("{} - no ephemeris: observation discarded", obs.sv);
                    },
                }
            }
        }

        Tracks(tracks)
    }
}

impl FromIterator<Record> for TrackBuilder {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut builder = Self::default();
        for record in iter {
            builder.push(record);
        }
        builder
    }
}
