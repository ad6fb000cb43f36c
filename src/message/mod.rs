//! Decoded protocol messages
use std::{collections::HashMap, f64::consts::PI};

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::ECCENTRICITY_SCALE,
    prelude::{Constellation, Error, SV},
};

mod record;

pub use record::{EphemerisRecord, PseudorangeObservation, Record};

/// Protocol data fields this library depends upon.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataField {
    /// GPS epoch time (ms of week)
    DF004,
    /// Number of GPS satellites in message
    DF006,
    /// GPS satellite ID
    DF009,
    /// GPS L1 pseudo range (m, modulo 1 light-ms)
    DF011,
    /// GPS L1 pseudo range modulus ambiguity (integer light-ms)
    DF014,
    /// GPS week number
    DF076,
    /// GPS time of week (s)
    DF081,
    /// GPS mean anomaly M0 (semi-circles)
    DF088,
    /// GPS eccentricity (2^-33 scaled)
    DF090,
    /// GPS square root of semi-major axis
    DF092,
    /// GPS longitude of ascending node Ω0 (semi-circles)
    DF095,
    /// GPS inclination angle i0 (semi-circles)
    DF097,
    /// GPS argument of perigee ω (semi-circles)
    DF099,
}

impl std::fmt::Display for DataField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Message kinds supported by [Message::decode]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageKind {
    /// L1-only GPS RTK observables (1002)
    Observables,
    /// GPS broadcast ephemeris (1019)
    Ephemeris,
}

impl MessageKind {
    /// Identifies the [MessageKind] from protocol message number.
    /// Returns None for unsupported messages.
    pub fn from_identity(identity: u16) -> Option<Self> {
        match identity {
            1002 => Some(Self::Observables),
            1019 => Some(Self::Ephemeris),
            _ => None,
        }
    }

    /// Protocol message number
    pub fn identity(&self) -> u16 {
        match self {
            Self::Observables => 1002,
            Self::Ephemeris => 1019,
        }
    }
}

/// Set of named numeric [DataField]s, as yielded by the upstream
/// protocol decoder.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fields(HashMap<DataField, f64>);

impl Fields {
    /// Copies and returns [Fields] with given value
    pub fn with(&self, field: DataField, value: f64) -> Self {
        let mut s = self.clone();
        s.insert(field, value);
        s
    }

    /// Inserts (or replaces) a value
    pub fn insert(&mut self, field: DataField, value: f64) {
        self.0.insert(field, value);
    }

    /// Returns value of requested [DataField], if it exists
    pub fn get(&self, field: DataField) -> Option<f64> {
        self.0.get(&field).copied()
    }

    fn header(&self, field: DataField) -> Result<f64, Error> {
        self.get(field).ok_or(Error::MissingField(field))
    }

    fn slot(&self, slot: usize, field: DataField) -> Result<f64, Error> {
        self.get(field).ok_or(Error::MissingSlotField(slot, field))
    }
}

impl FromIterator<(DataField, f64)> for Fields {
    fn from_iter<I: IntoIterator<Item = (DataField, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// [Message] as yielded by the upstream protocol decoder, framing
/// and checksum already verified.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Protocol message number
    pub identity: u16,
    /// Header (non repeated) fields
    pub header: Fields,
    /// Per satellite fields. First slot is stored at index 0.
    pub slots: Vec<Fields>,
}

/// Largest satellite count an observables message can announce (5 bit field)
const MAX_SATELLITE_COUNT: u32 = 31;

/// Converts an unsigned integer [DataField], rejecting anything
/// that is not a finite integer within 0..=max.
fn unsigned_field(field: DataField, value: f64, max: u32) -> Result<u32, Error> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > max as f64 {
        return Err(Error::InvalidField(field, value));
    }
    Ok(value as u32)
}

fn satellite_id(value: f64) -> Result<SV, Error> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > u8::MAX as f64 {
        return Err(Error::InvalidSatelliteId(value));
    }
    Ok(SV::new(Constellation::GPS, value as u8))
}

impl Message {
    /// Builds a new [Message]
    pub fn new(identity: u16, header: Fields, slots: Vec<Fields>) -> Self {
        Self {
            identity,
            header,
            slots,
        }
    }

    /// Returns [MessageKind], None when not supported
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_identity(self.identity)
    }

    /// Decodes this [Message] into a typed [Record].
    /// Unsupported messages are not an error and simply yield None.
    /// Any missing field of a supported message aborts the decoding.
    pub fn decode(&self) -> Result<Option<Record>, Error> {
        match self.kind() {
            Some(MessageKind::Observables) => self.decode_observables().map(Some),
            Some(MessageKind::Ephemeris) => self.decode_ephemeris().map(Some),
            None => {
                debug!("skipping unsupported message {}", self.identity);
                Ok(None)
            },
        }
    }

    fn decode_observables(&self) -> Result<Record, Error> {
        let count = unsigned_field(
            DataField::DF006,
            self.header.header(DataField::DF006)?,
            MAX_SATELLITE_COUNT,
        )? as usize;
        let time_of_week = self.header.header(DataField::DF004)? / 1000.0;

        let mut observations = Vec::with_capacity(count);

        for index in 0..count {
            let slot = index + 1;
            let fields = self
                .slots
                .get(index)
                .ok_or(Error::MissingSlotField(slot, DataField::DF009))?;

            let sv = satellite_id(fields.slot(slot, DataField::DF009)?)?;
            let remainder = fields.slot(slot, DataField::DF011)?;
            let ambiguity = fields.slot(slot, DataField::DF014)?;

            observations.push(PseudorangeObservation::from_ambiguity(
                sv,
                time_of_week,
                ambiguity,
                remainder,
            ));
        }

        debug!(
            "t={}s - decoded {} pseudo range observations",
            time_of_week,
            observations.len()
        );

        Ok(Record::Observables(observations))
    }

    fn decode_ephemeris(&self) -> Result<Record, Error> {
        let fields = &self.header;
        let sv = satellite_id(fields.header(DataField::DF009)?)?;

        let week = unsigned_field(DataField::DF076, fields.header(DataField::DF076)?, u32::MAX)?;
        let sqrt_a = fields.header(DataField::DF092)?;

        let ephemeris = EphemerisRecord {
            sv,
            eccentricity: fields.header(DataField::DF090)? * ECCENTRICITY_SCALE,
            inclination_rad: fields.header(DataField::DF097)? * PI,
            mean_anomaly_rad: fields.header(DataField::DF088)? * PI,
            semi_major_axis_m: sqrt_a.powi(2),
            raan_rad: fields.header(DataField::DF095)? * PI,
            periapsis_rad: fields.header(DataField::DF099)? * PI,
            week,
            time_of_week: fields.header(DataField::DF081)?,
        };

        debug!("{} - decoded ephemeris toe={}s", sv, ephemeris.time_of_week);
        Ok(Record::Ephemeris(ephemeris))
    }
}
