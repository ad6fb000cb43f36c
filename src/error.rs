use thiserror::Error;

use crate::{message::DataField, prelude::SV};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A supported message is missing one of its header fields.
    #[error("missing data field {0}")]
    MissingField(DataField),

    /// A supported message is missing a field within one satellite slot.
    /// Slots are numbered from 1, like the protocol does.
    #[error("missing data field {1} in satellite slot #{0}")]
    MissingSlotField(usize, DataField),

    /// Satellite identification field does not describe a valid PRN.
    #[error("invalid satellite identification number {0}")]
    InvalidSatelliteId(f64),

    /// Integer field (counter, week number) out of range or not an integer.
    #[error("invalid value {1} for data field {0}")]
    InvalidField(DataField, f64),

    /// Deserialized track content is inconsistent: no ephemeris, or
    /// observations and instants not index-aligned.
    #[error("{0} - inconsistent track content")]
    InvalidTrack(SV),

    /// Single epoch resolution requires at least 4 satellites
    #[error("not enough satellites: {0}")]
    NotEnoughSatellites(usize),

    /// Geometry matrix is singular or too poorly conditioned to be trusted.
    /// This typically happens when satellites and receiver are nearly coplanar.
    #[error("degenerate geometry at t={epoch}s (condition number {condition:e})")]
    DegenerateGeometry { epoch: f64, condition: f64 },

    /// Iterations converged to `nan` or infinite state (invalid inputs)
    #[error("non finite solution at t={0}s")]
    NonFiniteSolution(f64),

    /// [Config] rejected at solver creation
    ///
    /// [Config]: crate::prelude::Config
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
