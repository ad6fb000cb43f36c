#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

// private modules
mod cfg;
mod error;
mod message;
mod navigation;
mod orbit;
mod pipeline;
mod solutions;
mod solver;
mod track;

pub mod constants;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::Config;
    pub use crate::error::Error;
    pub use crate::message::{
        DataField, EphemerisRecord, Fields, Message, MessageKind, PseudorangeObservation, Record,
    };
    pub use crate::navigation::{DilutionOfPrecision, SatelliteMeasurement};
    pub use crate::orbit::{earth_rotation_angle, eci_to_ecef, Trajectory};
    pub use crate::pipeline::{Pipeline, PipelineOutput};
    pub use crate::solutions::EstimatedFix;
    pub use crate::solver::PositionEstimator;
    pub use crate::track::{SatelliteTrack, TrackBuilder, Tracks};
    // re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Epoch, TimeScale};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
