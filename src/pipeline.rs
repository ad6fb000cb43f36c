//! Batch processing of a captured message sequence
use std::collections::BTreeMap;

use log::info;

use crate::prelude::{
    Config, Error, EstimatedFix, Message, PositionEstimator, TrackBuilder, Tracks, Trajectory, SV,
};

/// Everything the [Pipeline] produced
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Per satellite [Tracks]
    pub tracks: Tracks,
    /// Propagated [Trajectory] of each tracked satellite
    pub trajectories: BTreeMap<SV, Trajectory>,
    /// Resolved [EstimatedFix]es, chronological
    pub fixes: Vec<EstimatedFix>,
}

/// [Pipeline] chains decoding, track formation, orbit propagation
/// and position estimation.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    estimator: PositionEstimator,
}

impl Pipeline {
    pub fn new(cfg: Config) -> Result<Self, Error> {
        Ok(Self {
            estimator: PositionEstimator::new(cfg)?,
        })
    }

    /// Processes a finite sequence of [Message]s. The first decoding
    /// error aborts the run.
    pub fn run<'a, I>(&self, messages: I) -> Result<PipelineOutput, Error>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let mut builder = TrackBuilder::default();

        for msg in messages {
            if let Some(record) = msg.decode()? {
                builder.push(record);
            }
        }

        let tracks = builder.build();
        let trajectories = tracks.trajectories();
        let fixes = self.estimator.fixes(&tracks, &trajectories);

        info!(
            "{} satellites tracked, {} fixes resolved",
            tracks.len(),
            fixes.len()
        );

        Ok(PipelineOutput {
            tracks,
            trajectories,
            fixes,
        })
    }
}
