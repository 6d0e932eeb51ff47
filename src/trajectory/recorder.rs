//! Recorder boundary used by the stepwise controller.

use async_trait::async_trait;
use chrono::{DateTime, Local};

use super::types::StepRecord;
use crate::episode::environment::{Example, Observation};
use crate::error::RecorderError;

/// Sink for the trajectory of one episode.
///
/// Calls arrive in order: `record_init` once, `record_step` zero or more
/// times, `record_end` once. The recorder owns persistence of everything it
/// receives.
#[async_trait]
pub trait TrajectoryRecorder: Send {
    /// Records the initial observation and example.
    async fn record_init(
        &mut self,
        observation: Option<&Observation>,
        example: &Example,
        init_timestamp: &str,
    ) -> Result<(), RecorderError>;

    /// Records one executed action.
    async fn record_step(&mut self, step: StepRecord) -> Result<(), RecorderError>;

    /// Records the final score.
    async fn record_end(
        &mut self,
        score: f64,
        start_time: DateTime<Local>,
    ) -> Result<(), RecorderError>;
}

/// Recorder that drops everything, for callers that do not keep trajectories.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

#[async_trait]
impl TrajectoryRecorder for NoopRecorder {
    async fn record_init(
        &mut self,
        _observation: Option<&Observation>,
        _example: &Example,
        _init_timestamp: &str,
    ) -> Result<(), RecorderError> {
        Ok(())
    }

    async fn record_step(&mut self, _step: StepRecord) -> Result<(), RecorderError> {
        Ok(())
    }

    async fn record_end(
        &mut self,
        _score: f64,
        _start_time: DateTime<Local>,
    ) -> Result<(), RecorderError> {
        Ok(())
    }
}
