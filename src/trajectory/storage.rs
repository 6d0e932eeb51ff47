//! File-backed trajectory recorder.
//!
//! Writes one JSON object per line to `<result_dir>/traj.jsonl` so that a
//! crashed episode still leaves every step recorded before the crash.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::recorder::TrajectoryRecorder;
use super::types::{StepRecord, TrajectoryEvent};
use crate::episode::environment::{Example, Observation};
use crate::error::RecorderError;

/// Trajectory file name inside a result directory.
pub const TRAJECTORY_FILE: &str = "traj.jsonl";

/// Recorder appending trajectory events to a JSON Lines file.
pub struct JsonlTrajectoryRecorder {
    /// Destination file.
    path: PathBuf,

    /// Identifier written in the `init` event.
    trajectory_id: Uuid,

    /// Whether `record_init` has run.
    initialized: bool,

    /// Steps recorded since `record_init`.
    steps_recorded: usize,
}

impl JsonlTrajectoryRecorder {
    /// Creates a recorder writing to `<result_dir>/traj.jsonl`.
    pub fn new(result_dir: impl AsRef<Path>) -> Self {
        Self {
            path: result_dir.as_ref().join(TRAJECTORY_FILE),
            trajectory_id: Uuid::new_v4(),
            initialized: false,
            steps_recorded: 0,
        }
    }

    /// Returns the trajectory file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the trajectory ID.
    pub fn trajectory_id(&self) -> Uuid {
        self.trajectory_id
    }

    /// Returns the number of steps recorded so far.
    pub fn steps_recorded(&self) -> usize {
        self.steps_recorded
    }

    async fn append(&self, event: &TrajectoryEvent) -> Result<(), RecorderError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }

    fn ensure_initialized(&self, call: &str) -> Result<(), RecorderError> {
        if self.initialized {
            Ok(())
        } else {
            Err(RecorderError::OutOfOrder(format!(
                "{} called before record_init",
                call
            )))
        }
    }
}

#[async_trait]
impl TrajectoryRecorder for JsonlTrajectoryRecorder {
    async fn record_init(
        &mut self,
        observation: Option<&Observation>,
        example: &Example,
        init_timestamp: &str,
    ) -> Result<(), RecorderError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        // A rerun of the same example starts a fresh trajectory.
        fs::write(&self.path, b"").await?;

        self.initialized = true;
        self.steps_recorded = 0;
        self.append(&TrajectoryEvent::Init {
            trajectory_id: self.trajectory_id,
            example: example.clone(),
            observation: observation.cloned(),
            timestamp: init_timestamp.to_string(),
        })
        .await
    }

    async fn record_step(&mut self, step: StepRecord) -> Result<(), RecorderError> {
        self.ensure_initialized("record_step")?;
        self.append(&TrajectoryEvent::Step(step)).await?;
        self.steps_recorded += 1;
        Ok(())
    }

    async fn record_end(
        &mut self,
        score: f64,
        start_time: DateTime<Local>,
    ) -> Result<(), RecorderError> {
        self.ensure_initialized("record_end")?;
        let duration = Local::now() - start_time;
        self.append(&TrajectoryEvent::End {
            score,
            start_time,
            duration_seconds: duration.num_milliseconds() as f64 / 1000.0,
            steps_recorded: self.steps_recorded,
        })
        .await
    }
}

/// Reads every event of a trajectory file, in order.
pub async fn read_events(path: impl AsRef<Path>) -> Result<Vec<TrajectoryEvent>, RecorderError> {
    let content = fs::read_to_string(path.as_ref()).await?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(RecorderError::from))
        .collect()
}
