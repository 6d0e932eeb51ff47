//! Trajectory recording for stepwise episodes.
//!
//! The controller reports each episode to a [`TrajectoryRecorder`]:
//! - **init**: the initial observation, the example, and the start timestamp
//! - **step**: one [`StepRecord`] per executed action
//! - **end**: the evaluator score and the start time
//!
//! Only stepwise episodes are recorded; server-delegated and conversational
//! runs never touch the recorder.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arena_episode::trajectory::{JsonlTrajectoryRecorder, read_events};
//!
//! let mut recorder = JsonlTrajectoryRecorder::new("results/chrome/example-1");
//! controller.run(&mut agent, &mut env, &mut recorder, request, &scores).await?;
//!
//! for event in read_events(recorder.path()).await? {
//!     println!("{:?}", event);
//! }
//! ```

pub mod recorder;
pub mod storage;
pub mod types;

pub use recorder::{NoopRecorder, TrajectoryRecorder};
pub use storage::{read_events, JsonlTrajectoryRecorder, TRAJECTORY_FILE};
pub use types::{format_elapsed, format_timestamp, StepRecord, TrajectoryEvent, TIMESTAMP_FORMAT};
