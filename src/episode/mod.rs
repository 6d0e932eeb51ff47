//! Episode controller for benchmark examples.
//!
//! This module runs one agent against one example of a stateful desktop
//! environment, scores the final state, and persists the score.
//!
//! # Architecture
//!
//! ```text
//! Example + Instruction → EpisodeController ─┬─ Stepwise:        predict → step* → recorder
//!                                            ├─ ServerDelegated: env.run_agent
//!                                            └─ Conversational:  display setup → chat
//!                                     → env.evaluate → ScoreSink → result.txt
//! ```
//!
//! The controller:
//! 1. Resets the environment (and the agent, in stepwise mode)
//! 2. Runs the agent in the mode its capability tag selects
//! 3. Evaluates and appends the score to the shared aggregator
//! 4. Writes `result.txt` (and `time_taken.txt` for conversational runs)
//!
//! # Example
//!
//! ```ignore
//! use arena_episode::episode::{EpisodeAgent, EpisodeConfig, EpisodeController, EpisodeRequest, SharedScores};
//! use arena_episode::trajectory::JsonlTrajectoryRecorder;
//!
//! let controller = EpisodeController::new(EpisodeConfig::new().with_sleep_after_execution(Duration::from_secs(3)));
//! let scores = SharedScores::new();
//! let mut recorder = JsonlTrajectoryRecorder::new(&result_dir);
//!
//! let outcome = controller
//!     .run(&mut agent, &mut env, &mut recorder, EpisodeRequest {
//!         example: &example,
//!         instruction: "Open the Downloads folder",
//!         max_steps: 15,
//!         result_dir: &result_dir,
//!     }, &scores)
//!     .await?;
//!
//! println!("Score: {:.2}", outcome.score);
//! ```

pub mod agent;
pub mod config;
pub mod controller;
pub mod environment;
pub mod result;
pub mod scores;

pub use agent::{
    ConversationalAgent, EpisodeAgent, ExecutionMode, Prediction, ServerAgent, StepwiseAgent,
};
pub use config::{EpisodeConfig, Settings, DEFAULT_RECOVERY_DELAY, DEFAULT_WARMUP_DELAY};
pub use controller::{EpisodeController, EpisodeRequest};
pub use environment::{Action, Environment, Example, Observation, StepOutcome};
pub use result::{
    debug_path, format_minutes, format_score, has_error_marker, write_result, write_time_taken,
    EpisodeOutcome, DEBUG_DIR, ERROR_MARKER, RESULT_FILE, TIME_TAKEN_FILE,
};
pub use scores::{ScoreSink, SharedScores};
