//! arena-episode: single-episode controller for desktop-agent benchmarks.
//!
//! This library runs an agent against one benchmark example, scores the
//! resulting environment state, and persists the score next to the
//! example's trajectory.

pub mod cli;
pub mod episode;
pub mod error;
pub mod results;
pub mod trajectory;

// Re-export commonly used error types
pub use error::{AgentError, EnvironmentError, EpisodeError, RecorderError, SettingsError};
