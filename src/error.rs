//! Error types for arena-episode operations.
//!
//! Each external collaborator gets its own error enum:
//! - Environment calls (reset, step, evaluate, delegated runs, display setup)
//! - Agent calls (prediction and conversational sessions)
//! - Trajectory recording
//! - Settings loading
//!
//! `EpisodeError` composes them for the controller, which never swallows a
//! collaborator failure.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by an environment implementation.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("Environment reset failed: {0}")]
    Reset(String),

    #[error("Action execution failed: {0}")]
    Step(String),

    #[error("Evaluation failed: {0}")]
    Evaluate(String),

    #[error("Server agent '{agent}' failed: {message}")]
    AgentRun { agent: String, message: String },

    #[error("Computer update rejected: {0}")]
    Update(String),

    #[error("Display cannot be set to {width}x{height}: {reason}")]
    Display {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("Input focus preparation failed: {0}")]
    InputFocus(String),

    #[error("Environment unreachable: {0}")]
    Unreachable(String),
}

/// Errors raised by an agent implementation.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Chat session failed: {0}")]
    Chat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while recording a trajectory.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Recorder used out of order: {0}")]
    OutOfOrder(String),
}

/// Errors raised while loading process settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that abort an episode.
#[derive(Debug, Error)]
pub enum EpisodeError {
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Trajectory error: {0}")]
    Recorder(#[from] RecorderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_error_message() {
        let err = EnvironmentError::Display {
            width: 1440,
            height: 900,
            reason: "mode not supported".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Display cannot be set to 1440x900: mode not supported"
        );
    }

    #[test]
    fn test_episode_error_from_environment() {
        let err: EpisodeError = EnvironmentError::Evaluate("no evaluator".to_string()).into();
        assert!(matches!(err, EpisodeError::Environment(_)));
        assert!(err.to_string().contains("no evaluator"));
    }

    #[test]
    fn test_episode_error_from_agent() {
        let err: EpisodeError = AgentError::Prediction("bad response".to_string()).into();
        assert!(matches!(err, EpisodeError::Agent(AgentError::Prediction(_))));
    }
}
