//! Agent capabilities understood by the episode controller.
//!
//! An agent is handed to the controller already tagged with the way it
//! runs:
//! 1. Stepwise agents predict batches of actions the controller executes
//! 2. Server agents are run by the environment itself
//! 3. Conversational agents drive a whole multi-turn session in one call

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::environment::{Action, Observation};
use crate::error::AgentError;

/// Execution modes, one per agent capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Controller-driven predict/act loop.
    Stepwise,
    /// Environment-driven run of a named agent.
    ServerDelegated,
    /// Single blocking multi-turn session.
    Conversational,
}

impl ExecutionMode {
    /// Returns the display name for this mode.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExecutionMode::Stepwise => "stepwise",
            ExecutionMode::ServerDelegated => "server-delegated",
            ExecutionMode::Conversational => "conversational",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Output of one stepwise prediction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Raw model response.
    pub response: String,
    /// Actions to execute, in order.
    pub actions: Vec<Action>,
    /// Agent-side logs forwarded to the trajectory recorder.
    pub logs: Value,
    /// Side-channel update for the environment, applied before acting.
    pub environment_update: Option<Map<String, Value>>,
}

impl Prediction {
    /// Creates a prediction with the given actions and nothing else.
    pub fn with_actions(actions: Vec<Action>) -> Self {
        Self {
            actions,
            ..Self::default()
        }
    }

    /// Returns the environment update, if it carries any arguments.
    pub fn pending_update(&self) -> Option<&Map<String, Value>> {
        self.environment_update
            .as_ref()
            .filter(|args| !args.is_empty())
    }
}

/// Agent that proposes actions one observation at a time.
#[async_trait]
pub trait StepwiseAgent: Send {
    /// Clears any per-episode state.
    fn reset(&mut self);

    /// Proposes the next batch of actions for `observation`.
    async fn predict(
        &mut self,
        instruction: &str,
        observation: &Observation,
    ) -> Result<Prediction, AgentError>;
}

/// Agent that runs a complete multi-turn session per call.
///
/// Session failures are not returned: the agent writes `error.txt` under
/// `debug_path` instead.
#[async_trait]
pub trait ConversationalAgent: Send {
    /// Runs the session for `message`, blocking until it concludes.
    async fn chat(&mut self, message: &str, debug_path: &Path) -> Result<(), AgentError>;
}

/// Agent executed by the environment's own runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerAgent {
    /// Name the environment knows the agent by.
    pub name: String,
    /// Settings forwarded verbatim to the runner.
    #[serde(default)]
    pub settings: Value,
}

impl ServerAgent {
    /// Creates a server agent with empty settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: Value::Object(Map::new()),
        }
    }

    /// Sets the runner settings.
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }
}

/// An agent tagged with its execution capability.
pub enum EpisodeAgent {
    Stepwise(Box<dyn StepwiseAgent>),
    ServerDelegated(ServerAgent),
    Conversational(Box<dyn ConversationalAgent>),
}

impl EpisodeAgent {
    /// Wraps a stepwise agent.
    pub fn stepwise(agent: impl StepwiseAgent + 'static) -> Self {
        Self::Stepwise(Box::new(agent))
    }

    /// Wraps a conversational agent.
    pub fn conversational(agent: impl ConversationalAgent + 'static) -> Self {
        Self::Conversational(Box::new(agent))
    }

    /// Returns the mode this agent runs in.
    pub fn mode(&self) -> ExecutionMode {
        match self {
            EpisodeAgent::Stepwise(_) => ExecutionMode::Stepwise,
            EpisodeAgent::ServerDelegated(_) => ExecutionMode::ServerDelegated,
            EpisodeAgent::Conversational(_) => ExecutionMode::Conversational,
        }
    }
}

impl From<ServerAgent> for EpisodeAgent {
    fn from(agent: ServerAgent) -> Self {
        Self::ServerDelegated(agent)
    }
}

impl std::fmt::Debug for EpisodeAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeAgent::ServerDelegated(agent) => {
                f.debug_tuple("ServerDelegated").field(agent).finish()
            }
            other => f.debug_tuple(other.mode().display_name()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Idle;

    #[async_trait]
    impl ConversationalAgent for Idle {
        async fn chat(&mut self, _message: &str, _debug_path: &Path) -> Result<(), AgentError> {
            Ok(())
        }
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ExecutionMode::Stepwise.to_string(), "stepwise");
        assert_eq!(ExecutionMode::ServerDelegated.to_string(), "server-delegated");
        assert_eq!(
            serde_json::to_string(&ExecutionMode::Conversational).unwrap(),
            r#""conversational""#
        );
    }

    #[test]
    fn test_agent_mode_tagging() {
        let server: EpisodeAgent = ServerAgent::new("navi")
            .with_settings(json!({"model": "gpt-4o"}))
            .into();
        assert_eq!(server.mode(), ExecutionMode::ServerDelegated);
        assert_eq!(EpisodeAgent::conversational(Idle).mode(), ExecutionMode::Conversational);
    }

    #[test]
    fn test_pending_update_ignores_empty_args() {
        let mut prediction = Prediction::with_actions(vec![Action(json!("WAIT"))]);
        assert!(prediction.pending_update().is_none());

        prediction.environment_update = Some(Map::new());
        assert!(prediction.pending_update().is_none());

        let mut args = Map::new();
        args.insert("scale".to_string(), json!(1.5));
        prediction.environment_update = Some(args);
        assert_eq!(prediction.pending_update().map(Map::len), Some(1));
    }
}
