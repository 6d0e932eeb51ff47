//! Environment boundary: the stateful desktop the agent acts on.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EnvironmentError;

/// Task configuration for one benchmark example, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Example(pub Value);

impl Example {
    /// Returns the example's `id` field, if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}

/// Snapshot of environment state (screenshot, accessibility tree, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Observation(pub Value);

/// A single command for the environment to execute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub Value);

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(code) => f.write_str(code),
            other => write!(f, "{}", other),
        }
    }
}

/// Result of executing one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Observation after the action. `None` when the environment could not
    /// capture one.
    pub observation: Option<Observation>,
    pub reward: f64,
    pub done: bool,
    #[serde(default)]
    pub info: Map<String, Value>,
}

/// Trait for environment implementations.
///
/// Every call blocks the episode until it returns; the controller issues at
/// most one call at a time.
#[async_trait]
pub trait Environment: Send {
    /// Resets the environment, loading `task_config` when given.
    async fn reset(
        &mut self,
        task_config: Option<&Example>,
    ) -> Result<Option<Observation>, EnvironmentError>;

    /// Captures the current observation without acting. Called after the
    /// recovery delay when the last observation was missing.
    async fn observe(&mut self) -> Result<Option<Observation>, EnvironmentError>;

    /// Executes one action, then waits `post_delay` before observing.
    async fn step(
        &mut self,
        action: &Action,
        post_delay: Duration,
    ) -> Result<StepOutcome, EnvironmentError>;

    /// Scores the current state against the example's success criteria.
    async fn evaluate(&mut self) -> Result<f64, EnvironmentError>;

    /// Runs a named agent on the environment side until it finishes.
    async fn run_agent(
        &mut self,
        agent_name: &str,
        instruction: &str,
        settings: &Value,
    ) -> Result<(), EnvironmentError>;

    /// Applies an agent-provided side-channel update (e.g. screen scaling).
    /// Not an environment step.
    async fn update_computer(&mut self, args: &Map<String, Value>) -> Result<(), EnvironmentError>;

    /// Changes the display resolution. Must fail if the host cannot comply.
    async fn configure_display(&mut self, width: u32, height: u32)
        -> Result<(), EnvironmentError>;

    /// Closes the current virtual desktop and opens a fresh one so input
    /// lands on a clean workspace.
    async fn prepare_input_focus(&mut self) -> Result<(), EnvironmentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_example_id() {
        let example = Example(json!({"id": "notepad-001", "instruction": "Open notepad"}));
        assert_eq!(example.id(), Some("notepad-001"));
        assert_eq!(Example(json!({})).id(), None);
    }

    #[test]
    fn test_action_display() {
        let code = Action(json!("pyautogui.click(10, 20)"));
        assert_eq!(code.to_string(), "pyautogui.click(10, 20)");

        let structured = Action(json!({"action_type": "DONE"}));
        assert_eq!(structured.to_string(), r#"{"action_type":"DONE"}"#);
    }

    #[test]
    fn test_step_outcome_info_defaults() {
        let outcome: StepOutcome =
            serde_json::from_value(json!({"observation": null, "reward": 0.0, "done": false}))
                .unwrap();
        assert!(outcome.observation.is_none());
        assert!(outcome.info.is_empty());
    }
}
