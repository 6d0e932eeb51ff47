//! Trajectory data types for episode recording.
//!
//! A trajectory is the ordered list of events the controller hands to the
//! recorder: one `init`, one `step` per executed action, one `end`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::episode::environment::{Action, Example, Observation};

/// Timestamp layout used for init and action timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d@%H%M%S";

/// Everything known about one executed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Observation after the action, if the environment produced one.
    pub observation: Option<Observation>,

    /// Agent logs from the prediction that produced this action.
    pub logs: Value,

    /// Outer-loop iteration the action belongs to (0-indexed).
    pub step_index: usize,

    /// Wall-clock time just before the action ran.
    pub action_timestamp: String,

    /// Time since episode start, just before the action ran.
    pub elapsed_timestamp: String,

    pub action: Action,

    pub reward: f64,

    pub done: bool,

    #[serde(default)]
    pub info: Map<String, Value>,
}

/// One line of a persisted trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrajectoryEvent {
    /// Episode start.
    Init {
        trajectory_id: Uuid,
        example: Example,
        observation: Option<Observation>,
        timestamp: String,
    },

    /// One executed action.
    Step(StepRecord),

    /// Episode end.
    End {
        score: f64,
        start_time: DateTime<Local>,
        duration_seconds: f64,
        steps_recorded: usize,
    },
}

/// Formats a wall-clock time as `YYYYmmdd@HHMMSS`.
pub fn format_timestamp(time: DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Formats an elapsed duration as `H:MM:SS[.ffffff]`.
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total_micros = elapsed.num_microseconds().unwrap_or(i64::MAX).max(0);
    let micros = total_micros % 1_000_000;
    let total_secs = total_micros / 1_000_000;
    let (hours, minutes, seconds) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);

    if micros == 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}:{:02}.{:06}", hours, minutes, seconds, micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_format_timestamp() {
        let time = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_timestamp(time), "20240307@090502");
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(chrono::Duration::seconds(5)), "0:00:05");
        assert_eq!(
            format_elapsed(chrono::Duration::milliseconds(3_723_250)),
            "1:02:03.250000"
        );
        assert_eq!(format_elapsed(chrono::Duration::seconds(-3)), "0:00:00");
    }

    #[test]
    fn test_step_event_serialization() {
        let event = TrajectoryEvent::Step(StepRecord {
            observation: None,
            logs: json!({"plan": "click start"}),
            step_index: 2,
            action_timestamp: "20240307@090502".to_string(),
            elapsed_timestamp: "0:00:05".to_string(),
            action: Action(json!("pyautogui.click(1, 1)")),
            reward: 0.0,
            done: false,
            info: Map::new(),
        });

        let line = serde_json::to_value(&event).unwrap();
        assert_eq!(line["type"], "step");
        assert_eq!(line["step_index"], 2);
        assert_eq!(line["action"], "pyautogui.click(1, 1)");

        let parsed: TrajectoryEvent = serde_json::from_value(line).unwrap();
        assert_eq!(parsed, event);
    }
}
