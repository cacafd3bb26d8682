//! JSON event output
//!
//! Structured JSON lines for command status and robot errors, for external
//! tools that consume machine-readable output instead of log text.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp as f64 seconds since UNIX epoch with consistent precision.
pub fn current_timestamp() -> f64 {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();

    // Round to 6 decimal places for consistent formatting
    (timestamp * 1_000_000.0).round() / 1_000_000.0
}

/// Command execution status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Completed,
    Failed,
}

/// Command status event output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStatusEvent {
    /// Timestamp when the event occurred
    pub timestamp: f64,
    /// Event type for JSON parsing
    #[serde(rename = "type")]
    pub event_type: String,
    /// Dashboard command the event refers to
    pub command: String,
    /// Outcome of the command
    pub status: CommandStatus,
    /// Human-readable message
    pub message: String,
}

/// Robot error event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Timestamp when the error was observed
    pub timestamp: f64,
    /// Event type for JSON parsing
    #[serde(rename = "type")]
    pub event_type: String,
    /// Firmware error code
    pub code: i32,
    /// Error description
    pub error: String,
}

impl CommandStatusEvent {
    pub fn completed(command: &str) -> Self {
        Self {
            timestamp: current_timestamp(),
            event_type: "command_status".to_string(),
            command: command.to_string(),
            status: CommandStatus::Completed,
            message: "Command accepted by robot".to_string(),
        }
    }

    pub fn failed(command: &str, error: &str) -> Self {
        Self {
            timestamp: current_timestamp(),
            event_type: "command_status".to_string(),
            command: command.to_string(),
            status: CommandStatus::Failed,
            message: error.to_string(),
        }
    }
}

impl ErrorEvent {
    /// Event for an error code observed on the robot.
    pub fn robot_error(code: i32) -> Self {
        Self {
            timestamp: current_timestamp(),
            event_type: "robot_error".to_string(),
            code,
            error: format!("Robot reports active error {code}"),
        }
    }
}

/// Output a JSON event to stdout
pub fn output_event<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{}", json);
    }
}
