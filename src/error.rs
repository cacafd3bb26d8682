//! Error types for dashboard protocol operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Timed out waiting for robot reply")]
    Timeout,

    #[error("Connection closed by robot")]
    ConnectionClosed,

    #[error("Not connected to robot")]
    NotConnected,

    #[error("Another command is in flight on this connection")]
    Busy,

    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    #[error("Robot rejected {command} with error {code} (reply: {reply})")]
    Protocol {
        command: String,
        code: i32,
        reply: String,
    },

    #[error("Inverse kinematics solve failed with error {code} (reply: {reply})")]
    InverseKinematics { code: i32, reply: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
