//! Dashboard protocol client for Dobot CR-series collaborative arms
//!
//! Speaks the line-oriented dashboard protocol over a single persistent TCP
//! connection (port 29999): power and safety configuration, pose and error
//! queries, and joint-space, linear, and inverse-kinematics-resolved
//! motion. Every operation is one synchronous request/response round trip;
//! the protocol carries no request identifiers, so the client serializes
//! all traffic on the connection.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dobot_dash::{DashboardClient, JointAngles, MovementConfig};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let robot = DashboardClient::connect("192.168.5.1", 29999, Duration::from_secs(5))?;
//!     robot.commission(&MovementConfig::default())?;
//!
//!     robot.move_joint(&JointAngles::new(-350.0, -10.0, -135.0, 50.0, 90.0, 320.0), None)?;
//!     if let Some(code) = robot.check_and_clear()?.code() {
//!         eprintln!("robot reported error {code}");
//!     }
//!
//!     robot.decommission();
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **DashboardClient**: owns the connection, serializes round trips, and
//!   exposes the typed operations
//! - **Transport**: TCP socket with terminator-framed, buffered reads
//! - **Codec / Command / Response**: wire-format encoding and decoding
//! - **Pose / JointAngles / ErrorState**: typed protocol values
//! - **Config**: YAML robot configuration

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod motion;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

// High-level exports for easy usage
pub use client::DashboardClient;
pub use config::{Config, ConnectionConfig, MovementConfig, PortConfig, RobotConfig};
pub use error::{DashboardError, Result};
pub use types::{ErrorState, JointAngles, Pose};

// Core component exports for advanced usage
pub use codec::{Codec, Command, Response};
pub use events::{CommandStatus, CommandStatusEvent, ErrorEvent};
pub use transport::Transport;
