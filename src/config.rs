//! Configuration loading for the dashboard client

use crate::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Default host of the emulator image.
pub const EMULATOR_HOST: &str = "192.168.5.1";
/// Default host of a physical robot.
pub const ROBOT_HOST: &str = "192.168.1.1";
/// TCP port of the dashboard control interface.
pub const DASHBOARD_PORT: u16 = 29999;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub robot: RobotConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RobotConfig {
    pub host: String,
    #[serde(default)]
    pub ports: PortConfig,
    #[serde(default)]
    pub movement: MovementConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortConfig {
    pub dashboard: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovementConfig {
    /// Global speed factor applied at commissioning, percent (0-100).
    pub speed_factor: u8,
    /// Collision sensitivity applied at commissioning (0-5, 0 disables).
    pub collision_level: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Connect and reply-read deadline, seconds.
    pub timeout: f64,
    /// Connection attempts made by the caller before giving up.
    pub retry_attempts: u32,
    /// Delay between connection attempts, seconds.
    pub retry_delay: f64,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            dashboard: DASHBOARD_PORT,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed_factor: 50,
            collision_level: 1,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            timeout: 5.0,
            retry_attempts: 3,
            retry_delay: 1.0,
        }
    }
}

impl Config {
    pub fn load_from_path(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("Failed to read {path}: {e}")))?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Ad-hoc configuration for a host, with every other field defaulted.
    pub fn for_host(host: &str) -> Self {
        Self {
            robot: RobotConfig {
                host: host.to_string(),
                ports: PortConfig::default(),
                movement: MovementConfig::default(),
                connection: ConnectionConfig::default(),
            },
        }
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay)
    }
}
