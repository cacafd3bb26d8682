//! Dashboard protocol client
//!
//! Owns the one TCP connection a session is allowed and serializes every
//! command/response round trip through it. The protocol carries no request
//! identifiers, so overlapping requests cannot be attributed; a call made
//! while another is in flight fails with `Busy` instead of interleaving on
//! the wire.

use crate::codec::{Codec, Command, Response};
use crate::config::{MovementConfig, RobotConfig};
use crate::transport::Transport;
use crate::types::{ErrorState, Pose};
use crate::{DashboardError, Result};
use std::sync::{Mutex, TryLockError};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Synchronous client for the robot's dashboard port.
///
/// Every public operation is one blocking request/response round trip.
/// Replies to motion commands acknowledge receipt, not completion.
pub struct DashboardClient {
    transport: Mutex<Transport>,
    codec: Codec,
}

impl DashboardClient {
    /// Connect to the robot's dashboard port.
    pub fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let transport = Transport::connect(host, port, timeout)?;
        info!("Dashboard session open at {}:{}", host, port);
        Ok(Self {
            transport: Mutex::new(transport),
            codec: Codec::new()?,
        })
    }

    /// Connect using a loaded robot configuration.
    pub fn from_config(config: &RobotConfig) -> Result<Self> {
        Self::connect(
            &config.host,
            config.ports.dashboard,
            config.connection.timeout(),
        )
    }

    /// Run one command/response round trip.
    ///
    /// The transport is held for the whole encode, send, receive, decode
    /// span. On a reply timeout the connection is closed rather than
    /// reused: a stray late reply could be misattributed to the next
    /// command.
    pub(crate) fn round_trip(&self, command: &Command, min_fields: usize) -> Result<Response> {
        let mut transport = match self.transport.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => return Err(DashboardError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let encoded = self.codec.encode(command);
        debug!("-> {}", encoded);
        transport.send(encoded.as_bytes())?;

        let raw = match transport.read_reply() {
            Ok(raw) => raw,
            Err(e) => {
                if matches!(e, DashboardError::Timeout) {
                    warn!("Reply to {} timed out, closing connection", command.name());
                    transport.close();
                }
                return Err(e);
            }
        };
        debug!("<- {}", raw);

        self.codec.decode(&raw, min_fields)
    }

    /// Round trip that fails with `Protocol` when the firmware reports a
    /// nonzero status code.
    pub(crate) fn checked(&self, command: &Command) -> Result<Response> {
        let response = self.round_trip(command, 0)?;
        if response.status != 0 {
            return Err(DashboardError::Protocol {
                command: command.name().to_string(),
                code: response.status,
                reply: response.raw().to_string(),
            });
        }
        Ok(response)
    }

    // ---- power and safety configuration ----

    /// Power on the robot arm.
    pub fn power_on(&self) -> Result<()> {
        self.checked(&Command::new("PowerOn")).map(|_| ())
    }

    /// Enable the robot for motion.
    pub fn enable_robot(&self) -> Result<()> {
        self.checked(&Command::new("EnableRobot")).map(|_| ())
    }

    /// Disable the robot.
    pub fn disable_robot(&self) -> Result<()> {
        self.checked(&Command::new("DisableRobot")).map(|_| ())
    }

    /// Set the global speed factor in percent.
    ///
    /// Accepts 0-100; out-of-range values are rejected here and never sent
    /// to the robot.
    pub fn set_speed_factor(&self, percent: u8) -> Result<()> {
        if percent > 100 {
            return Err(DashboardError::InvalidArgument(format!(
                "speed factor {percent} out of range 0-100"
            )));
        }
        self.checked(&Command::new("SpeedFactor").arg(percent))
            .map(|_| ())
    }

    /// Set collision detection sensitivity.
    ///
    /// Accepts 0-5, where 0 disables collision detection; out-of-range
    /// values are rejected here and never sent to the robot.
    pub fn set_collision_level(&self, level: u8) -> Result<()> {
        if level > 5 {
            return Err(DashboardError::InvalidArgument(format!(
                "collision level {level} out of range 0-5"
            )));
        }
        self.checked(&Command::new("SetCollisionLevel").arg(level))
            .map(|_| ())
    }

    // ---- state queries ----

    /// Get the current Cartesian pose of the tool center point.
    pub fn get_pose(&self) -> Result<Pose> {
        let response = self.round_trip(&Command::new("GetPose"), 6)?;
        if response.status != 0 {
            return Err(DashboardError::Protocol {
                command: "GetPose".to_string(),
                code: response.status,
                reply: response.raw().to_string(),
            });
        }
        Ok(Pose::from_array(response.six_values()?))
    }

    /// Query the robot's error state.
    pub fn get_error_id(&self) -> Result<ErrorState> {
        let response = self.round_trip(&Command::new("GetErrorID"), 0)?;
        Ok(ErrorState::from_status(response.status))
    }

    /// Clear an active error alarm.
    ///
    /// The robot stays in the error state until a later query confirms a
    /// zero status; callers decide when to re-query.
    pub fn clear_error(&self) -> Result<()> {
        self.checked(&Command::new("ClearError")).map(|_| ())
    }

    /// Query the error state once; when an error is active, report it and
    /// issue a clear.
    ///
    /// Returns the state observed before clearing, so the caller can see
    /// which error occurred.
    pub fn check_and_clear(&self) -> Result<ErrorState> {
        let state = self.get_error_id()?;
        if let ErrorState::Active(code) = state {
            warn!("Robot reports active error {}, clearing", code);
            self.clear_error()?;
        }
        Ok(state)
    }

    // ---- commissioning sequences ----

    /// Bring the arm to an operational state: power on, enable, then apply
    /// the configured speed factor and collision sensitivity.
    pub fn commission(&self, movement: &MovementConfig) -> Result<()> {
        info!("Commissioning robot arm");
        self.power_on()?;
        self.enable_robot()?;
        self.set_speed_factor(movement.speed_factor)?;
        self.set_collision_level(movement.collision_level)?;
        info!(
            "Robot ready (speed factor {}%, collision level {})",
            movement.speed_factor, movement.collision_level
        );
        Ok(())
    }

    /// Best-effort shutdown: clear any active error and disable the arm.
    pub fn decommission(&self) {
        info!("Disabling robot arm");
        if let Err(e) = self.clear_error() {
            warn!("Clear error on shutdown failed: {}", e);
        }
        if let Err(e) = self.disable_robot() {
            warn!("Disable on shutdown failed: {}", e);
        }
    }

    /// Close the underlying connection. Safe to call more than once.
    pub fn close(&self) {
        let mut transport = match self.transport.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        transport.close();
    }
}
