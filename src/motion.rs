//! Motion commands
//!
//! Joint-space, Cartesian-linear, and inverse-kinematics-resolved moves.
//! The robot interpolates and executes the motion itself; the reply only
//! acknowledges that the command was accepted. None of these operations
//! are retried on failure, since resending a motion command could move the
//! arm twice.

use crate::client::DashboardClient;
use crate::codec::Command;
use crate::types::{JointAngles, Pose};
use crate::{DashboardError, Result};
use tracing::debug;

impl DashboardClient {
    /// Joint-space move to the given target angles.
    ///
    /// An optional speed ratio (1-100 percent) is appended as the `v`
    /// parameter when given.
    pub fn move_joint(&self, joints: &JointAngles, speed: Option<u8>) -> Result<()> {
        let mut command = Command::new("MovJ").braced("joint", &joints.as_array());
        if let Some(ratio) = speed {
            validate_speed_ratio(ratio)?;
            command = command.keyed("v", ratio);
        }
        self.checked(&command).map(|_| ())
    }

    /// Cartesian move along a straight tool path to the target pose.
    pub fn move_linear(&self, pose: &Pose, speed: u8) -> Result<()> {
        validate_speed_ratio(speed)?;
        let command = Command::new("MovL")
            .braced("pose", &pose.as_array())
            .keyed("v", speed);
        self.checked(&command).map(|_| ())
    }

    /// Joint-interpolated move to a Cartesian target.
    ///
    /// The robot resolves the kinematics internally for this variant.
    pub fn move_joint_to_pose(&self, pose: &Pose) -> Result<()> {
        let command = Command::new("MovJ").braced("pose", &pose.as_array());
        self.checked(&command).map(|_| ())
    }

    /// Ask the robot to solve inverse kinematics for a Cartesian target.
    ///
    /// A nonzero status means the pose has no valid joint solution; the
    /// reply fields must not be interpreted as joint angles in that case.
    pub fn solve_inverse_kinematics(&self, pose: &Pose) -> Result<JointAngles> {
        let [x, y, z, rx, ry, rz] = pose.as_array();
        let command = Command::new("InverseKin")
            .arg(x)
            .arg(y)
            .arg(z)
            .arg(rx)
            .arg(ry)
            .arg(rz);

        let response = self.round_trip(&command, 0)?;
        if response.status != 0 {
            return Err(DashboardError::InverseKinematics {
                code: response.status,
                reply: response.raw().to_string(),
            });
        }

        let joints = JointAngles::from_array(response.six_values()?);
        debug!("IK solution for {:?}: {:?}", pose, joints);
        Ok(joints)
    }

    /// Move to a Cartesian target by resolving joint angles through the
    /// robot's inverse kinematics, then joint-moving to the solution.
    ///
    /// When the solve fails, no motion command is issued.
    pub fn move_via_inverse_kinematics(&self, pose: &Pose) -> Result<()> {
        let joints = self.solve_inverse_kinematics(pose)?;
        self.move_joint(&joints, None)
    }
}

fn validate_speed_ratio(ratio: u8) -> Result<()> {
    if ratio == 0 || ratio > 100 {
        return Err(DashboardError::InvalidArgument(format!(
            "speed ratio {ratio} out of range 1-100"
        )));
    }
    Ok(())
}
