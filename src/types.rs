//! Value types exchanged with the robot
//!
//! Poses and joint configurations travel over the wire as six-value
//! brace-delimited lists; error state is derived from the status code of
//! whichever reply reported it.

use serde::{Deserialize, Serialize};

/// Cartesian pose of the tool center point.
///
/// Position in millimeters, orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, z: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self { x, y, z, rx, ry, rz }
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        let [x, y, z, rx, ry, rz] = values;
        Self { x, y, z, rx, ry, rz }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.x, self.y, self.z, self.rx, self.ry, self.rz]
    }
}

/// Joint-space configuration, J1 through J6 in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub j1: f64,
    pub j2: f64,
    pub j3: f64,
    pub j4: f64,
    pub j5: f64,
    pub j6: f64,
}

impl JointAngles {
    pub fn new(j1: f64, j2: f64, j3: f64, j4: f64, j5: f64, j6: f64) -> Self {
        Self { j1, j2, j3, j4, j5, j6 }
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        let [j1, j2, j3, j4, j5, j6] = values;
        Self { j1, j2, j3, j4, j5, j6 }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [self.j1, self.j2, self.j3, self.j4, self.j5, self.j6]
    }
}

/// Robot error state as observed by a single status query.
///
/// Not stored anywhere; the robot is the source of truth and the state is
/// re-derived on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorState {
    /// No active error alarm.
    Clear,
    /// An error alarm with the given firmware error code is active.
    Active(i32),
}

impl ErrorState {
    pub fn from_status(code: i32) -> Self {
        if code == 0 {
            ErrorState::Clear
        } else {
            ErrorState::Active(code)
        }
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, ErrorState::Clear)
    }

    /// The active error code, if any.
    pub fn code(&self) -> Option<i32> {
        match self {
            ErrorState::Clear => None,
            ErrorState::Active(code) => Some(*code),
        }
    }
}
