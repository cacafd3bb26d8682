//! Encoding and decoding of dashboard protocol text
//!
//! Requests render as `Name(arg1,arg2,...)`, with pose and joint targets as
//! brace-delimited six-value groups (`joint={j1,j2,j3,j4,j5,j6}`). Replies
//! are comma-separated; the first token is the firmware status code and the
//! rest are command-specific payload fields. The firmware wraps payload
//! fields in a brace group and echoes the command after them
//! (`0,{...},GetPose()`), so the decoder accepts both that shape and the
//! bare comma-separated one.

use crate::{DashboardError, Result};
use regex::Regex;
use std::fmt;

/// One outgoing dashboard command.
///
/// Immutable once built; arguments render in insertion order. No escaping
/// is performed, so argument values must not contain the `,`, `(`, `)`,
/// `{`, or `}` delimiters.
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Append a plain positional argument.
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Append a `key=value` argument.
    pub fn keyed(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("{key}={value}"));
        self
    }

    /// Append a brace-delimited six-value group, e.g. `joint={...}`.
    pub fn braced(mut self, key: &str, values: &[f64; 6]) -> Self {
        let list = values
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.args.push(format!("{key}={{{list}}}"));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the command as protocol text.
    pub fn encode(&self) -> String {
        format!("{}({})", self.name, self.args.join(","))
    }
}

/// One decoded reply: firmware status code plus raw payload fields.
///
/// Fields are kept as untyped strings; different commands return different
/// shapes, so numeric conversion is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: i32,
    pub fields: Vec<String>,
    raw: String,
}

impl Response {
    /// The reply text as it came off the wire, for diagnostics.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Parse field `index` as a floating-point value.
    pub fn numeric_field(&self, index: usize) -> Result<f64> {
        let field = self.fields.get(index).ok_or_else(|| {
            DashboardError::MalformedReply(format!("missing field {index} in reply: {}", self.raw))
        })?;
        field.parse().map_err(|_| {
            DashboardError::MalformedReply(format!(
                "field {index} is not numeric ({field}) in reply: {}",
                self.raw
            ))
        })
    }

    /// Parse the first six fields as a numeric six-tuple.
    pub fn six_values(&self) -> Result<[f64; 6]> {
        let mut values = [0.0; 6];
        for (index, slot) in values.iter_mut().enumerate() {
            *slot = self.numeric_field(index)?;
        }
        Ok(values)
    }
}

/// Encoder/decoder for the dashboard wire format.
pub struct Codec {
    braced_group: Regex,
}

impl Codec {
    pub fn new() -> Result<Self> {
        Ok(Self {
            braced_group: Regex::new(r"\{([^{}]*)\}")?,
        })
    }

    /// Render a command as wire bytes.
    pub fn encode(&self, command: &Command) -> String {
        command.encode()
    }

    /// Decode a raw reply into a status code and payload fields.
    ///
    /// Fails with `MalformedReply` when the status token is not an integer
    /// or fewer than `min_fields` payload fields are present.
    pub fn decode(&self, raw: &str, min_fields: usize) -> Result<Response> {
        let trimmed = raw.trim().trim_end_matches(';').trim_end();
        if trimmed.is_empty() {
            return Err(DashboardError::MalformedReply("empty reply".to_string()));
        }

        let (status_text, rest) = match trimmed.split_once(',') {
            Some((status, rest)) => (status, Some(rest)),
            None => (trimmed, None),
        };
        let status = status_text.trim().parse::<i32>().map_err(|_| {
            DashboardError::MalformedReply(format!("status code is not an integer: {raw}"))
        })?;

        // The first brace group is the payload; anything after it is the
        // command echo. Without braces every remaining token is payload.
        let fields: Vec<String> = if let Some(captures) = self.braced_group.captures(trimmed) {
            captures[1]
                .split(',')
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty())
                .collect()
        } else {
            rest.map(|rest| rest.split(',').map(|field| field.trim().to_string()).collect())
                .unwrap_or_default()
        };

        if fields.len() < min_fields {
            return Err(DashboardError::MalformedReply(format!(
                "expected at least {min_fields} fields, got {}: {raw}",
                fields.len()
            )));
        }

        Ok(Response {
            status,
            fields,
            raw: raw.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorState, JointAngles, Pose};

    fn codec() -> Codec {
        Codec::new().unwrap()
    }

    #[test]
    fn encodes_niladic_commands() {
        assert_eq!(Command::new("PowerOn").encode(), "PowerOn()");
        assert_eq!(Command::new("GetPose").encode(), "GetPose()");
    }

    #[test]
    fn speed_factor_encodes_the_exact_percentage() {
        for percent in [0u8, 1, 50, 99, 100] {
            let encoded = Command::new("SpeedFactor").arg(percent).encode();
            assert_eq!(encoded, format!("SpeedFactor({percent})"));
        }
    }

    #[test]
    fn collision_level_encodes_the_exact_level() {
        for level in 0u8..=5 {
            let encoded = Command::new("SetCollisionLevel").arg(level).encode();
            assert_eq!(encoded, format!("SetCollisionLevel({level})"));
        }
    }

    #[test]
    fn encodes_joint_move_as_braced_group() {
        let joints = JointAngles::new(10.0, 20.0, 30.0, 40.0, 50.0, 60.0);
        let encoded = Command::new("MovJ").braced("joint", &joints.as_array()).encode();
        assert_eq!(encoded, "MovJ(joint={10,20,30,40,50,60})");
    }

    #[test]
    fn encodes_linear_move_with_speed() {
        let pose = Pose::new(100.0, 0.0, 50.5, 0.0, 0.0, 180.0);
        let encoded = Command::new("MovL")
            .braced("pose", &pose.as_array())
            .keyed("v", 30)
            .encode();
        assert_eq!(encoded, "MovL(pose={100,0,50.5,0,0,180},v=30)");
    }

    #[test]
    fn joint_move_round_trips_through_the_wire_text() {
        let joints = JointAngles::new(10.0, 20.0, 30.0, 40.0, 50.0, 60.0);
        let encoded = Command::new("MovJ").braced("joint", &joints.as_array()).encode();

        // Recover the six values from the literal command text.
        let captures = codec().braced_group.captures(&encoded).unwrap();
        let recovered: Vec<f64> = captures[1]
            .split(',')
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(recovered, joints.as_array());
    }

    #[test]
    fn decodes_bare_pose_reply() {
        let response = codec().decode("0,12.5,-3.2,100.0,0.0,0.0,180.0", 6).unwrap();
        assert_eq!(response.status, 0);
        let pose = Pose::from_array(response.six_values().unwrap());
        assert_eq!(pose, Pose::new(12.5, -3.2, 100.0, 0.0, 0.0, 180.0));
    }

    #[test]
    fn decodes_firmware_pose_reply_with_echo() {
        let raw = "0,{12.5,-3.2,100.0,0.0,0.0,180.0},GetPose();";
        let response = codec().decode(raw, 6).unwrap();
        assert_eq!(response.status, 0);
        let pose = Pose::from_array(response.six_values().unwrap());
        assert_eq!(pose, Pose::new(12.5, -3.2, 100.0, 0.0, 0.0, 180.0));
    }

    #[test]
    fn rejects_pose_reply_with_too_few_fields() {
        let result = codec().decode("0,12.5,-3.2", 6);
        assert!(matches!(result, Err(DashboardError::MalformedReply(_))));
    }

    #[test]
    fn rejects_non_integer_status() {
        let result = codec().decode("ERROR: no robot", 0);
        assert!(matches!(result, Err(DashboardError::MalformedReply(_))));
        let result = codec().decode("", 0);
        assert!(matches!(result, Err(DashboardError::MalformedReply(_))));
    }

    #[test]
    fn rejects_non_numeric_payload_field() {
        let response = codec().decode("0,12.5,oops,1,2,3,4", 6).unwrap();
        assert!(matches!(
            response.six_values(),
            Err(DashboardError::MalformedReply(_))
        ));
    }

    #[test]
    fn status_only_reply_maps_to_error_state() {
        let clear = codec().decode("0", 0).unwrap();
        assert_eq!(ErrorState::from_status(clear.status), ErrorState::Clear);

        let active = codec().decode("-1", 0).unwrap();
        assert_eq!(ErrorState::from_status(active.status), ErrorState::Active(-1));
    }

    #[test]
    fn empty_brace_group_yields_no_fields() {
        let response = codec().decode("0,{},EnableRobot()", 0).unwrap();
        assert_eq!(response.status, 0);
        assert!(response.fields.is_empty());
    }
}
