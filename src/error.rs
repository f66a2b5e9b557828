use std::time::Duration;

use thiserror::Error;

use crate::protocol::response::ParseError;

/// Everything a client operation can fail with. Cloneable so that
/// monitor ticks can carry the errors they suppressed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Socket unreachable or broken mid-exchange. Recoverable: the next
    /// call on the channel reconnects.
    #[error("connection error: {0}")]
    Connection(String),

    /// The controller answered with an explicit `Error:` reply. Carried
    /// verbatim, never retried automatically.
    #[error("controller error: {0}")]
    Protocol(String),

    /// The reply did not match the expected grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Axis index outside `[0, axis_count)`. Rejected before any I/O.
    #[error("axis {axis} out of range (controller has {axis_count} axes)")]
    InvalidAxis { axis: usize, axis_count: usize },

    /// `wait_for_motion_complete` exceeded its bound. The physical motion
    /// may still be ongoing; issue `stop` explicitly to halt it.
    #[error("axis {axis} still moving after {timeout:?}")]
    MotionTimeout { axis: usize, timeout: Duration },

    /// An acknowledgement was expected but the controller replied with
    /// something other than `OK`.
    #[error("command `{command}` rejected, controller replied `{reply}`")]
    CommandRejected { command: String, reply: String },

    /// Move target outside the configured per-axis travel range. Rejected
    /// by the plugin adapter before any I/O.
    #[error("target {target} for axis {axis} outside [{lower}, {upper}]")]
    TargetOutOfBounds {
        axis: usize,
        target: f64,
        lower: f64,
        upper: f64,
    },
}
