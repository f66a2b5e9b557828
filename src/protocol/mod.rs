pub mod command;
pub mod response;

pub use command::{Command, Param, Property};

/// Literal acknowledgement the controller sends for move/stop/set commands.
pub const ACK: &str = "OK";

/// Prefix marking an explicit controller-side failure reply.
pub const ERROR_PREFIX: &str = "Error:";
