use serde::{Deserialize, Serialize};

/// Per-axis motion settings. The controller reads and writes each field
/// individually; there is no atomic multi-field transaction on the wire,
/// so applying a whole block can partially succeed (see
/// `DeviceClient::apply_settings`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionSettings {
    /// Steps per second, > 0.
    pub velocity: u32,
    pub acceleration: u32,
    pub deceleration: u32,
    /// Tolerance radius within which the axis counts as at target, > 0.
    pub position_window: f64,
    /// Optional per-move time budget in seconds.
    pub time_limit: Option<f64>,
}

impl MotionSettings {
    pub fn with_velocity(mut self, velocity: u32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: u32) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_deceleration(mut self, deceleration: u32) -> Self {
        self.deceleration = deceleration;
        self
    }

    pub fn with_position_window(mut self, position_window: f64) -> Self {
        self.position_window = position_window;
        self
    }

    pub fn with_time_limit(mut self, time_limit: f64) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}

impl Default for MotionSettings {
    fn default() -> Self {
        // Controller firmware defaults.
        Self {
            velocity: 2000,
            acceleration: 500,
            deceleration: 500,
            position_window: 0.001,
            time_limit: None,
        }
    }
}
