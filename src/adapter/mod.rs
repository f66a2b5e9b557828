//! Mapping toward the host motion framework's vocabulary, plus the
//! pre-move travel-range check the framework plugin performs.

use std::sync::Arc;

use crate::axis::{LimitSwitches, MotionState};
use crate::client::DeviceClient;
use crate::error::ClientError;

/// The host framework's axis state vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAxisState {
    On,
    Moving,
    Fault,
    Unknown,
}

/// Host limit-switch bitmask.
pub const UPPER_LIMIT: u8 = 0b01;
pub const LOWER_LIMIT: u8 = 0b10;

/// Total mapping onto the host state vocabulary.
pub fn host_state(state: MotionState) -> HostAxisState {
    match state {
        MotionState::On => HostAxisState::On,
        MotionState::Moving => HostAxisState::Moving,
        MotionState::Fault => HostAxisState::Fault,
        MotionState::Unknown => HostAxisState::Unknown,
    }
}

/// Total mapping onto the host limit bitmask.
pub fn limit_mask(limit: LimitSwitches) -> u8 {
    match limit {
        LimitSwitches::None => 0,
        LimitSwitches::Upper => UPPER_LIMIT,
        LimitSwitches::Lower => LOWER_LIMIT,
        LimitSwitches::Both => UPPER_LIMIT | LOWER_LIMIT,
    }
}

/// Allowed travel range for one axis, in absolute coordinates.
#[derive(Debug, Clone, Copy)]
pub struct AxisBounds {
    pub lower: f64,
    pub upper: f64,
}

impl AxisBounds {
    pub fn contains(&self, position: f64) -> bool {
        (self.lower..=self.upper).contains(&position)
    }
}

/// Plugin-facing view of the device client. Move targets are checked
/// against the configured bounds before any command is issued.
pub struct PluginAdapter {
    client: Arc<DeviceClient>,
    bounds: Vec<AxisBounds>,
}

impl PluginAdapter {
    pub fn new(client: Arc<DeviceClient>, bounds: Vec<AxisBounds>) -> Self {
        Self { client, bounds }
    }

    pub fn bounds(&self, axis: usize) -> Option<AxisBounds> {
        self.bounds.get(axis).copied()
    }

    pub async fn move_axis(&self, axis: usize, target: f64) -> Result<(), ClientError> {
        if let Some(bounds) = self.bounds.get(axis) {
            if !bounds.contains(target) {
                return Err(ClientError::TargetOutOfBounds {
                    axis,
                    target,
                    lower: bounds.lower,
                    upper: bounds.upper,
                });
            }
        }
        self.client.move_axis(axis, target).await
    }

    pub async fn stop(&self, axis: usize) -> Result<(), ClientError> {
        self.client.stop(axis).await
    }

    /// Axis state in host vocabulary: `(state, limit bitmask)`.
    pub async fn state(&self, axis: usize) -> Result<(HostAxisState, u8), ClientError> {
        let status = self.client.get_state(axis).await?;
        Ok((host_state(status.state), limit_mask(status.limit_switches)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_mapping_is_total_and_fixed() {
        assert_eq!(host_state(MotionState::On), HostAxisState::On);
        assert_eq!(host_state(MotionState::Moving), HostAxisState::Moving);
        assert_eq!(host_state(MotionState::Fault), HostAxisState::Fault);
        assert_eq!(host_state(MotionState::Unknown), HostAxisState::Unknown);
    }

    #[test]
    fn limit_mask_combines_both_switches() {
        assert_eq!(limit_mask(LimitSwitches::None), 0);
        assert_eq!(limit_mask(LimitSwitches::Upper), UPPER_LIMIT);
        assert_eq!(limit_mask(LimitSwitches::Lower), LOWER_LIMIT);
        assert_eq!(limit_mask(LimitSwitches::Both), UPPER_LIMIT | LOWER_LIMIT);
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = AxisBounds {
            lower: -5.0,
            upper: 5.0,
        };
        assert!(bounds.contains(-5.0));
        assert!(bounds.contains(5.0));
        assert!(!bounds.contains(5.1));
    }
}
