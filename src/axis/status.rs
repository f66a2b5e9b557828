use serde::{Deserialize, Serialize};

use super::limit_switches::LimitSwitches;
use super::state::MotionState;

/// One axis's motion/fault/limit status, derived fresh on every state
/// query and never cached beyond one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisStatus {
    pub state: MotionState,
    pub limit_switches: LimitSwitches,
    /// Raw reply text, kept when the controller sent state or limit words
    /// this client could not map.
    pub message: Option<String>,
}

impl AxisStatus {
    pub fn new(state: MotionState, limit_switches: LimitSwitches) -> Self {
        Self {
            state,
            limit_switches,
            message: None,
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }

    pub fn is_moving(&self) -> bool {
        self.state == MotionState::Moving
    }

    pub fn is_faulted(&self) -> bool {
        self.state == MotionState::Fault
    }

    pub fn is_ready(&self) -> bool {
        self.state == MotionState::On && !self.limit_switches.any_active()
    }
}
