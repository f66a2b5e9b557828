use serde::{Deserialize, Serialize};

/// Controller-reported lifecycle phase of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    On,
    Moving,
    Fault,
    /// The controller sent a state word this client does not know. The raw
    /// text is preserved in `AxisStatus::message`.
    Unknown,
}
