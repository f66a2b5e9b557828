use std::time::Duration;

use crate::transport::TransportConfig;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub transport: TransportConfig,
    /// Number of axes the controller drives. Indices are `0..axis_count`.
    pub axis_count: usize,
    /// Poll cadence used by `move_and_wait`.
    pub poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            axis_count: 4,
            poll_interval: Duration::from_millis(100),
        }
    }
}
