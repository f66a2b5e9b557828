use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub tick_interval: Duration,
    /// Backlog of ticks kept per subscriber before lagging ones miss.
    pub channel_capacity: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            channel_capacity: 16,
        }
    }
}
