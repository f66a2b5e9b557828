use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub socket_path: String,
    /// Upper bound on one reply. The protocol has no length prefix; the
    /// controller is trusted to send one complete reply per command.
    pub read_buffer_size: usize,
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            socket_path: "/tmp/slit_controller.sock".to_string(),
            read_buffer_size: 1024,
            connect_timeout: Duration::from_secs(2),
        }
    }
}
