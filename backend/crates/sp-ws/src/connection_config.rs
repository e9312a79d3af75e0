use std::time::Duration;

/// Configuration for WebSocket connections
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Outbound queue depth (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// How long a closing connection waits for its writer before aborting it
    pub writer_drain_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 16,
            writer_drain_timeout: Duration::from_secs(5),
        }
    }
}
