use std::time::Duration;

/// Admission and delivery limits of one role's registry
#[derive(Debug, Clone)]
pub struct ConnectionLimits {
    /// Maximum simultaneous connections
    pub max_connections: usize,
    /// Upper bound on queueing one message for one connection
    pub send_timeout: Duration,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_connections: 3000,
            send_timeout: Duration::from_secs(2),
        }
    }
}
