use std::time::Duration;

/// Timing of one role's presence broadcaster
#[derive(Debug, Clone)]
pub struct BroadcastConfig {
    /// Pause between ticks
    pub interval: Duration,
    /// Users active within this window are reported online
    pub online_threshold: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            online_threshold: Duration::from_secs(30),
        }
    }
}
