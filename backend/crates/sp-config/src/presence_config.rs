use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Per-role connection ceiling
pub const MIN_MAX_CONNECTIONS: usize = 1;
pub const MAX_MAX_CONNECTIONS: usize = 100_000;
pub const DEFAULT_MAX_CONNECTIONS: usize = 3000;

// Broadcast tick interval (seconds)
pub const MIN_BROADCAST_INTERVAL_SECS: u64 = 1;
pub const MAX_BROADCAST_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_BROADCAST_INTERVAL_SECS: u64 = 10;

// Online threshold (seconds)
pub const MIN_ONLINE_THRESHOLD_SECS: u64 = 1;
pub const MAX_ONLINE_THRESHOLD_SECS: u64 = 86_400;
pub const DEFAULT_ONLINE_THRESHOLD_SECS: u64 = 30;

// Per-connection send timeout (milliseconds)
pub const MIN_SEND_TIMEOUT_MS: u64 = 10;
pub const MAX_SEND_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 2000;

// Per-connection outbound queue
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 1024;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 16;

// Rows in the status endpoint's recent-activity listing
pub const MIN_STATUS_ROW_LIMIT: usize = 1;
pub const MAX_STATUS_ROW_LIMIT: usize = 1000;
pub const DEFAULT_STATUS_ROW_LIMIT: usize = 50;

/// Presence broadcast settings, applied to every tracked role.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Maximum simultaneous push connections per role
    pub max_connections_per_role: usize,
    /// Seconds between presence ticks
    pub broadcast_interval_secs: u64,
    /// A user is online if active within this many seconds
    pub online_threshold_secs: u64,
    /// Upper bound on a single push to one connection
    pub send_timeout_ms: u64,
    /// Outbound queue depth per connection
    pub send_buffer_size: usize,
    /// Row cap for the status endpoint
    pub status_row_limit: usize,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            max_connections_per_role: DEFAULT_MAX_CONNECTIONS,
            broadcast_interval_secs: DEFAULT_BROADCAST_INTERVAL_SECS,
            online_threshold_secs: DEFAULT_ONLINE_THRESHOLD_SECS,
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            status_row_limit: DEFAULT_STATUS_ROW_LIMIT,
        }
    }
}

impl PresenceConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range(
            "presence.max_connections_per_role",
            self.max_connections_per_role,
            MIN_MAX_CONNECTIONS,
            MAX_MAX_CONNECTIONS,
        )?;
        check_range(
            "presence.broadcast_interval_secs",
            self.broadcast_interval_secs,
            MIN_BROADCAST_INTERVAL_SECS,
            MAX_BROADCAST_INTERVAL_SECS,
        )?;
        check_range(
            "presence.online_threshold_secs",
            self.online_threshold_secs,
            MIN_ONLINE_THRESHOLD_SECS,
            MAX_ONLINE_THRESHOLD_SECS,
        )?;
        check_range(
            "presence.send_timeout_ms",
            self.send_timeout_ms,
            MIN_SEND_TIMEOUT_MS,
            MAX_SEND_TIMEOUT_MS,
        )?;
        check_range(
            "presence.send_buffer_size",
            self.send_buffer_size,
            MIN_SEND_BUFFER_SIZE,
            MAX_SEND_BUFFER_SIZE,
        )?;
        check_range(
            "presence.status_row_limit",
            self.status_row_limit,
            MIN_STATUS_ROW_LIMIT,
            MAX_STATUS_ROW_LIMIT,
        )?;

        // A push must finish well within one tick
        if self.send_timeout_ms >= self.broadcast_interval_secs * 1000 {
            return Err(ConfigError::presence(format!(
                "presence.send_timeout_ms ({}) must be less than broadcast_interval_secs ({}s)",
                self.send_timeout_ms, self.broadcast_interval_secs
            )));
        }

        Ok(())
    }
}

fn check_range<T>(name: &str, value: T, min: T, max: T) -> ConfigErrorResult<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ConfigError::presence(format!(
            "{} must be {}-{}, got {}",
            name, min, max, value
        )));
    }

    Ok(())
}
