use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_WRITE_TIMEOUT_MS: u64 = 10;
pub const MAX_WRITE_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 2000;

/// Activity recording on the request path
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Upper bound for one last-active upsert
    pub write_timeout_ms: u64,
    /// Skip repeat writes for the same user within this window (0 = every request)
    pub dedup_window_secs: u64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            dedup_window_secs: 0,
        }
    }
}

impl ActivityConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.write_timeout_ms < MIN_WRITE_TIMEOUT_MS
            || self.write_timeout_ms > MAX_WRITE_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "activity.write_timeout_ms must be {}-{}, got {}",
                MIN_WRITE_TIMEOUT_MS, MAX_WRITE_TIMEOUT_MS, self.write_timeout_ms
            )));
        }

        Ok(())
    }
}
