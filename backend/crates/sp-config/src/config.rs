use crate::{
    ActivityConfig, AuthConfig, ConfigError, ConfigErrorResult, DatabaseConfig, LoggingConfig,
    PresenceConfig, ServerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub presence: PresenceConfig,
    pub activity: ActivityConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for SP_CONFIG_DIR env var, else use ./.sp/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply SP_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SP_CONFIG_DIR env var > ./.sp/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var("SP_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".sp"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.presence.validate()?;
        self.activity.validate()?;

        // Deduplicated writes must still keep online users online
        if self.activity.dedup_window_secs >= self.presence.online_threshold_secs {
            return Err(ConfigError::config(format!(
                "activity.dedup_window_secs ({}) must be less than presence.online_threshold_secs ({})",
                self.activity.dedup_window_secs, self.presence.online_threshold_secs
            )));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!("  database: {}", self.database.path);
        info!(
            "  auth: {}",
            if self.auth.jwt_secret.is_some() {
                "HS256"
            } else {
                "none (activity recording disabled)"
            }
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
        info!(
            "  presence: max {} connections/role, tick={}s, online<={}s, send timeout={}ms, buffer={}",
            self.presence.max_connections_per_role,
            self.presence.broadcast_interval_secs,
            self.presence.online_threshold_secs,
            self.presence.send_timeout_ms,
            self.presence.send_buffer_size
        );
        info!(
            "  activity: write timeout={}ms, dedup window={}s",
            self.activity.write_timeout_ms, self.activity.dedup_window_secs
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("SP_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("SP_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("SP_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_option_string("SP_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);

        // Logging
        Self::apply_env_parse("SP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SP_LOG_FILE", &mut self.logging.file);

        // Presence
        Self::apply_env_parse(
            "SP_PRESENCE_MAX_CONNECTIONS",
            &mut self.presence.max_connections_per_role,
        );
        Self::apply_env_parse(
            "SP_PRESENCE_BROADCAST_INTERVAL_SECS",
            &mut self.presence.broadcast_interval_secs,
        );
        Self::apply_env_parse(
            "SP_PRESENCE_ONLINE_THRESHOLD_SECS",
            &mut self.presence.online_threshold_secs,
        );
        Self::apply_env_parse(
            "SP_PRESENCE_SEND_TIMEOUT_MS",
            &mut self.presence.send_timeout_ms,
        );
        Self::apply_env_parse(
            "SP_PRESENCE_SEND_BUFFER_SIZE",
            &mut self.presence.send_buffer_size,
        );
        Self::apply_env_parse(
            "SP_PRESENCE_STATUS_ROW_LIMIT",
            &mut self.presence.status_row_limit,
        );

        // Activity
        Self::apply_env_parse(
            "SP_ACTIVITY_WRITE_TIMEOUT_MS",
            &mut self.activity.write_timeout_ms,
        );
        Self::apply_env_parse(
            "SP_ACTIVITY_DEDUP_WINDOW_SECS",
            &mut self.activity.dedup_window_secs,
        );
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
