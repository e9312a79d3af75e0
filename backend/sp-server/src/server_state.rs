use crate::ActivityRecorder;

use sp_auth::IdentityResolver;
use sp_config::Config;
use sp_core::{ActivityStore, UserStore};
use sp_db::SqlitePresenceStore;
use sp_ws::{
    AppState, BroadcastConfig, ConnectionConfig, ConnectionLimits, Metrics, PresenceBroadcaster,
    RoleRegistries, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

/// Everything the HTTP layer shares, built once at startup
#[derive(Clone)]
pub struct ServerState {
    pub ws: AppState,
    pub users: Arc<dyn UserStore>,
    pub activity: Arc<dyn ActivityStore>,
    pub recorder: ActivityRecorder,
    pub pool: SqlitePool,
    pub prometheus: PrometheusHandle,
    pub status_row_limit: usize,
    pub broadcast: BroadcastConfig,
}

impl ServerState {
    pub fn new(
        config: &Config,
        pool: SqlitePool,
        prometheus: PrometheusHandle,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        let store = Arc::new(SqlitePresenceStore::new(pool.clone()));
        let metrics = Metrics::new();

        let identity = match config.auth.jwt_secret {
            Some(ref secret) => {
                info!("JWT: HS256 identity resolution enabled");
                IdentityResolver::with_hs256(secret.as_bytes())
            }
            None => {
                warn!("No JWT secret configured - requests are anonymous and no activity is recorded");
                IdentityResolver::default()
            }
        };

        let presence = &config.presence;
        let registries = RoleRegistries::new(
            ConnectionLimits {
                max_connections: presence.max_connections_per_role,
                send_timeout: Duration::from_millis(presence.send_timeout_ms),
            },
            metrics.clone(),
        );

        let ws = AppState {
            registries,
            identity: identity.clone(),
            metrics: metrics.clone(),
            shutdown,
            config: ConnectionConfig {
                send_buffer_size: presence.send_buffer_size,
                ..ConnectionConfig::default()
            },
        };

        let recorder = ActivityRecorder::new(store.clone(), identity, &config.activity, metrics);

        Self {
            ws,
            users: store.clone(),
            activity: store,
            recorder,
            pool,
            prometheus,
            status_row_limit: presence.status_row_limit,
            broadcast: BroadcastConfig {
                interval: Duration::from_secs(presence.broadcast_interval_secs),
                online_threshold: Duration::from_secs(presence.online_threshold_secs),
            },
        }
    }

    /// Start one presence broadcaster per tracked role; each stops on shutdown
    pub fn spawn_broadcasters(&self) -> Vec<JoinHandle<()>> {
        self.ws
            .registries
            .iter()
            .map(|registry| {
                let broadcaster = PresenceBroadcaster::new(
                    registry.clone(),
                    Arc::clone(&self.users),
                    Arc::clone(&self.activity),
                    self.broadcast.clone(),
                    self.ws.metrics.clone(),
                );
                tokio::spawn(broadcaster.run(self.ws.shutdown.subscribe_guard()))
            })
            .collect()
    }
}
