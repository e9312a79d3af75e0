use crate::{
    BroadcastConfig, ConnectionRegistry, Metrics, Result as WsErrorResult, ShutdownGuard, WsError,
};

use sp_core::{ActivityStore, PresenceSnapshot, UserId, UserStore};

use std::panic::Location;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::Message;
use chrono::Utc;
use error_location::ErrorLocation;
use log::{debug, error, info};

/// Periodically pushes the presence snapshot of one role to that role's
/// connections.
pub struct PresenceBroadcaster {
    registry: ConnectionRegistry,
    users: Arc<dyn UserStore>,
    activity: Arc<dyn ActivityStore>,
    config: BroadcastConfig,
    metrics: Metrics,
}

impl PresenceBroadcaster {
    pub fn new(
        registry: ConnectionRegistry,
        users: Arc<dyn UserStore>,
        activity: Arc<dyn ActivityStore>,
        config: BroadcastConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            registry,
            users,
            activity,
            config,
            metrics,
        }
    }

    /// Tick until shutdown. A failed tick is logged and the loop carries on.
    pub async fn run(self, mut shutdown_guard: ShutdownGuard) {
        let role = self.registry.role();
        info!(
            "Presence broadcaster for {role} started (every {:?})",
            self.config.interval
        );

        loop {
            if let Err(e) = self.tick().await {
                error!("Presence tick for {role} failed: {e}");
                self.metrics.tick_failed(role, e.error_code());
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown_guard.wait() => {
                    info!("Presence broadcaster for {role} stopping");
                    break;
                }
            }
        }
    }

    /// Compute and push one snapshot. Returns how many connections accepted it;
    /// with no connections the stores are not read at all.
    pub async fn tick(&self) -> WsErrorResult<usize> {
        let role = self.registry.role();

        if self.registry.is_empty().await {
            debug!("No {role} connections, skipping tick");
            return Ok(0);
        }

        let started = Instant::now();

        let members = self.users.active_users_by_role(role).await?;
        let user_ids: Vec<UserId> = members.iter().map(|m| m.user_id).collect();
        let activity = self.activity.activity_by_user_ids(&user_ids).await?;

        let threshold = chrono::Duration::from_std(self.config.online_threshold).map_err(|e| {
            WsError::Internal {
                message: format!("Invalid online threshold: {e}"),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;
        let snapshot = PresenceSnapshot::compute(role, members, &activity, Utc::now(), threshold);
        let payload = snapshot.to_json()?;

        let delivered = self.registry.broadcast(Message::Text(payload.into())).await;

        self.metrics.tick_completed(
            role,
            snapshot.total_users(),
            snapshot.online_users(),
            started.elapsed(),
        );
        debug!(
            "{role} presence: {}/{} online, delivered to {delivered} connections",
            snapshot.online_users(),
            snapshot.total_users()
        );

        Ok(delivered)
    }
}
