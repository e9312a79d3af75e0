use crate::{
    ConnectionId, ConnectionInfo, ConnectionLimits, Metrics, Result as WsErrorResult, WsError,
};

use sp_core::{Role, UserId};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use futures::future::join_all;
use log::{debug, info, warn};
use tokio::sync::{RwLock, mpsc};

/// Live push connections of one role.
///
/// Cheap to clone; clones share the same connection set. Admission is capped at
/// `limits.max_connections` and checked under the write lock, so the cap holds
/// under concurrent upgrades.
pub struct ConnectionRegistry {
    role: Role,
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
    metrics: Metrics,
}

struct RegistryInner {
    /// All active connections by connection_id
    connections: HashMap<ConnectionId, ConnectionInfo>,
}

impl ConnectionRegistry {
    pub fn new(role: Role, limits: ConnectionLimits, metrics: Metrics) -> Self {
        Self {
            role,
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
            })),
            limits,
            metrics,
        }
    }

    /// Admit a connection, returns its ConnectionId if under capacity
    pub async fn connect(
        &self,
        user_id: Option<UserId>,
        sender: mpsc::Sender<Message>,
    ) -> WsErrorResult<ConnectionId> {
        let mut inner = self.inner.write().await;

        if inner.connections.len() >= self.limits.max_connections {
            warn!(
                "{} connection limit reached: {}/{}",
                self.role,
                inner.connections.len(),
                self.limits.max_connections
            );
            self.metrics.connection_rejected(self.role);
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.connections.len(),
                max: self.limits.max_connections,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let connection_id = ConnectionId::new();
        let info = ConnectionInfo {
            connection_id,
            user_id,
            connected_at: chrono::Utc::now(),
            sender,
        };

        inner.connections.insert(connection_id, info);
        self.metrics.connection_established(self.role);
        info!(
            "Registered {} connection {connection_id} ({} total)",
            self.role,
            inner.connections.len()
        );

        Ok(connection_id)
    }

    /// Remove a connection. Returns false if it was already gone.
    pub async fn disconnect(&self, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        let removed = inner.connections.remove(&connection_id).is_some();
        if removed {
            self.metrics.connection_closed(self.role);
            info!(
                "Unregistered {} connection {connection_id} ({} total remaining)",
                self.role,
                inner.connections.len()
            );
        }
        removed
    }

    /// Queue `message` for every connection and evict the ones that fail.
    /// Returns the number of connections that accepted the message.
    pub async fn broadcast(&self, message: Message) -> usize {
        // Snapshot senders so no lock is held across sends
        let targets: Vec<(ConnectionId, mpsc::Sender<Message>)> = {
            let inner = self.inner.read().await;
            inner
                .connections
                .values()
                .map(|c| (c.connection_id, c.sender.clone()))
                .collect()
        };

        if targets.is_empty() {
            return 0;
        }

        let send_timeout = self.limits.send_timeout;
        let outcomes = join_all(targets.into_iter().map(|(connection_id, sender)| {
            let message = message.clone();
            async move {
                let delivered = sender.send_timeout(message, send_timeout).await.is_ok();
                (connection_id, delivered)
            }
        }))
        .await;

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (connection_id, ok) in outcomes {
            if ok {
                delivered += 1;
            } else {
                failed.push(connection_id);
            }
        }

        if !failed.is_empty() {
            self.evict(&failed).await;
        }

        self.metrics.broadcast_completed(self.role, delivered, failed.len());
        debug!(
            "Broadcast to {} {} connections ({} evicted)",
            delivered,
            self.role,
            failed.len()
        );

        delivered
    }

    /// Queue `message` for a single connection; a failed send disconnects it
    pub async fn send_to(
        &self,
        connection_id: ConnectionId,
        message: Message,
    ) -> WsErrorResult<()> {
        let sender = {
            let inner = self.inner.read().await;
            inner
                .connections
                .get(&connection_id)
                .map(|c| c.sender.clone())
        };

        let Some(sender) = sender else {
            return Err(WsError::ConnectionClosed {
                reason: format!("{connection_id} is not registered"),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        if let Err(e) = sender.send_timeout(message, self.limits.send_timeout).await {
            self.evict(&[connection_id]).await;
            return Err(WsError::SendFailed {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Get information about a specific connection
    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let inner = self.inner.read().await;
        inner.connections.get(&connection_id).cloned()
    }

    pub async fn count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.count().await == 0
    }

    pub fn capacity(&self) -> usize {
        self.limits.max_connections
    }

    pub fn role(&self) -> Role {
        self.role
    }

    async fn evict(&self, connection_ids: &[ConnectionId]) {
        let mut inner = self.inner.write().await;

        for connection_id in connection_ids {
            if inner.connections.remove(connection_id).is_some() {
                self.metrics.connection_evicted(self.role);
                warn!("Evicted unresponsive {} connection {connection_id}", self.role);
            }
        }
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            role: self.role,
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
