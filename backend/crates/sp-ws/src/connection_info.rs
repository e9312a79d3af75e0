use crate::ConnectionId;

use sp_core::UserId;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// An admitted push connection
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    /// Caller identity from the upgrade request, if it carried a valid token
    pub user_id: Option<UserId>,
    pub connected_at: DateTime<Utc>,
    /// Outbound queue drained by the connection's writer task
    pub sender: mpsc::Sender<Message>,
}
