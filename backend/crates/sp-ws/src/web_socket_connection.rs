use crate::{
    ConnectionConfig, ConnectionRegistry, Result as WsErrorResult, ShutdownGuard, WsError,
};

use sp_core::{ErrorLocation, UserId};

use std::panic::Location;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Close reason sent when a role's registry is full
pub const LIMIT_REACHED_REASON: &str = "Connection limit reached";

/// Manages a single presence WebSocket connection.
///
/// Push-only: the server writes snapshots, inbound frames are read and dropped
/// so the socket notices when the peer goes away.
pub struct WebSocketConnection {
    registry: ConnectionRegistry,
    user_id: Option<UserId>,
    config: ConnectionConfig,
}

impl WebSocketConnection {
    pub fn new(
        registry: ConnectionRegistry,
        user_id: Option<UserId>,
        config: ConnectionConfig,
    ) -> Self {
        Self {
            registry,
            user_id,
            config,
        }
    }

    /// Handle the WebSocket connection lifecycle
    pub async fn handle(
        self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let role = self.registry.role();

        // Split socket into sender and receiver
        let (mut ws_sender, mut ws_receiver) = socket.split();

        // Create bounded channel for outgoing messages (backpressure handling)
        let (tx, mut rx) = mpsc::channel::<Message>(self.config.send_buffer_size);

        let connection_id = match self.registry.connect(self.user_id, tx).await {
            Ok(connection_id) => connection_id,
            Err(e) => {
                let close = Message::Close(Some(CloseFrame {
                    code: close_code::POLICY,
                    reason: Utf8Bytes::from_static(LIMIT_REACHED_REASON),
                }));
                if let Err(send_err) = ws_sender.send(close).await {
                    debug!("Could not send close frame to rejected {role} client: {send_err}");
                }
                return Err(e);
            }
        };

        info!(
            "WebSocket connection {connection_id} established for {role} (user {:?})",
            self.user_id
        );

        // Writer: drains the queue until the registry drops the sender
        let send_task = tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                if ws_sender.send(msg).await.is_err() {
                    break;
                }
            }
            let _ = ws_sender.close().await;
        });

        let result = loop {
            tokio::select! {
                msg = ws_receiver.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Connection {connection_id} closed by client");
                            break Ok(());
                        }
                        Some(Ok(_)) => {
                            // Inbound frames carry no meaning here
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error on connection {connection_id}: {e}");
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                    }
                }

                _ = shutdown_guard.wait() => {
                    info!("Shutting down connection {connection_id} gracefully");
                    break Ok(());
                }
            }
        };

        // Dropping the registry's sender ends the writer
        self.registry.disconnect(connection_id).await;
        if !join_writer(send_task, self.config.writer_drain_timeout).await {
            warn!("Writer for connection {connection_id} stalled, aborted");
        }

        result
    }
}

/// Wait for a connection's writer to finish, aborting it once `timeout` elapses.
/// Returns false when the writer had to be aborted.
pub(crate) async fn join_writer(mut writer: JoinHandle<()>, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, &mut writer).await {
        Ok(_) => true,
        Err(_) => {
            writer.abort();
            false
        }
    }
}
