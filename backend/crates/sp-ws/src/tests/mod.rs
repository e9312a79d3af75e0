mod shutdown;

use crate::{ConnectionLimits, ConnectionRegistry, Metrics};

use sp_core::Role;

use std::time::Duration;

use axum::extract::ws::Message;
use tokio::sync::mpsc;

pub(crate) fn registry_with_capacity(role: Role, max_connections: usize) -> ConnectionRegistry {
    ConnectionRegistry::new(
        role,
        ConnectionLimits {
            max_connections,
            send_timeout: Duration::from_millis(50),
        },
        Metrics::default(),
    )
}

pub(crate) fn channel() -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
    mpsc::channel(4)
}

pub(crate) fn text(payload: &str) -> Message {
    Message::Text(payload.to_string().into())
}
