use crate::{
    ConnectionConfig, Metrics, RoleRegistries, ShutdownCoordinator, WebSocketConnection, WsError,
};

use sp_auth::IdentityResolver;
use sp_core::{Role, UserId};

use axum::{
    extract::{
        Path, State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::Response,
};
use log::{debug, error, info};

/// Shared application state for presence WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub registries: RoleRegistries,
    pub identity: IdentityResolver,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

/// WebSocket upgrade handler for `/ws/{role}`
pub async fn handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let role = Role::from_path_segment(&segment).ok_or_else(|| {
        debug!("WebSocket upgrade for unknown role segment '{segment}'");
        StatusCode::NOT_FOUND
    })?;

    // Identity is informational only; anonymous clients are admitted
    let user_id = state.identity.resolve(&headers);
    debug!("WebSocket upgrade request for {role} from user {user_id:?}");

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, role, user_id, state)))
}

/// Handle WebSocket connection after upgrade
async fn handle_socket(
    socket: WebSocket,
    role: Role,
    user_id: Option<UserId>,
    state: AppState,
) {
    let Some(registry) = state.registries.get(role).cloned() else {
        error!("No connection registry for {role}");
        return;
    };

    let shutdown_guard = state.shutdown.subscribe_guard();
    let connection = WebSocketConnection::new(registry, user_id, state.config);

    match connection.handle(socket, shutdown_guard).await {
        Ok(()) => {}
        Err(e @ WsError::ConnectionLimitExceeded { .. }) => {
            info!("Rejected {role} connection: {e}");
        }
        Err(e) => {
            error!("{role} connection error: {e}");
        }
    }
}
