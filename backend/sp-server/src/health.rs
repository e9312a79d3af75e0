use crate::ServerState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::warn;
use serde_json::{Map, Value, json};

/// GET /health - Component status and per-role connection counts
pub async fn health(State(state): State<ServerState>) -> Response {
    let database_ok = ping_database(&state).await;

    let mut connections = Map::new();
    for (role, count) in state.ws.registries.counts().await {
        connections.insert(role.as_str().to_string(), json!(count));
    }

    let (status, database) = if database_ok {
        ("healthy", "operational")
    } else {
        ("degraded", "unavailable")
    };

    let health = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "websocket": "operational",
            "database": database,
        },
        "connections": Value::Object(connections),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live - Kubernetes liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    // Simple check: if we can respond, we're alive
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - Kubernetes readiness probe (ready to accept traffic?)
pub async fn readiness(State(state): State<ServerState>) -> Response {
    if state.ws.shutdown.is_shutdown() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    if ping_database(&state).await {
        (StatusCode::OK, "Ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable").into_response()
    }
}

/// GET /metrics - Prometheus exposition
pub async fn metrics(State(state): State<ServerState>) -> Response {
    (StatusCode::OK, state.prometheus.render()).into_response()
}

async fn ping_database(state: &ServerState) -> bool {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Database health check failed: {e}");
            false
        }
    }
}
