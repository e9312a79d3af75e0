use crate::ServerState;
use crate::api::error::Result as ApiResult;

use sp_core::{ActivityListing, Role};

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Live connection count per tracked role
#[derive(Debug, Default, Serialize)]
pub struct ConnectionCounts {
    pub student: usize,
    pub teacher: usize,
    pub parent: usize,
}

/// Response body of `GET /api/activity/status`
#[derive(Debug, Serialize)]
pub struct ActivityStatusResponse {
    pub connections: ConnectionCounts,
    pub total_connections: usize,
    pub recent_activity: Vec<ActivityListing>,
    pub generated_at: DateTime<Utc>,
}

/// GET /api/activity/status - connection counts and most recent activity
pub async fn activity_status(
    State(state): State<ServerState>,
) -> ApiResult<Json<ActivityStatusResponse>> {
    let mut connections = ConnectionCounts::default();
    for (role, count) in state.ws.registries.counts().await {
        match role {
            Role::Student => connections.student = count,
            Role::Teacher => connections.teacher = count,
            Role::Parent => connections.parent = count,
            Role::Admin => {}
        }
    }
    let total_connections = connections.student + connections.teacher + connections.parent;

    let recent_activity = state.activity.recent_activity(state.status_row_limit).await?;

    Ok(Json(ActivityStatusResponse {
        connections,
        total_connections,
        recent_activity,
        generated_at: Utc::now(),
    }))
}
