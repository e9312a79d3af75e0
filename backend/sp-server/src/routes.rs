use crate::{ServerState, activity_recorder, api, health};

use axum::{Router, middleware, routing::get};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: ServerState) -> Router {
    // Presence push endpoints share the WebSocket state
    let ws_routes = Router::new()
        .route("/ws/{role}", get(sp_ws::handler))
        .with_state(state.ws.clone());

    Router::new()
        // Activity status
        .route("/api/activity/status", get(api::status::activity_status))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        // Add shared state
        .with_state(state.clone())
        .merge(ws_routes)
        // Every authenticated request refreshes the caller's last_active
        .layer(middleware::from_fn_with_state(
            state.recorder,
            activity_recorder::record_activity,
        ))
        // CORS middleware (allow all origins for WebSocket)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
