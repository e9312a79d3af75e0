#![allow(dead_code)]

use sp_auth::IdentityResolver;
use sp_core::Role;
use sp_ws::{
    AppState, ConnectionConfig, ConnectionLimits, Metrics, RoleRegistries, ShutdownCoordinator,
};

use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::{TestServer, TestWebSocket};

/// Default JWT secret for all tests (HS256 requires at least 32 bytes)
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections_per_role: usize,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections_per_role: 100,
        }
    }
}

impl TestServerConfig {
    /// Create config with strict connection limits (for limit tests)
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_per_role: 1,
        }
    }
}

/// Test server with access to AppState for testing
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

impl TestServerWithState {
    /// Open a WebSocket on `/ws/{segment}`
    pub async fn connect(&self, segment: &str) -> TestWebSocket {
        self.server
            .get_websocket(&format!("/ws/{segment}"))
            .await
            .into_websocket()
            .await
    }

    /// Open a WebSocket on `/ws/{segment}` with a bearer token
    pub async fn connect_as(&self, segment: &str, user_id: i64) -> TestWebSocket {
        let token = crate::common::create_test_token(user_id, TEST_JWT_SECRET);
        self.server
            .get_websocket(&format!("/ws/{segment}"))
            .add_header("Authorization", format!("Bearer {token}"))
            .await
            .into_websocket()
            .await
    }

    /// Poll until `role` has `expected` connections; admission runs after the upgrade
    pub async fn wait_for_count(&self, role: Role, expected: usize) {
        let registry = self
            .app_state
            .registries
            .get(role)
            .expect("tracked role has a registry");

        for _ in 0..200 {
            if registry.count().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "{role} registry never reached {expected} connections (has {})",
            registry.count().await
        );
    }
}

/// Create a TestServer with default configuration
pub fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default())
}

/// Create a TestServer with custom configuration
pub fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config);
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

/// Build the Axum Router with AppState
fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let metrics = Metrics::default();

    let limits = ConnectionLimits {
        max_connections: config.max_connections_per_role,
        send_timeout: Duration::from_millis(500),
    };

    let app_state = AppState {
        registries: RoleRegistries::new(limits, metrics.clone()),
        identity: IdentityResolver::with_hs256(TEST_JWT_SECRET),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
    };

    let router = Router::new()
        .route("/ws/{role}", get(sp_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}
