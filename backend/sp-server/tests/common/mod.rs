#![allow(dead_code)]

//! Test infrastructure for sp-server HTTP tests

use sp_config::Config;
use sp_core::Role;
use sp_server::ServerState;
use sp_ws::ShutdownCoordinator;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;
use sqlx::SqlitePool;

/// HS256 secret shared by test tokens and the test server (at least 32 bytes)
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-integration-tests-min-32-bytes-long";

/// Build ServerState over a fresh in-memory database
pub async fn create_test_state() -> ServerState {
    let pool = sp_db::connect_in_memory()
        .await
        .expect("Failed to create test database");

    let mut config = Config::default();
    config.auth.jwt_secret = Some(TEST_JWT_SECRET.to_string());

    let prometheus = PrometheusBuilder::new().build_recorder().handle();

    ServerState::new(&config, pool, prometheus, ShutdownCoordinator::new())
}

/// Create a test user and return its id
pub async fn create_test_user(
    pool: &SqlitePool,
    role: Role,
    phone: &str,
    first: &str,
    last: &str,
) -> i64 {
    sqlx::query("INSERT INTO users (phone, role, first_name, last_name) VALUES (?, ?, ?, ?)")
        .bind(phone)
        .bind(role.as_str())
        .bind(first)
        .bind(last)
        .execute(pool)
        .await
        .expect("Failed to create test user")
        .last_insert_rowid()
}

/// Signed bearer token for `user_id`
pub fn bearer_token(user_id: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs();

    let claims = json!({ "sub": user_id.to_string(), "iat": now, "exp": now + 3600 });
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create test JWT");

    format!("Bearer {token}")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_as(uri: &str, user_id: i64) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", bearer_token(user_id))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Poll the activity table until `user_id` has a row; writes happen off the response path
pub async fn wait_for_activity(pool: &SqlitePool, user_id: i64) -> bool {
    for _ in 0..100 {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_activity WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(pool)
                .await
                .unwrap();
        if count > 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
