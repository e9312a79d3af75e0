#![allow(dead_code)]

use sp_core::{Role, UserId};
use sp_db::connect_in_memory;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

/// In-memory pool with migrations applied
pub async fn create_test_pool() -> SqlitePool {
    connect_in_memory()
        .await
        .expect("Failed to create test pool")
}

/// Inserts an active user and returns its id
pub async fn create_test_user(pool: &SqlitePool, role: Role, phone: &str) -> UserId {
    insert_user(pool, role, phone, "Test", "User", true).await
}

pub async fn insert_user(
    pool: &SqlitePool,
    role: Role,
    phone: &str,
    first_name: &str,
    last_name: &str,
    is_active: bool,
) -> UserId {
    // Use sqlx::query (not query!) to avoid offline mode issues in tests
    let result = sqlx::query(
        "INSERT INTO users (phone, role, first_name, last_name, is_active) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(phone)
    .bind(role.as_str())
    .bind(first_name)
    .bind(last_name)
    .bind(is_active)
    .execute(pool)
    .await
    .expect("Failed to create test user");

    result.last_insert_rowid()
}

/// Millisecond-precision timestamp `secs_ago` seconds in the past
pub fn seconds_ago(secs_ago: i64) -> DateTime<Utc> {
    let now = DateTime::from_timestamp_millis(Utc::now().timestamp_millis()).expect("valid timestamp");
    now - Duration::seconds(secs_ago)
}

pub async fn activity_row_count(pool: &SqlitePool, user_id: UserId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM user_activity WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count activity rows")
}
