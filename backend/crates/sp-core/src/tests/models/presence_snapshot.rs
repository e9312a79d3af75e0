use crate::{PresenceSnapshot, Role, RoleMember, is_online};

use std::collections::HashMap;

use chrono::{Duration, Utc};
use googletest::prelude::*;

fn member(user_id: i64, name: &str) -> RoleMember {
    RoleMember {
        user_id,
        phone: Some(format!("+99890000{:04}", user_id)),
        full_name: name.to_string(),
    }
}

#[test]
fn given_activity_29s_ago_when_classified_then_online() {
    let now = Utc::now();
    let threshold = Duration::seconds(30);

    assert_that!(
        is_online(Some(now - Duration::seconds(29)), now, threshold),
        eq(true)
    );
}

#[test]
fn given_activity_31s_ago_when_classified_then_offline() {
    let now = Utc::now();
    let threshold = Duration::seconds(30);

    assert_that!(
        is_online(Some(now - Duration::seconds(31)), now, threshold),
        eq(false)
    );
}

#[test]
fn given_activity_exactly_at_threshold_when_classified_then_online() {
    let now = Utc::now();

    assert_that!(
        is_online(Some(now - Duration::seconds(30)), now, Duration::seconds(30)),
        eq(true)
    );
}

#[test]
fn given_no_activity_when_classified_then_offline() {
    assert_that!(
        is_online(None, Utc::now(), Duration::seconds(30)),
        eq(false)
    );
}

#[test]
fn given_members_without_activity_rows_when_computed_then_left_joined_as_offline() {
    // Given
    let now = Utc::now();
    let members = vec![member(1, "Ali Karimov"), member(2, "Dilnoza Rustamova")];
    let mut activity = HashMap::new();
    activity.insert(1, now - Duration::seconds(5));

    // When
    let snapshot =
        PresenceSnapshot::compute(Role::Student, members, &activity, now, Duration::seconds(30));

    // Then
    assert_that!(snapshot.total_users(), eq(2));
    assert_that!(snapshot.online_users(), eq(1));
    assert_that!(snapshot.entries[0].is_online, eq(true));
    assert_that!(snapshot.entries[1].last_active, none());
    assert_that!(snapshot.entries[1].is_online, eq(false));
    assert_that!(snapshot.entries[1].role, eq(Role::Student));
}

#[test]
fn given_snapshot_when_serialized_then_matches_push_shape() {
    // Given
    let now = Utc::now();
    let mut activity = HashMap::new();
    activity.insert(7, now);
    let snapshot = PresenceSnapshot::compute(
        Role::Teacher,
        vec![member(7, "Olga Petrova"), member(8, "Bek Nurmatov")],
        &activity,
        now,
        Duration::seconds(30),
    );

    // When
    let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

    // Then
    assert_that!(json["type"].as_str(), some(eq("teacher_activity_update")));
    assert_that!(json["total_users"].as_u64(), some(eq(2)));
    assert_that!(json["online_users"].as_u64(), some(eq(1)));
    assert_that!(json["data"][0]["user_id"].as_i64(), some(eq(7)));
    assert_that!(json["data"][0]["role"].as_str(), some(eq("teacher")));
    assert_that!(json["data"][1]["last_active"].is_null(), eq(true));
    assert_that!(json["timestamp"].is_string(), eq(true));
}

#[test]
fn given_no_members_when_computed_then_empty_snapshot() {
    let snapshot = PresenceSnapshot::compute(
        Role::Parent,
        Vec::new(),
        &HashMap::new(),
        Utc::now(),
        Duration::seconds(30),
    );

    assert_that!(snapshot.total_users(), eq(0));
    assert_that!(snapshot.online_users(), eq(0));
}
