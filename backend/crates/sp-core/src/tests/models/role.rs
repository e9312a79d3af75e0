use crate::Role;

use std::str::FromStr;

#[test]
fn test_role_as_str() {
    assert_eq!(Role::Admin.as_str(), "admin");
    assert_eq!(Role::Teacher.as_str(), "teacher");
    assert_eq!(Role::Student.as_str(), "student");
    assert_eq!(Role::Parent.as_str(), "parent");
}

#[test]
fn test_role_from_str() {
    assert_eq!(Role::from_str("student").unwrap(), Role::Student);
    assert_eq!(Role::from_str("parent").unwrap(), Role::Parent);
    assert!(Role::from_str("Student").is_err());
    assert!(Role::from_str("janitor").is_err());
}

#[test]
fn test_role_path_segment_only_resolves_tracked_roles() {
    assert_eq!(Role::from_path_segment("students"), Some(Role::Student));
    assert_eq!(Role::from_path_segment("teachers"), Some(Role::Teacher));
    assert_eq!(Role::from_path_segment("parents"), Some(Role::Parent));
    assert_eq!(Role::from_path_segment("admins"), None);
    assert_eq!(Role::from_path_segment("student"), None);
}

#[test]
fn test_role_update_type() {
    assert_eq!(Role::Teacher.update_type(), "teacher_activity_update");
}

#[test]
fn test_role_serde_is_lowercase() {
    let json = serde_json::to_string(&Role::Parent).unwrap();
    assert_eq!(json, "\"parent\"");
}
