//! Collaborator interfaces the presence layer reads from and writes to.

use crate::{ActivityListing, Result as CoreErrorResult, Role, RoleMember, UserId};

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Read access to user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All active users holding `role`
    async fn active_users_by_role(&self, role: Role) -> CoreErrorResult<Vec<RoleMember>>;
}

/// Durable last-active timestamps, one row per user
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Upsert the user's activity row with `last_active = at`.
    /// Unknown users are ignored.
    async fn record_activity(&self, user_id: UserId, at: DateTime<Utc>) -> CoreErrorResult<()>;

    /// Last-active timestamps for the given users. Users without a row are absent.
    async fn activity_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> CoreErrorResult<HashMap<UserId, DateTime<Utc>>>;

    /// Most recently active users across all roles, newest first
    async fn recent_activity(&self, limit: usize) -> CoreErrorResult<Vec<ActivityListing>>;
}
