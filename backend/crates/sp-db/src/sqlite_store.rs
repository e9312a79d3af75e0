use crate::{ActivityRepository, UserRepository};

use sp_core::{
    ActivityListing, ActivityStore, Result as CoreErrorResult, Role, RoleMember, UserId, UserStore,
};

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqlitePool;

/// SQLite-backed user directory and activity table
#[derive(Clone)]
pub struct SqlitePresenceStore {
    pool: SqlitePool,
}

impl SqlitePresenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqlitePresenceStore {
    async fn active_users_by_role(&self, role: Role) -> CoreErrorResult<Vec<RoleMember>> {
        Ok(UserRepository::find_active_by_role(&self.pool, role).await?)
    }
}

#[async_trait]
impl ActivityStore for SqlitePresenceStore {
    async fn record_activity(&self, user_id: UserId, at: DateTime<Utc>) -> CoreErrorResult<()> {
        if !ActivityRepository::upsert(&self.pool, user_id, at).await? {
            debug!("Activity for unknown user {user_id} ignored");
        }
        Ok(())
    }

    async fn activity_by_user_ids(
        &self,
        user_ids: &[UserId],
    ) -> CoreErrorResult<HashMap<UserId, DateTime<Utc>>> {
        Ok(ActivityRepository::find_by_user_ids(&self.pool, user_ids).await?)
    }

    async fn recent_activity(&self, limit: usize) -> CoreErrorResult<Vec<ActivityListing>> {
        Ok(ActivityRepository::find_recent(&self.pool, limit).await?)
    }
}
