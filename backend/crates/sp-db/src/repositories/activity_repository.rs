use crate::{DbError, Result as DbErrorResult};
use crate::repositories::full_name;

use sp_core::{ActivityListing, Role, UserId};

use std::collections::HashMap;
use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

/// Bound parameters per `IN (...)` lookup
const LOOKUP_CHUNK_SIZE: usize = 500;

pub struct ActivityRepository;

impl ActivityRepository {
    /// Create or refresh the user's activity row. The phone column is copied from
    /// `users` on every write. Returns false when the user does not exist.
    pub async fn upsert<'e, E>(executor: E, user_id: UserId, at: DateTime<Utc>) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              INSERT INTO user_activity (user_id, phone, last_active)
              SELECT id, phone, ? FROM users WHERE id = ?
              ON CONFLICT(user_id) DO UPDATE SET
                  phone = excluded.phone,
                  last_active = excluded.last_active
              "#,
        )
        .bind(at.timestamp_millis())
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Last-active timestamps for `user_ids`; users without a row are absent
    pub async fn find_by_user_ids(
        pool: &SqlitePool,
        user_ids: &[UserId],
    ) -> DbErrorResult<HashMap<UserId, DateTime<Utc>>> {
        let mut activity = HashMap::with_capacity(user_ids.len());

        for chunk in user_ids.chunks(LOOKUP_CHUNK_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(
                "SELECT user_id, last_active FROM user_activity WHERE user_id IN (",
            );
            let mut separated = query.separated(", ");
            for user_id in chunk {
                separated.push_bind(*user_id);
            }
            separated.push_unseparated(")");

            let rows = query.build().fetch_all(pool).await?;
            for row in rows {
                let user_id: UserId = row.try_get("user_id")?;
                let last_active: i64 = row.try_get("last_active")?;
                activity.insert(user_id, from_millis(last_active)?);
            }
        }

        Ok(activity)
    }

    /// Active users of every role, most recently active first, never-active last
    pub async fn find_recent<'e, E>(executor: E, limit: usize) -> DbErrorResult<Vec<ActivityListing>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
              SELECT u.id, u.phone, u.first_name, u.last_name, u.role, a.last_active
              FROM users u
              LEFT JOIN user_activity a ON a.user_id = u.id
              WHERE u.is_active = 1
              ORDER BY a.last_active IS NULL, a.last_active DESC, u.id
              LIMIT ?
              "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|row| {
                let first_name: String = row.try_get("first_name")?;
                let last_name: String = row.try_get("last_name")?;
                let role: String = row.try_get("role")?;
                let last_active: Option<i64> = row.try_get("last_active")?;

                Ok(ActivityListing {
                    user_id: row.try_get("id")?,
                    phone: row.try_get("phone")?,
                    full_name: full_name(&first_name, &last_name),
                    role: Role::from_str(&role).map_err(|e| DbError::InvalidRow {
                        message: e.to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    })?,
                    last_active: last_active.map(from_millis).transpose()?,
                })
            })
            .collect()
    }
}

#[track_caller]
fn from_millis(millis: i64) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| DbError::InvalidRow {
        message: format!("last_active out of range: {millis}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
