use crate::Result as DbErrorResult;
use crate::repositories::full_name;

use sp_core::{Role, RoleMember};

use sqlx::Row;

pub struct UserRepository;

impl UserRepository {
    /// Active users holding `role`, ordered by id
    pub async fn find_active_by_role<'e, E>(executor: E, role: Role) -> DbErrorResult<Vec<RoleMember>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
              SELECT id, phone, first_name, last_name
              FROM users
              WHERE role = ? AND is_active = 1
              ORDER BY id
              "#,
        )
        .bind(role.as_str())
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|row| {
                let first_name: String = row.try_get("first_name")?;
                let last_name: String = row.try_get("last_name")?;
                Ok(RoleMember {
                    user_id: row.try_get("id")?,
                    phone: row.try_get("phone")?,
                    full_name: full_name(&first_name, &last_name),
                })
            })
            .collect()
    }
}
