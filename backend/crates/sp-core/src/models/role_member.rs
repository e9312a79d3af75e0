use crate::UserId;

use serde::{Deserialize, Serialize};

/// An active user of one role, as returned by the user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMember {
    pub user_id: UserId,
    pub phone: Option<String>,
    pub full_name: String,
}
