use crate::{Role, UserId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One user's line in a presence push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub user_id: UserId,
    pub phone: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub last_active: Option<DateTime<Utc>>,
    pub is_online: bool,
}
