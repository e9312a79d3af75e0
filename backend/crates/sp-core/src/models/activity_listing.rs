use crate::{Role, UserId};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the recent-activity listing served by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityListing {
    pub user_id: UserId,
    pub phone: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub last_active: Option<DateTime<Utc>>,
}
