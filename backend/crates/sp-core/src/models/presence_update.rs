use crate::PresenceEntry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire shape of a presence push (JSON text frame)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUpdate {
    /// `<role>_activity_update`
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Vec<PresenceEntry>,
    pub timestamp: DateTime<Utc>,
    pub total_users: usize,
    pub online_users: usize,
}
