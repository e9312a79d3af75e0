//! Presence snapshot computed once per broadcaster tick.

use crate::{PresenceEntry, PresenceUpdate, Result as CoreErrorResult, Role, RoleMember, UserId};

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Online/offline state of every active user of one role at `generated_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub role: Role,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<PresenceEntry>,
}

/// A user is online when the last recorded activity is no older than `threshold`.
/// Users with no recorded activity are offline.
pub fn is_online(
    last_active: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> bool {
    match last_active {
        Some(last_active) => now.signed_duration_since(last_active) <= threshold,
        None => false,
    }
}

impl PresenceSnapshot {
    /// Left-join `members` against their activity timestamps and classify each one.
    /// Member order is preserved.
    pub fn compute(
        role: Role,
        members: Vec<RoleMember>,
        activity: &HashMap<UserId, DateTime<Utc>>,
        now: DateTime<Utc>,
        threshold: Duration,
    ) -> Self {
        let entries = members
            .into_iter()
            .map(|member| {
                let last_active = activity.get(&member.user_id).copied();
                PresenceEntry {
                    user_id: member.user_id,
                    phone: member.phone,
                    full_name: member.full_name,
                    role,
                    last_active,
                    is_online: is_online(last_active, now, threshold),
                }
            })
            .collect();

        Self {
            role,
            generated_at: now,
            entries,
        }
    }

    pub fn total_users(&self) -> usize {
        self.entries.len()
    }

    pub fn online_users(&self) -> usize {
        self.entries.iter().filter(|e| e.is_online).count()
    }

    pub fn to_update(&self) -> PresenceUpdate {
        PresenceUpdate {
            kind: self.role.update_type(),
            data: self.entries.clone(),
            timestamp: self.generated_at,
            total_users: self.total_users(),
            online_users: self.online_users(),
        }
    }

    /// Serialize into the JSON payload pushed to clients
    pub fn to_json(&self) -> CoreErrorResult<String> {
        Ok(serde_json::to_string(&self.to_update())?)
    }
}
