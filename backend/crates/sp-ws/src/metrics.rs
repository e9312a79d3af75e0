use sp_core::Role;

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for presence connections and broadcasts
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "sp_ws" }
    }

    /// Record new connection admitted
    pub fn connection_established(&self, role: Role) {
        counter!(format!("{}.connections.established", self.prefix), "role" => role.as_str())
            .increment(1);
        gauge!(format!("{}.connections.active", self.prefix), "role" => role.as_str())
            .increment(1.0);
    }

    /// Record connection closed by the peer or by shutdown
    pub fn connection_closed(&self, role: Role) {
        counter!(format!("{}.connections.closed", self.prefix), "role" => role.as_str())
            .increment(1);
        gauge!(format!("{}.connections.active", self.prefix), "role" => role.as_str())
            .decrement(1.0);
    }

    /// Record connection dropped after a failed send
    pub fn connection_evicted(&self, role: Role) {
        counter!(format!("{}.connections.evicted", self.prefix), "role" => role.as_str())
            .increment(1);
        gauge!(format!("{}.connections.active", self.prefix), "role" => role.as_str())
            .decrement(1.0);
    }

    /// Record upgrade refused at capacity
    pub fn connection_rejected(&self, role: Role) {
        counter!(format!("{}.connections.rejected", self.prefix), "role" => role.as_str())
            .increment(1);
    }

    pub fn broadcast_completed(&self, role: Role, delivered: usize, failed: usize) {
        counter!(format!("{}.broadcast.delivered", self.prefix), "role" => role.as_str())
            .increment(delivered as u64);
        counter!(format!("{}.broadcast.failed", self.prefix), "role" => role.as_str())
            .increment(failed as u64);
    }

    /// Record a finished presence tick
    pub fn tick_completed(
        &self,
        role: Role,
        total_users: usize,
        online_users: usize,
        elapsed: Duration,
    ) {
        counter!(format!("{}.ticks.completed", self.prefix), "role" => role.as_str())
            .increment(1);
        gauge!(format!("{}.users.total", self.prefix), "role" => role.as_str())
            .set(total_users as f64);
        gauge!(format!("{}.users.online", self.prefix), "role" => role.as_str())
            .set(online_users as f64);
        histogram!(format!("{}.ticks.latency_ms", self.prefix), "role" => role.as_str())
            .record(elapsed.as_millis() as f64);
    }

    /// Record a tick abandoned because of an error
    pub fn tick_failed(&self, role: Role, error_code: &'static str) {
        counter!(
            format!("{}.ticks.failed", self.prefix),
            "role" => role.as_str(),
            "error" => error_code
        )
        .increment(1);
    }

    pub fn activity_recorded(&self) {
        counter!(format!("{}.activity.recorded", self.prefix)).increment(1);
    }

    /// Record a dropped activity write (`reason` is "error" or "timeout")
    pub fn activity_write_failed(&self, reason: &'static str) {
        counter!(format!("{}.activity.write_failed", self.prefix), "reason" => reason)
            .increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
