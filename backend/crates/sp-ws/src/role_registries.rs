use crate::{ConnectionLimits, ConnectionRegistry, Metrics};

use sp_core::Role;

use std::collections::HashMap;
use std::sync::Arc;

/// One [`ConnectionRegistry`] per tracked role, built once at startup
#[derive(Clone)]
pub struct RoleRegistries {
    registries: Arc<HashMap<Role, ConnectionRegistry>>,
}

impl RoleRegistries {
    pub fn new(limits: ConnectionLimits, metrics: Metrics) -> Self {
        let registries = Role::TRACKED
            .into_iter()
            .map(|role| {
                (
                    role,
                    ConnectionRegistry::new(role, limits.clone(), metrics.clone()),
                )
            })
            .collect();

        Self {
            registries: Arc::new(registries),
        }
    }

    /// Registry for `role`; `None` for roles without a presence channel
    pub fn get(&self, role: Role) -> Option<&ConnectionRegistry> {
        self.registries.get(&role)
    }

    /// Registries in [`Role::TRACKED`] order
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionRegistry> {
        Role::TRACKED
            .iter()
            .filter_map(|role| self.registries.get(role))
    }

    /// Live connection count of every tracked role
    pub async fn counts(&self) -> Vec<(Role, usize)> {
        let mut counts = Vec::with_capacity(Role::TRACKED.len());
        for registry in self.iter() {
            counts.push((registry.role(), registry.count().await));
        }
        counts
    }

    pub async fn total_count(&self) -> usize {
        self.counts().await.iter().map(|(_, count)| count).sum()
    }
}
