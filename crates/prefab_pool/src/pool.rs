//! Per-key pool state

use crate::host::{PoolHost, PoolTemplate};
use crate::key::{PoolKey, TypeKey};
use std::collections::HashSet;

/// Usage counters for a single pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances constructed for this pool, prewarmed or lazy
    pub constructed: usize,
    /// Instances constructed because `get` found the pool empty
    pub constructed_lazily: usize,
    /// Successful checkouts
    pub gets: u64,
    /// Successful returns
    pub returns: u64,
    /// Instances currently checked out
    pub active: usize,
    /// Maximum number of instances checked out at once
    pub peak_active: usize,
}

/// One pool: a template, its container and the two disjoint instance sets
pub(crate) struct Pool<H: PoolHost> {
    key: PoolKey,
    template: H::Template,
    container: H::Container,
    inactive: HashSet<H::Instance>,
    active: HashSet<H::Instance>,
    stats: PoolStats,
}

impl<H: PoolHost> Pool<H> {
    pub(crate) fn new(key: PoolKey, template: H::Template, container: H::Container, capacity: usize) -> Self {
        Self {
            key,
            template,
            container,
            inactive: HashSet::with_capacity(capacity),
            active: HashSet::new(),
            stats: PoolStats::default(),
        }
    }

    pub(crate) fn key(&self) -> &PoolKey {
        &self.key
    }

    pub(crate) fn content_type(&self) -> TypeKey {
        self.template.type_key()
    }

    pub(crate) fn container(&self) -> H::Container {
        self.container
    }

    pub(crate) fn stats(&self) -> PoolStats {
        self.stats
    }

    pub(crate) fn inactive_len(&self) -> usize {
        self.inactive.len()
    }

    pub(crate) fn active_len(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn is_active(&self, instance: H::Instance) -> bool {
        self.active.contains(&instance)
    }

    pub(crate) fn is_inactive(&self, instance: H::Instance) -> bool {
        self.inactive.contains(&instance)
    }

    /// Clone the template under this pool's container. The caller decides
    /// which set the new instance joins.
    pub(crate) fn construct(&mut self, host: &mut H) -> H::Instance {
        let instance = host.instantiate(&self.template, self.container);
        self.stats.constructed += 1;
        instance
    }

    pub(crate) fn construct_lazily(&mut self, host: &mut H) -> H::Instance {
        self.stats.constructed_lazily += 1;
        self.construct(host)
    }

    /// Remove an arbitrary inactive instance
    pub(crate) fn take_inactive(&mut self) -> Option<H::Instance> {
        let instance = *self.inactive.iter().next()?;
        self.inactive.remove(&instance);
        Some(instance)
    }

    pub(crate) fn store_inactive(&mut self, instance: H::Instance) {
        self.inactive.insert(instance);
    }

    pub(crate) fn mark_active(&mut self, instance: H::Instance) {
        self.active.insert(instance);
        self.stats.gets += 1;
        self.stats.active = self.active.len();
        self.stats.peak_active = self.stats.peak_active.max(self.stats.active);
    }

    /// Move an active instance back to the inactive set.
    /// Returns `false` when the instance was not checked out.
    pub(crate) fn mark_inactive(&mut self, instance: H::Instance) -> bool {
        if !self.active.remove(&instance) {
            return false;
        }
        self.inactive.insert(instance);
        self.stats.returns += 1;
        self.stats.active = self.active.len();
        true
    }
}
